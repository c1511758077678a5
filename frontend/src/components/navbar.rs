use crate::auth::{logout, use_auth};
use crate::web::router::{Link, use_router};
use inventory_console::AppRoute;
use leptos::prelude::*;

const NAV_ITEMS: [(AppRoute, &str); 4] = [
    (AppRoute::Dashboard, "Dashboard"),
    (AppRoute::Products, "Products"),
    (AppRoute::Orders, "Orders"),
    (AppRoute::Suppliers, "Suppliers"),
];

#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let current = router.current_route();

    view! {
        <nav class="navbar bg-base-100 shadow">
            <div class="flex-1 gap-2">
                <span class="text-xl font-bold text-primary px-2">"AI Inventory"</span>
                {NAV_ITEMS
                    .into_iter()
                    .map(|(route, label)| {
                        let class = if current.get_untracked() == route {
                            "btn btn-ghost btn-sm text-primary"
                        } else {
                            "btn btn-ghost btn-sm"
                        };
                        view! { <Link to=route class=class>{label}</Link> }
                    })
                    .collect_view()}
            </div>
            <div class="flex-none">
                <button class="btn btn-ghost btn-sm" on:click=move |_| logout(auth)>
                    "Logout"
                </button>
            </div>
        </nav>
    }
}
