use crate::auth::use_auth;
use crate::components::common::{Load, LoadFailed, Spinner, load_into};
use inventory_shared::Product;
use inventory_shared::protocol::ListProductsRequest;
use leptos::prelude::*;

fn product_card(product: Product) -> impl IntoView {
    let low = product.is_low_stock();
    let badge = if low { "badge badge-error" } else { "badge badge-success" };
    let supplier = product
        .supplier
        .as_ref()
        .map(|s| s.base.name.clone())
        .unwrap_or_else(|| "No supplier".to_string());

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <div class="flex justify-between items-start">
                    <h2 class="card-title">{product.base.name}</h2>
                    <span class=badge>{format!("Stock: {}", product.base.stock_quantity)}</span>
                </div>
                <p class="text-base-content/70 text-sm">
                    {product.base.description.unwrap_or_default()}
                </p>
                <div class="flex justify-between text-sm mt-2">
                    <span class="font-semibold">{format!("₹{:.2}", product.base.price)}</span>
                    <span class="text-base-content/60">{supplier}</span>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn ProductsPage() -> impl IntoView {
    let auth = use_auth();
    let (data, set_data) = signal(Load::<Vec<Product>>::Loading);

    load_into(auth, ListProductsRequest::default(), set_data);

    view! {
        <div class="space-y-6">
            <h1 class="text-2xl font-bold">"Inventory"</h1>
            {move || match data.get() {
                Load::Loading => view! { <Spinner /> }.into_any(),
                Load::Failed => view! { <LoadFailed what="products" /> }.into_any(),
                Load::Ready(products) => view! {
                    <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                        {products.into_iter().map(product_card).collect_view()}
                    </div>
                }
                .into_any(),
            }}
        </div>
    }
}
