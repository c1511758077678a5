use crate::auth::use_auth;
use crate::components::common::{Load, LoadFailed, Spinner, load_into};
use inventory_shared::AnalyticsSnapshot;
use inventory_shared::protocol::DashboardRequest;
use leptos::prelude::*;

#[component]
fn KpiCard(title: &'static str, value: String, #[prop(optional)] alert: bool) -> impl IntoView {
    let class = if alert {
        "stat bg-base-100 rounded-box shadow border border-error"
    } else {
        "stat bg-base-100 rounded-box shadow"
    };
    view! {
        <div class=class>
            <div class="stat-title">{title}</div>
            <div class="stat-value text-2xl">{value}</div>
        </div>
    }
}

fn overview(snapshot: AnalyticsSnapshot) -> impl IntoView {
    let stats = snapshot.stats;
    view! {
        <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-6">
            <KpiCard title="Total Revenue" value=format!("₹{:.2}", stats.total_revenue) />
            <KpiCard title="Total Orders" value=stats.total_orders.to_string() />
            <KpiCard title="Pending Orders" value=stats.pending_orders.to_string() />
            <KpiCard
                title="Low Stock Items"
                value=stats.low_stock_count.to_string()
                alert=stats.low_stock_count > 0
            />
        </div>

        <div class="grid grid-cols-1 lg:grid-cols-2 gap-8 mt-8">
            <div class="card bg-base-100 shadow p-6">
                <h3 class="text-lg font-semibold mb-4">"Weekly Revenue"</h3>
                <ul class="space-y-1">
                    {snapshot
                        .daily_revenue
                        .into_iter()
                        .map(|(day, value)| view! {
                            <li class="flex justify-between"><span>{day}</span><span>{format!("₹{:.2}", value)}</span></li>
                        })
                        .collect_view()}
                </ul>
            </div>
            <div class="card bg-base-100 shadow p-6">
                <h3 class="text-lg font-semibold mb-4">"Order Status"</h3>
                <ul class="space-y-1">
                    {snapshot
                        .order_status_distribution
                        .into_iter()
                        .map(|(status, count)| view! {
                            <li class="flex justify-between"><span>{status}</span><span>{count}</span></li>
                        })
                        .collect_view()}
                </ul>
            </div>
        </div>

        <div class="grid grid-cols-1 lg:grid-cols-2 gap-8 mt-8">
            <div class="card bg-base-100 shadow p-6">
                <h3 class="text-lg font-semibold mb-4">"Top Selling Products"</h3>
                <ul class="space-y-1">
                    {snapshot
                        .top_selling_products
                        .into_iter()
                        .map(|p| view! {
                            <li class="flex justify-between"><span>{p.name}</span><span>{format!("{} sold", p.total_sold)}</span></li>
                        })
                        .collect_view()}
                </ul>
            </div>
            <div class="card bg-base-100 shadow p-6">
                <h3 class="text-lg font-semibold mb-4">"Low Stock Alerts"</h3>
                <ul class="space-y-1">
                    {snapshot
                        .low_stock_products
                        .into_iter()
                        .map(|p| view! {
                            <li class="flex justify-between text-error"><span>{p.name}</span><span>{format!("{} left", p.stock_quantity)}</span></li>
                        })
                        .collect_view()}
                </ul>
            </div>
        </div>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let (data, set_data) = signal(Load::<AnalyticsSnapshot>::Loading);

    load_into(auth, DashboardRequest, set_data);

    view! {
        <div class="space-y-8">
            <h1 class="text-2xl font-bold">"Business Overview"</h1>
            {move || match data.get() {
                Load::Loading => view! { <Spinner /> }.into_any(),
                Load::Failed => view! { <LoadFailed what="dashboard data" /> }.into_any(),
                Load::Ready(snapshot) => overview(snapshot).into_any(),
            }}
        </div>
    }
}
