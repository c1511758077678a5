use crate::auth::{AuthContext, use_auth};
use crate::components::common::{Load, LoadFailed, Spinner, spawn_call};
use inventory_console::{ApiError, CallSequence};
use inventory_shared::protocol::{
    CreateOrderRequest, ListOrdersRequest, OrderSummaryRequest, UpdateOrderStatusRequest,
};
use inventory_shared::{Order, OrderLine, OrderStatus, StatusTone, sort_newest_first};
use leptos::prelude::*;

const NO_SUMMARY: &str = "No summary available.";
const SUMMARY_FAILED: &str = "Failed to fetch summary. AI service might be busy.";

fn badge_class(tone: StatusTone) -> &'static str {
    match tone {
        StatusTone::Warning => "badge badge-warning",
        StatusTone::Info => "badge badge-info",
        StatusTone::Progress => "badge badge-secondary",
        StatusTone::Success => "badge badge-success",
        StatusTone::Danger => "badge badge-error",
        StatusTone::Neutral => "badge badge-ghost",
    }
}

/// 浏览器确认框，取消或不可用时返回 false
fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

fn failure_text(e: &ApiError) -> String {
    e.detail().unwrap_or_else(|| e.to_string())
}

/// 拉取订单列表，按 ID 倒序写入
///
/// 创建、履约都会触发刷新，只有最后发起的那次结果会写入。
fn refresh(
    ctx: AuthContext,
    sequence: StoredValue<CallSequence, LocalStorage>,
    target: WriteSignal<Load<Vec<Order>>>,
) {
    let Some(ticket) = sequence.try_with_value(CallSequence::begin) else {
        return;
    };
    spawn_call(ctx, ListOrdersRequest::default(), move |result| {
        if !ticket.is_latest() {
            tracing::debug!("stale orders response dropped");
            return;
        }
        match result {
            Ok(mut orders) => {
                sort_newest_first(&mut orders);
                target.try_set(Load::Ready(orders));
            }
            Err(e) => {
                tracing::warn!("orders load failed: {}", e);
                target.try_set(Load::Failed);
            }
        }
    });
}

/// 摘要弹窗内容
#[derive(Debug, Clone, PartialEq)]
struct SummaryModal {
    order_id: i64,
    title: String,
    content: String,
}

impl SummaryModal {
    fn pending(order_id: i64) -> Self {
        Self {
            order_id,
            title: format!("AI Summary for Order #{}", order_id),
            content: "Generating summary...".to_string(),
        }
    }

    /// 只接受同一订单的结果；弹窗已关闭或换了订单则丢弃
    fn fill(modal: &mut Option<SummaryModal>, order_id: i64, content: String) -> bool {
        match modal {
            Some(m) if m.order_id == order_id => {
                m.content = content;
                true
            }
            _ => false,
        }
    }
}

#[component]
pub fn OrdersPage() -> impl IntoView {
    let auth = use_auth();
    let (orders, set_orders) = signal(Load::<Vec<Order>>::Loading);
    let (creating, set_creating) = signal(false);
    let modal = RwSignal::new(Option::<SummaryModal>::None);
    let sequence = StoredValue::new_local(CallSequence::new());

    refresh(auth, sequence, set_orders);

    let create_test_order = move |_| {
        if !confirm("Create a test order (Product ID 1)?") {
            return;
        }
        set_creating.set(true);
        let req = CreateOrderRequest {
            items: vec![OrderLine {
                product_id: 1,
                quantity: 1,
            }],
        };
        spawn_call(auth, req, move |result| {
            match result {
                Ok(order) => {
                    tracing::info!(order_id = order.id, "test order created");
                    refresh(auth, sequence, set_orders);
                }
                Err(e) => alert(&format!("Failed: {}", failure_text(&e))),
            }
            set_creating.try_set(false);
        });
    };

    let fulfil = move |order_id: i64| {
        if !confirm("Mark order as fulfilled?") {
            return;
        }
        let req = UpdateOrderStatusRequest {
            order_id,
            status: OrderStatus::Fulfilled,
        };
        spawn_call(auth, req, move |result| match result {
            Ok(_) => refresh(auth, sequence, set_orders),
            Err(e) => alert(&format!("Failed to fulfill order: {}", failure_text(&e))),
        });
    };

    let show_summary = move |order_id: i64| {
        modal.set(Some(SummaryModal::pending(order_id)));
        spawn_call(auth, OrderSummaryRequest { order_id }, move |result| {
            let content = match result {
                Ok(summary) => summary
                    .summary
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| NO_SUMMARY.to_string()),
                Err(e) => {
                    tracing::warn!(order_id, "summary failed: {}", e);
                    SUMMARY_FAILED.to_string()
                }
            };
            modal.try_update(|m| {
                if !SummaryModal::fill(m, order_id, content) {
                    tracing::debug!(order_id, "summary for a closed modal dropped");
                }
            });
        });
    };

    let row = move |order: Order| {
        let id = order.id;
        let status = order.status;
        view! {
            <tr>
                <td class="font-medium">{format!("#{}", id)}</td>
                <td class="text-sm text-base-content/60">
                    {order.created_at.split('T').next().unwrap_or_default().to_string()}
                </td>
                <td><span class=badge_class(status.tone())>{status.as_str()}</span></td>
                <td class="text-right font-medium">{format!("₹{:.2}", order.total_amount)}</td>
                <td class="text-right space-x-2">
                    {status.can_fulfill().then(|| view! {
                        <button class="btn btn-xs btn-primary" on:click=move |_| fulfil(id)>
                            "Fulfill"
                        </button>
                    })}
                    <button class="btn btn-xs btn-ghost" on:click=move |_| show_summary(id)>
                        "AI Summary"
                    </button>
                </td>
            </tr>
        }
    };

    view! {
        <div class="space-y-6">
            <div class="flex justify-between items-center">
                <h1 class="text-2xl font-bold">"Order History"</h1>
                <button
                    class="btn btn-primary"
                    on:click=create_test_order
                    disabled=move || creating.get()
                >
                    {move || if creating.get() { "Creating..." } else { "New Order" }}
                </button>
            </div>

            {move || match orders.get() {
                Load::Loading => view! { <Spinner /> }.into_any(),
                Load::Failed => view! { <LoadFailed what="orders" /> }.into_any(),
                Load::Ready(list) => view! {
                    <div class="card bg-base-100 shadow overflow-x-auto">
                        <table class="table">
                            <thead>
                                <tr>
                                    <th>"Order ID"</th>
                                    <th>"Date"</th>
                                    <th>"Status"</th>
                                    <th class="text-right">"Total"</th>
                                    <th class="text-right">"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>{list.into_iter().map(row).collect_view()}</tbody>
                        </table>
                    </div>
                }
                .into_any(),
            }}

            {move || modal.get().map(|m| view! {
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="font-bold text-lg">{m.title}</h3>
                        <p class="py-4 whitespace-pre-wrap">{m.content}</p>
                        <div class="modal-action">
                            <button class="btn" on:click=move |_| modal.set(None)>"Close"</button>
                        </div>
                    </div>
                </div>
            })}
        </div>
    }
}
