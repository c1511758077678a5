use crate::auth::use_auth;
use crate::components::common::spawn_call;
use inventory_shared::protocol::ChatRequest;
use leptos::prelude::*;

const GREETING: &str =
    "Hello! I am your AI Business Assistant. Ask me about your inventory, orders, or revenue.";
const FAILURE: &str = "Sorry, I encountered an error connecting to my services.";

#[derive(Debug, Clone, PartialEq)]
struct ChatMessage {
    from_user: bool,
    content: String,
}

/// 右下角的 AI 助手
#[component]
pub fn ChatWidget() -> impl IntoView {
    let auth = use_auth();
    let (is_open, set_is_open) = signal(false);
    let (input, set_input) = signal(String::new());
    let (loading, set_loading) = signal(false);
    let messages = RwSignal::new(vec![ChatMessage {
        from_user: false,
        content: GREETING.to_string(),
    }]);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = input.get_untracked();
        if text.trim().is_empty() {
            return;
        }
        messages.update(|list| {
            list.push(ChatMessage {
                from_user: true,
                content: text.clone(),
            })
        });
        set_input.set(String::new());
        set_loading.set(true);

        spawn_call(auth, ChatRequest::from_dashboard(text), move |result| {
            let content = match result {
                Ok(reply) => reply.response,
                Err(e) => {
                    tracing::warn!("chat failed: {}", e);
                    FAILURE.to_string()
                }
            };
            messages.try_update(|list| {
                list.push(ChatMessage {
                    from_user: false,
                    content,
                })
            });
            set_loading.try_set(false);
        });
    };

    view! {
        <Show
            when=move || is_open.get()
            fallback=move || view! {
                <button
                    class="btn btn-primary fixed bottom-6 right-6 shadow-lg z-50"
                    on:click=move |_| set_is_open.set(true)
                >
                    "Ask AI"
                </button>
            }
        >
            <div class="fixed bottom-6 right-6 w-96 h-[500px] card bg-base-100 shadow-2xl z-50">
                <div class="flex justify-between items-center p-4 bg-primary text-primary-content rounded-t-2xl">
                    <h3 class="font-semibold">"AI Assistant"</h3>
                    <button class="btn btn-ghost btn-xs" on:click=move |_| set_is_open.set(false)>
                        "✕"
                    </button>
                </div>
                <div class="flex-1 overflow-y-auto p-4 space-y-3">
                    {move || {
                        messages
                            .get()
                            .into_iter()
                            .map(|msg| {
                                let class = if msg.from_user { "chat chat-end" } else { "chat chat-start" };
                                view! {
                                    <div class=class>
                                        <div class="chat-bubble whitespace-pre-wrap">{msg.content}</div>
                                    </div>
                                }
                            })
                            .collect_view()
                    }}
                    <Show when=move || loading.get()>
                        <span class="loading loading-dots loading-sm"></span>
                    </Show>
                </div>
                <form class="p-3 flex gap-2" on:submit=on_submit>
                    <input
                        type="text"
                        class="input input-bordered input-sm flex-1"
                        placeholder="Ask about sales, stock..."
                        on:input=move |ev| set_input.set(event_target_value(&ev))
                        prop:value=input
                    />
                    <button class="btn btn-primary btn-sm" disabled=move || loading.get()>
                        "Send"
                    </button>
                </form>
            </div>
        </Show>
    }
}
