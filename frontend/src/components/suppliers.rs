use crate::auth::use_auth;
use crate::components::common::{Load, LoadFailed, Spinner, load_into, spawn_call};
use inventory_shared::protocol::{CreateSupplierRequest, ListSuppliersRequest};
use inventory_shared::{Supplier, SupplierDraft};
use leptos::prelude::*;

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[component]
pub fn SuppliersPage() -> impl IntoView {
    let auth = use_auth();
    let (data, set_data) = signal(Load::<Vec<Supplier>>::Loading);
    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (phone, set_phone) = signal(String::new());
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    load_into(auth, ListSuppliersRequest, set_data);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = SupplierDraft {
            name: name.get_untracked().trim().to_string(),
            contact_email: non_empty(email.get_untracked()),
            phone: non_empty(phone.get_untracked()),
        };
        if draft.name.is_empty() {
            set_error_msg.set(Some("Supplier name is required".to_string()));
            return;
        }

        spawn_call(auth, CreateSupplierRequest(draft), move |result| match result {
            Ok(_) => {
                set_error_msg.try_set(None);
                set_name.try_set(String::new());
                set_email.try_set(String::new());
                set_phone.try_set(String::new());
                load_into(auth, ListSuppliersRequest, set_data);
            }
            Err(e) => {
                set_error_msg.try_set(Some(format!("Failed to create supplier: {}", e)));
            }
        });
    };

    view! {
        <div class="space-y-6">
            <h1 class="text-2xl font-bold">"Suppliers"</h1>

            <form class="card bg-base-100 shadow p-4 flex flex-row flex-wrap gap-2 items-end" on:submit=on_submit>
                <input
                    class="input input-bordered input-sm"
                    placeholder="Name"
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                    prop:value=name
                />
                <input
                    class="input input-bordered input-sm"
                    type="email"
                    placeholder="Contact email"
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                    prop:value=email
                />
                <input
                    class="input input-bordered input-sm"
                    placeholder="Phone"
                    on:input=move |ev| set_phone.set(event_target_value(&ev))
                    prop:value=phone
                />
                <button class="btn btn-primary btn-sm">"Add Supplier"</button>
            </form>

            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error text-sm">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>

            {move || match data.get() {
                Load::Loading => view! { <Spinner /> }.into_any(),
                Load::Failed => view! { <LoadFailed what="suppliers" /> }.into_any(),
                Load::Ready(suppliers) => view! {
                    <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                        {suppliers
                            .into_iter()
                            .map(|s| view! {
                                <div class="card bg-base-100 shadow p-4">
                                    <h2 class="font-semibold">{s.base.name}</h2>
                                    <p class="text-sm">{s.base.contact_email.unwrap_or_default()}</p>
                                    <p class="text-sm">{s.base.phone.unwrap_or_default()}</p>
                                    <p class="text-sm text-base-content/60">
                                        {format!("On-time delivery: {:.0}%", s.on_time_delivery_rate * 100.0)}
                                    </p>
                                </div>
                            })
                            .collect_view()}
                    </div>
                }
                .into_any(),
            }}
        </div>
    }
}
