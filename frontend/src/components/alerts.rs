//! 实时告警提示
//!
//! 页面挂载时建立告警连接，卸载时连接随通道一起释放。

use crate::auth::use_auth;
use crate::web::BrowserSocketConnector;
use inventory_console::{AlertChannel, AlertEvent};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;

/// 最多保留的提示条数
const MAX_VISIBLE: usize = 5;

#[component]
pub fn AlertFeed() -> impl IntoView {
    let auth = use_auth();
    let alerts = RwSignal::new(Vec::<String>::new());

    let sink = move |event: AlertEvent| {
        alerts.try_update(|list| {
            list.push(event.payload);
            if list.len() > MAX_VISIBLE {
                list.remove(0);
            }
        });
    };

    if let Some(config) = auth.config() {
        let channel = AlertChannel::new(
            config.endpoint(),
            Rc::new(BrowserSocketConnector),
            Rc::new(sink),
        );
        spawn_local(channel.mount());
        // 随组件所有者释放，drop 时关闭连接
        StoredValue::new_local(channel);
    }

    view! {
        <div class="toast toast-end toast-bottom z-40">
            <For
                each=move || alerts.get().into_iter().enumerate()
                key=|(idx, payload)| (*idx, payload.clone())
                children=move |(idx, payload)| {
                    view! {
                        <div role="alert" class="alert alert-info shadow">
                            <span class="text-sm">{payload}</span>
                            <button
                                class="btn btn-ghost btn-xs"
                                on:click=move |_| {
                                    alerts.update(|list| {
                                        if idx < list.len() {
                                            list.remove(idx);
                                        }
                                    })
                                }
                            >
                                "✕"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
