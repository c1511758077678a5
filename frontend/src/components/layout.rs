use crate::components::alerts::AlertFeed;
use crate::components::chat::ChatWidget;
use crate::components::navbar::Navbar;
use leptos::prelude::*;

/// 受保护页面的公共布局：导航栏、告警提示、AI 助手
#[component]
pub fn AppLayout(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200">
            <Navbar />
            <AlertFeed />
            <main class="max-w-7xl mx-auto p-8">{children()}</main>
            <ChatWidget />
        </div>
    }
}
