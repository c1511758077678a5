//! 库存管理控制台前端
//!
//! 采用 Context-Driven 架构：
//! - `web::router`: 路由服务（History API + 守卫）
//! - `auth`: 应用级服务与认证上下文
//! - `components`: UI 组件层
//!
//! 会话、守卫、API 与告警通道的逻辑都在核心库中，这里只提供浏览器实现和界面。

mod auth;
mod config;
pub mod logging;
pub(crate) mod web;
mod components {
    pub mod alerts;
    pub mod chat;
    pub mod common;
    pub mod dashboard;
    pub mod layout;
    pub mod login;
    pub mod navbar;
    pub mod orders;
    pub mod products;
    pub mod suppliers;
}

use crate::auth::{AuthContext, Services};
use crate::components::dashboard::DashboardPage;
use crate::components::layout::AppLayout;
use crate::components::login::LoginPage;
use crate::components::orders::OrdersPage;
use crate::components::products::ProductsPage;
use crate::components::suppliers::SuppliersPage;

use inventory_console::{AppRoute, ClientConfig};
use leptos::prelude::*;

use web::router::{Router, RouterOutlet, use_router};

/// 路由匹配函数
///
/// 受保护页面统一套上布局；守卫已保证未登录时不会走到这里。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Dashboard => view! { <AppLayout><DashboardPage /></AppLayout> }.into_any(),
        AppRoute::Products => view! { <AppLayout><ProductsPage /></AppLayout> }.into_any(),
        AppRoute::Orders => view! { <AppLayout><OrdersPage /></AppLayout> }.into_any(),
        AppRoute::Suppliers => view! { <AppLayout><SuppliersPage /></AppLayout> }.into_any(),
    }
}

/// 路由上下文就绪后再组装服务，401 拦截器需要路由器的导航器
///
/// 会话存储只是 localStorage 的视图，守卫和服务各持一份读到的是同一份令牌。
#[component]
fn Shell(config: ClientConfig) -> impl IntoView {
    let router = use_router();
    let session = auth::browser_session(&config);
    let services = Services::new(config, session, router.navigator());
    provide_context(AuthContext::new(services, router));

    view! { <RouterOutlet matcher=route_matcher /> }
}

#[component]
pub fn App() -> impl IntoView {
    let config = config::from_location();
    let session = auth::browser_session(&config);

    view! {
        <Router session=session>
            <Shell config=config />
        </Router>
    }
}
