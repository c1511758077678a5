//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 导航流程："请求 -> 守卫决策 -> 写入 History -> 更新视图"。
//! 守卫决策本身由核心库的 [`RouteGuard`] 完成，这里只负责执行。

use inventory_console::{AppRoute, GuardOutcome, Navigator, Redirect, RouteGuard, SharedSession};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 写入 History 状态
fn write_history(path: &str, replace: bool) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let result = if replace {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path))
    } else {
        history.push_state_with_url(&JsValue::NULL, "", Some(path))
    };
    if let Err(e) = result {
        tracing::warn!(path, "history update failed: {:?}", e);
    }
}

/// 一次导航需要落实的改动
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Commit {
    /// 地址栏与目标路径不一致时才写 History
    write_history: bool,
    /// 路由变化时才通知信号，避免重建当前页面
    notify: bool,
}

fn plan(current: AppRoute, location: &str, target: AppRoute) -> Commit {
    Commit {
        write_history: location != target.to_path(),
        notify: current != target,
    }
}

/// History API 导航器
///
/// 401 拦截器和注销流程通过它强制跳转。只持有信号句柄，可以随意复制。
#[derive(Clone, Copy)]
pub struct HistoryNavigator {
    route: RwSignal<AppRoute>,
}

impl HistoryNavigator {
    fn commit(&self, target: AppRoute, replace: bool) {
        let commit = plan(self.route.get_untracked(), &current_path(), target);
        if commit.write_history {
            write_history(target.to_path(), replace);
        }
        if commit.notify {
            self.route.set(target);
        }
    }
}

impl Navigator for HistoryNavigator {
    fn redirect(&self, redirect: Redirect) {
        tracing::debug!(to = %redirect.to, replace = redirect.replace, "[Router] redirect");
        self.commit(redirect.to, redirect.replace);
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 守卫每次导航都直接读取会话存储，不缓存认证状态。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    navigator: HistoryNavigator,
    /// 会话存储不是 Send，放在本地 arena 中
    guard: StoredValue<RouteGuard, LocalStorage>,
}

impl RouterService {
    fn new(session: SharedSession) -> Self {
        let route = RwSignal::new(AppRoute::Login);
        let router = Self {
            current_route: route.read_only(),
            navigator: HistoryNavigator { route },
            guard: StoredValue::new_local(RouteGuard::new(session)),
        };

        // 初始地址同样经过守卫（替换而不是压栈）
        router.apply(&current_path(), true);
        router
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    pub fn navigator(&self) -> HistoryNavigator {
        self.navigator
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        self.apply(path, false);
    }

    fn apply(&self, path: &str, replace: bool) {
        let outcome = self
            .guard
            .try_with_value(|guard| guard.evaluate(path))
            .unwrap_or(GuardOutcome::Redirect(Redirect::replace(AppRoute::Login)));

        match outcome {
            GuardOutcome::Render(route) => self.navigator.commit(route, replace),
            GuardOutcome::Redirect(redirect) => self.navigator.redirect(redirect),
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        // popstate 时地址栏已经变化，守卫只能用 replace 修正
        let closure = Closure::<dyn Fn()>::new(move || {
            router.apply(&current_path(), true);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: SharedSession) -> RouterService {
    let router = RouterService::new(session);
    router.init_popstate_listener();
    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    expect_context::<RouterService>()
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话存储，由守卫在每次导航时读取
    session: SharedSession,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(to.to_path());
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
