//! 认证模块
//!
//! 持有应用级服务（API 客户端、会话存储、拦截器句柄），通过 Context 共享。
//! 认证状态不另存信号：是否已登录始终以会话存储为准。

use crate::web::router::{HistoryNavigator, RouterService};
use crate::web::{BrowserSessionStore, FetchHttpClient};
use inventory_console::{
    ApiClient, AuthFailureInterceptor, ClientConfig, DiagnosticsInterceptor, InterceptorHandle,
    SessionStore, SharedSession,
};
use leptos::prelude::*;
use std::rc::Rc;

pub type Api = ApiClient<FetchHttpClient>;

/// 应用级服务
///
/// 拦截器句柄与服务同生命周期，服务被释放时拦截器随之卸载。
pub struct Services {
    pub config: ClientConfig,
    pub api: Rc<Api>,
    pub session: SharedSession,
    _interceptors: [InterceptorHandle; 2],
}

impl Services {
    pub fn new(config: ClientConfig, session: SharedSession, navigator: HistoryNavigator) -> Self {
        let api = ApiClient::new(config.api_base.clone(), FetchHttpClient, session.clone());
        let auth = api.install(Rc::new(AuthFailureInterceptor::new(
            session.clone(),
            Rc::new(navigator),
        )));
        let diagnostics = api.install(Rc::new(DiagnosticsInterceptor));

        Self {
            config,
            api: Rc::new(api),
            session,
            _interceptors: [auth, diagnostics],
        }
    }
}

/// 创建浏览器会话存储
pub fn browser_session(config: &ClientConfig) -> SharedSession {
    Rc::new(BrowserSessionStore::new(config.token_key.clone()))
}

/// 认证上下文
///
/// 服务不是 Send，存放在本地 arena 中，上下文本身可以随意复制。
#[derive(Clone, Copy)]
pub struct AuthContext {
    services: StoredValue<Services, LocalStorage>,
    router: RouterService,
}

impl AuthContext {
    pub fn new(services: Services, router: RouterService) -> Self {
        Self {
            services: StoredValue::new_local(services),
            router,
        }
    }

    pub fn api(&self) -> Option<Rc<Api>> {
        self.services.try_with_value(|s| s.api.clone())
    }

    pub fn config(&self) -> Option<ClientConfig> {
        self.services.try_with_value(|s| s.config.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.services
            .try_with_value(|s| s.session.is_authenticated())
            .unwrap_or(false)
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

/// 登录，成功后进入控制面板
///
/// 失败时返回可直接展示的错误说明。
pub async fn login(ctx: AuthContext, email: String, password: String) -> Result<(), String> {
    let api = ctx.api().ok_or_else(|| "服务未初始化".to_string())?;
    inventory_console::auth::login(api.as_ref(), &email, &password)
        .await
        .map_err(|e| e.detail().unwrap_or_else(|| e.to_string()))?;
    ctx.router
        .navigate(inventory_console::AppRoute::auth_success_redirect().to_path());
    Ok(())
}

/// 注销并回到登录页
pub fn logout(ctx: AuthContext) {
    let navigator = ctx.router.navigator();
    let _ = ctx.services.try_with_value(|s| {
        inventory_console::auth::logout(s.session.as_ref(), &navigator);
    });
}
