//! 库存管理控制台的客户端层
//!
//! - `session`: 令牌存储（唯一权威来源）
//! - `request` / `api` / `interceptor`: 会话感知的 REST 客户端与全局 401 处理
//! - `route` / `guard`: 路由定义与守卫
//! - `alerts`: 实时告警通道
//! - `auth`: 登录、注册、注销
//!
//! 核心模块不绑定运行时；原生传输层在 `native` 中，浏览器传输层在 frontend crate 中。

pub mod alerts;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod interceptor;
pub mod request;
pub mod route;
pub mod session;

#[cfg(not(target_arch = "wasm32"))]
pub mod native;

pub use inventory_shared as shared;

pub use alerts::{
    AlertChannel, AlertEvent, AlertSink, ChannelEndpoint, ChannelState, ClientId, NoReconnect,
    ReconnectPolicy, SocketConnector,
};
pub use api::{ApiClient, CallSequence, CallTicket, OutboundRequest};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, ChannelError};
pub use guard::{GuardOutcome, Navigator, Redirect, RouteGuard};
pub use interceptor::{
    AuthFailureInterceptor, DiagnosticsInterceptor, InterceptorHandle, InterceptorRegistry,
    ResponseInterceptor,
};
pub use request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use route::AppRoute;
pub use session::{MemorySessionStore, SessionStore, SharedSession};
