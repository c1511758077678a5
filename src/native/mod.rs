//! 原生平台实现
//!
//! 浏览器端的对应实现位于 frontend crate（fetch / localStorage / WebSocket）。

mod http;
mod socket;
mod storage;
mod timer;

pub use http::ReqwestHttpClient;
pub use socket::TungsteniteConnector;
pub use storage::FileSessionStore;
pub use timer::FixedBackoff;
