//! 原生 Web API 封装模块
//!
//! 核心库各接口的浏览器实现：fetch、localStorage、WebSocket、History API。

mod http;
pub mod router;
mod socket;
mod storage;

pub use http::FetchHttpClient;
pub use socket::BrowserSocketConnector;
pub use storage::BrowserSessionStore;
