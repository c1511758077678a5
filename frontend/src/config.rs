//! 浏览器端配置
//!
//! REST 请求走页面同源（由开发服务器或网关转发），
//! 告警服务与页面同主机、固定端口，协议跟随页面（https 页面使用 wss）。

use inventory_console::ClientConfig;
use inventory_console::alerts::DEFAULT_ALERT_PORT;
use inventory_console::config::DEFAULT_TOKEN_KEY;

pub fn from_location() -> ClientConfig {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return ClientConfig::default();
    };
    let hostname = location
        .hostname()
        .ok()
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string());
    let secure = location.protocol().is_ok_and(|p| p == "https:");
    let api_base = location.origin().unwrap_or_default();

    ClientConfig {
        api_base,
        alert_host: hostname,
        alert_port: DEFAULT_ALERT_PORT,
        alert_secure: secure,
        token_key: DEFAULT_TOKEN_KEY.to_string(),
    }
}
