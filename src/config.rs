//! 客户端运行时配置
//!
//! 默认值为常量，可被环境变量覆盖。浏览器端不读环境变量，
//! 而是由 frontend 根据 `window.location` 构造。

use crate::alerts::{ChannelEndpoint, DEFAULT_ALERT_PORT};

// =========================================================
// 默认值
// =========================================================

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const DEFAULT_ALERT_HOST: &str = "localhost";
/// 浏览器端 localStorage 的键名，原生端作为令牌文件名
pub const DEFAULT_TOKEN_KEY: &str = "token";

pub const ENV_API_BASE: &str = "INVENTORY_API_BASE";
pub const ENV_ALERT_HOST: &str = "INVENTORY_ALERT_HOST";
pub const ENV_ALERT_PORT: &str = "INVENTORY_ALERT_PORT";
pub const ENV_ALERT_SECURE: &str = "INVENTORY_ALERT_SECURE";
pub const ENV_TOKEN_KEY: &str = "INVENTORY_TOKEN_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// REST 服务根地址，不含 `/api/v1`
    pub api_base: String,
    pub alert_host: String,
    pub alert_port: u16,
    pub alert_secure: bool,
    pub token_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            alert_host: DEFAULT_ALERT_HOST.to_string(),
            alert_port: DEFAULT_ALERT_PORT,
            alert_secure: false,
            token_key: DEFAULT_TOKEN_KEY.to_string(),
        }
    }
}

impl ClientConfig {
    /// 从进程环境变量读取
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取，读不到或解析失败就用默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let alert_port = match read(ENV_ALERT_PORT) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid {}, using default", ENV_ALERT_PORT);
                defaults.alert_port
            }),
            None => defaults.alert_port,
        };

        let alert_secure = read(ENV_ALERT_SECURE)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.alert_secure);

        Self {
            api_base: read(ENV_API_BASE)
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            alert_host: read(ENV_ALERT_HOST).unwrap_or(defaults.alert_host),
            alert_port,
            alert_secure,
            token_key: read(ENV_TOKEN_KEY).unwrap_or(defaults.token_key),
        }
    }

    pub fn endpoint(&self) -> ChannelEndpoint {
        ChannelEndpoint::new(self.alert_host.clone())
            .with_port(self.alert_port)
            .with_secure(self.alert_secure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.token_key, "token");
        assert_eq!(config.endpoint().port, 8000);
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_BASE, "https://shop.example.com/"),
            (ENV_ALERT_HOST, "shop.example.com"),
            (ENV_ALERT_PORT, "9443"),
            (ENV_ALERT_SECURE, "TRUE"),
            (ENV_TOKEN_KEY, "inventory-token"),
        ]));
        assert_eq!(config.api_base, "https://shop.example.com");
        assert_eq!(config.token_key, "inventory-token");
        assert_eq!(
            config.endpoint(),
            ChannelEndpoint::new("shop.example.com")
                .with_port(9443)
                .with_secure(true)
        );
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_ALERT_PORT, "eight thousand"),
            (ENV_ALERT_SECURE, "maybe"),
            (ENV_API_BASE, "   "),
        ]));
        assert_eq!(config.alert_port, DEFAULT_ALERT_PORT);
        assert!(!config.alert_secure);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }
}
