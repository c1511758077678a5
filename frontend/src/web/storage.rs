//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 访问浏览器本地存储，并在此之上实现会话存储。

use inventory_console::SessionStore;

/// 本地存储操作封装
///
/// 提供静态方法访问浏览器 LocalStorage API。
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例（隐私模式或被禁用时为 None）
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 获取存储的字符串值
    ///
    /// # 返回
    /// - `Some(String)` 如果键存在且有值
    /// - `None` 如果键不存在或发生错误
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// 设置存储值，返回是否成功
    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    /// 删除存储的键值对，返回是否成功
    pub fn delete(key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

/// 基于 localStorage 的会话存储
///
/// 令牌以纯文本保存在单个键下，刷新页面后依然有效。
#[derive(Debug, Clone)]
pub struct BrowserSessionStore {
    key: String,
}

impl BrowserSessionStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl SessionStore for BrowserSessionStore {
    fn get_token(&self) -> Option<String> {
        LocalStorage::get(&self.key)
    }

    fn set_token(&self, token: &str) {
        if !LocalStorage::set(&self.key, token) {
            tracing::warn!(key = %self.key, "failed to persist token to localStorage");
        }
    }

    fn clear_token(&self) {
        if !LocalStorage::delete(&self.key) {
            tracing::warn!(key = %self.key, "failed to remove token from localStorage");
        }
    }
}
