//! 会话存储模块
//!
//! 认证令牌的唯一权威来源。所有出站请求、路由守卫和 401 拦截器都通过
//! [`SessionStore`] 读写令牌，而不是各自缓存一份。

use std::cell::RefCell;
use std::rc::Rc;

/// 令牌存储接口
///
/// 单线程环境下通过内部可变性共享（`&self` 写入）。
/// 客户端不校验令牌格式或过期时间，过期只能通过一次失败的认证请求发现。
pub trait SessionStore {
    /// 读取当前令牌
    fn get_token(&self) -> Option<String>;

    /// 持久化令牌（覆盖旧值）
    fn set_token(&self, token: &str);

    /// 删除令牌，之后 `get_token` 返回 `None`
    fn clear_token(&self);

    /// 存在非空令牌即视为已认证
    fn is_authenticated(&self) -> bool {
        self.get_token().is_some_and(|t| !t.is_empty())
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Rc<S> {
    fn get_token(&self) -> Option<String> {
        (**self).get_token()
    }

    fn set_token(&self, token: &str) {
        (**self).set_token(token)
    }

    fn clear_token(&self) {
        (**self).clear_token()
    }
}

/// 共享的会话句柄
pub type SharedSession = Rc<dyn SessionStore>;

/// 内存会话存储
///
/// 用于测试和不需要持久化的嵌入场景。
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: RefCell<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: RefCell::new(Some(token.to_string())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get_token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn set_token(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_string());
    }

    fn clear_token(&self) {
        self.token.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_lifecycle() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get_token(), None);
        assert!(!store.is_authenticated());

        store.set_token("abc123");
        assert_eq!(store.get_token().as_deref(), Some("abc123"));
        assert!(store.is_authenticated());

        store.set_token("rotated");
        assert_eq!(store.get_token().as_deref(), Some("rotated"));

        store.clear_token();
        assert_eq!(store.get_token(), None);
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let store = MemorySessionStore::with_token("");
        assert_eq!(store.get_token().as_deref(), Some(""));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_shared_handle_sees_writes() {
        let store: SharedSession = Rc::new(MemorySessionStore::new());
        let reader = store.clone();
        store.set_token("t1");
        assert_eq!(reader.get_token().as_deref(), Some("t1"));
        store.clear_token();
        assert!(!reader.is_authenticated());
    }
}
