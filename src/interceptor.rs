//! 响应拦截器
//!
//! 拦截器注册表由 [`crate::api::ApiClient`] 实例持有，而不是进程级单例。
//! `install` 返回 [`InterceptorHandle`]：显式 `dispose` 或 drop 时撤销注册。
//!
//! 同一个拦截器实例重复安装采用引用计数：副作用只触发一次，
//! 直到所有句柄都释放后才真正移除。

use crate::error::ApiError;
use crate::guard::{Navigator, Redirect};
use crate::request::HttpMethod;
use crate::route::AppRoute;
use crate::session::SharedSession;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// 失败请求的元信息
#[derive(Debug, Clone, PartialEq)]
pub struct FailedRequest {
    pub method: HttpMethod,
    pub path: String,
    /// 是否为需要认证的调用（登录等匿名调用的 401 表示凭据错误，而不是会话过期）
    pub requires_auth: bool,
}

/// 失败响应拦截器
///
/// 在失败结果交给调用方之前被同步调用，只能观察不能吞掉错误。
pub trait ResponseInterceptor {
    fn on_error(&self, request: &FailedRequest, error: &ApiError);
}

struct Entry {
    id: u64,
    interceptor: Rc<dyn ResponseInterceptor>,
    installs: usize,
}

#[derive(Default)]
struct RegistryInner {
    entries: RefCell<Vec<Entry>>,
    next_id: Cell<u64>,
}

fn same_instance(a: &Rc<dyn ResponseInterceptor>, b: &Rc<dyn ResponseInterceptor>) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

/// 拦截器注册表
#[derive(Clone, Default)]
pub struct InterceptorRegistry {
    inner: Rc<RegistryInner>,
}

impl InterceptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 安装拦截器，返回作用域句柄
    pub fn install(&self, interceptor: Rc<dyn ResponseInterceptor>) -> InterceptorHandle {
        let mut entries = self.inner.entries.borrow_mut();
        let id = match entries
            .iter_mut()
            .find(|e| same_instance(&e.interceptor, &interceptor))
        {
            Some(entry) => {
                entry.installs += 1;
                tracing::debug!(
                    id = entry.id,
                    installs = entry.installs,
                    "interceptor already installed"
                );
                entry.id
            }
            None => {
                let id = self.inner.next_id.get();
                self.inner.next_id.set(id + 1);
                entries.push(Entry {
                    id,
                    interceptor,
                    installs: 1,
                });
                tracing::debug!(id, "interceptor installed");
                id
            }
        };

        InterceptorHandle {
            registry: Rc::downgrade(&self.inner),
            id,
            active: true,
        }
    }

    /// 当前生效的拦截器数量（同一实例只计一次）
    pub fn active_count(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    pub fn is_installed(&self, interceptor: &Rc<dyn ResponseInterceptor>) -> bool {
        self.inner
            .entries
            .borrow()
            .iter()
            .any(|e| same_instance(&e.interceptor, interceptor))
    }

    /// 依次通知所有拦截器
    pub(crate) fn notify_error(&self, request: &FailedRequest, error: &ApiError) {
        // 先取快照，拦截器内部可以安全地安装/撤销其他拦截器
        let snapshot: Vec<Rc<dyn ResponseInterceptor>> = self
            .inner
            .entries
            .borrow()
            .iter()
            .map(|e| e.interceptor.clone())
            .collect();

        for interceptor in snapshot {
            interceptor.on_error(request, error);
        }
    }
}

/// 拦截器注册句柄
///
/// 句柄被 drop 时自动撤销注册。
#[must_use = "dropping the handle uninstalls the interceptor"]
pub struct InterceptorHandle {
    registry: Weak<RegistryInner>,
    id: u64,
    active: bool,
}

impl InterceptorHandle {
    /// 撤销本次安装
    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        // 注册表已经随客户端销毁，无需处理
        let Some(inner) = self.registry.upgrade() else {
            return;
        };
        let mut entries = inner.entries.borrow_mut();
        if let Some(pos) = entries.iter().position(|e| e.id == self.id) {
            entries[pos].installs -= 1;
            if entries[pos].installs == 0 {
                entries.remove(pos);
                tracing::debug!(id = self.id, "interceptor uninstalled");
            }
        }
    }
}

impl Drop for InterceptorHandle {
    fn drop(&mut self) {
        self.release();
    }
}

// =========================================================
// 内置拦截器
// =========================================================

/// 全局 401 处理
///
/// 顺序：清除会话 -> 重定向到登录页 -> 错误继续返回给原调用方。
pub struct AuthFailureInterceptor {
    session: SharedSession,
    navigator: Rc<dyn Navigator>,
}

impl AuthFailureInterceptor {
    pub fn new(session: SharedSession, navigator: Rc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }
}

impl ResponseInterceptor for AuthFailureInterceptor {
    fn on_error(&self, request: &FailedRequest, error: &ApiError) {
        if !error.is_unauthorized() || !request.requires_auth {
            return;
        }
        tracing::info!(
            path = %request.path,
            "session expired or invalid token, redirecting to login"
        );
        self.session.clear_token();
        self.navigator
            .redirect(Redirect::replace(AppRoute::auth_failure_redirect()));
    }
}

/// 把非认证类失败写入诊断日志
#[derive(Default)]
pub struct DiagnosticsInterceptor;

impl ResponseInterceptor for DiagnosticsInterceptor {
    fn on_error(&self, request: &FailedRequest, error: &ApiError) {
        if error.is_unauthorized() && request.requires_auth {
            return;
        }
        tracing::warn!(
            method = request.method.as_str(),
            path = %request.path,
            status = ?error.status_code(),
            "request failed: {}",
            error
        );
    }
}

#[cfg(test)]
mod tests;
