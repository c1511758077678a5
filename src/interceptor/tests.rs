use super::*;
use crate::session::{MemorySessionStore, SessionStore};

// =========================================================
// Shared Mock Components
// =========================================================

#[derive(Default)]
struct RecordingNavigator {
    redirects: RefCell<Vec<Redirect>>,
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, redirect: Redirect) {
        self.redirects.borrow_mut().push(redirect);
    }
}

#[derive(Default)]
struct CountingInterceptor {
    seen: Cell<usize>,
}

impl ResponseInterceptor for CountingInterceptor {
    fn on_error(&self, _request: &FailedRequest, _error: &ApiError) {
        self.seen.set(self.seen.get() + 1);
    }
}

fn unauthorized() -> ApiError {
    ApiError::from_status(401, "Could not validate credentials")
}

fn authed(path: &str) -> FailedRequest {
    FailedRequest {
        method: HttpMethod::Get,
        path: path.to_string(),
        requires_auth: true,
    }
}

// =========================================================
// Tests
// =========================================================

#[test]
fn test_install_twice_dispose_once_keeps_one_active() {
    let registry = InterceptorRegistry::new();
    let counter = Rc::new(CountingInterceptor::default());
    let as_dyn: Rc<dyn ResponseInterceptor> = counter.clone();

    let first = registry.install(as_dyn.clone());
    let second = registry.install(as_dyn.clone());
    assert_eq!(registry.active_count(), 1);

    registry.notify_error(&authed("/api/v1/orders/"), &unauthorized());
    assert_eq!(counter.seen.get(), 1, "side effect must fire once");

    first.dispose();
    assert_eq!(registry.active_count(), 1);
    assert!(registry.is_installed(&as_dyn));

    registry.notify_error(&authed("/api/v1/orders/"), &unauthorized());
    assert_eq!(counter.seen.get(), 2);

    second.dispose();
    assert_eq!(registry.active_count(), 0);
    registry.notify_error(&authed("/api/v1/orders/"), &unauthorized());
    assert_eq!(counter.seen.get(), 2);
}

#[test]
fn test_drop_uninstalls() {
    let registry = InterceptorRegistry::new();
    {
        let _handle = registry.install(Rc::new(DiagnosticsInterceptor));
        assert_eq!(registry.active_count(), 1);
    }
    assert_eq!(registry.active_count(), 0);
}

#[test]
fn test_distinct_instances_are_separate_entries() {
    let registry = InterceptorRegistry::new();
    let _a = registry.install(Rc::new(CountingInterceptor::default()));
    let _b = registry.install(Rc::new(CountingInterceptor::default()));
    assert_eq!(registry.active_count(), 2);
}

#[test]
fn test_handle_outliving_registry_is_harmless() {
    let registry = InterceptorRegistry::new();
    let handle = registry.install(Rc::new(DiagnosticsInterceptor));
    drop(registry);
    handle.dispose();
}

#[test]
fn test_auth_failure_clears_session_then_redirects() {
    let session = Rc::new(MemorySessionStore::with_token("abc123"));
    let navigator = Rc::new(RecordingNavigator::default());
    let interceptor = AuthFailureInterceptor::new(session.clone(), navigator.clone());

    interceptor.on_error(&authed("/api/v1/orders/"), &unauthorized());

    assert_eq!(session.get_token(), None);
    assert_eq!(
        *navigator.redirects.borrow(),
        vec![Redirect::replace(AppRoute::Login)]
    );
}

#[test]
fn test_auth_failure_ignores_other_errors() {
    let session = Rc::new(MemorySessionStore::with_token("abc123"));
    let navigator = Rc::new(RecordingNavigator::default());
    let interceptor = AuthFailureInterceptor::new(session.clone(), navigator.clone());

    let req = authed("/api/v1/orders/9");
    interceptor.on_error(&req, &ApiError::from_status(403, "Not authorized"));
    interceptor.on_error(&req, &ApiError::from_status(500, "boom"));
    interceptor.on_error(&req, &ApiError::Network("connection reset".into()));

    assert_eq!(session.get_token().as_deref(), Some("abc123"));
    assert!(navigator.redirects.borrow().is_empty());
}

#[test]
fn test_interceptor_may_dispose_itself_during_notification() {
    struct SelfRemoving {
        handle: RefCell<Option<InterceptorHandle>>,
    }

    impl ResponseInterceptor for SelfRemoving {
        fn on_error(&self, _request: &FailedRequest, _error: &ApiError) {
            if let Some(handle) = self.handle.borrow_mut().take() {
                handle.dispose();
            }
        }
    }

    let registry = InterceptorRegistry::new();
    let interceptor = Rc::new(SelfRemoving {
        handle: RefCell::new(None),
    });
    let handle = registry.install(interceptor.clone());
    *interceptor.handle.borrow_mut() = Some(handle);

    registry.notify_error(&authed("/api/v1/orders/"), &unauthorized());
    assert_eq!(registry.active_count(), 0);
}

#[test]
fn test_anonymous_401_is_a_credential_error_not_expiry() {
    let session = Rc::new(MemorySessionStore::new());
    let navigator = Rc::new(RecordingNavigator::default());
    let interceptor = AuthFailureInterceptor::new(session.clone(), navigator.clone());

    let login = FailedRequest {
        method: HttpMethod::Post,
        path: "/api/v1/auth/login".into(),
        requires_auth: false,
    };
    interceptor.on_error(&login, &unauthorized());

    assert!(navigator.redirects.borrow().is_empty());
}
