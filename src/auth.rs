//! 认证流程
//!
//! 登录/注册成功后把令牌写入会话存储，注销时清除令牌并回到登录页。
//! 认证状态不另存一份，路由守卫和请求层都直接读取 [`SessionStore`]。

use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::guard::{Navigator, Redirect};
use crate::request::HttpClient;
use crate::route::AppRoute;
use crate::session::SessionStore;
use inventory_shared::AccessToken;
use inventory_shared::protocol::{LoginRequest, SignupRequest};

/// 使用邮箱和密码登录
///
/// 失败时（包括 401 凭据错误）会话保持不变，错误原样返回给登录页展示。
pub async fn login<C: HttpClient>(
    api: &ApiClient<C>,
    email: &str,
    password: &str,
) -> ApiResult<AccessToken> {
    let token = api
        .call(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await?;
    api.session().set_token(&token.access_token);
    tracing::info!(email, "login succeeded");
    Ok(token)
}

/// 注册新账号，成功后直接进入已登录状态
pub async fn signup<C: HttpClient>(
    api: &ApiClient<C>,
    email: &str,
    password: &str,
) -> ApiResult<AccessToken> {
    let token = api
        .call(&SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await?;
    api.session().set_token(&token.access_token);
    tracing::info!(email, "signup succeeded");
    Ok(token)
}

/// 注销：清除令牌并导航到登录页
pub fn logout(session: &dyn SessionStore, navigator: &dyn Navigator) {
    session.clear_token();
    navigator.redirect(Redirect::push(AppRoute::Login));
    tracing::info!("logged out");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::interceptor::AuthFailureInterceptor;
    use crate::request::{HttpRequest, HttpResponse};
    use crate::session::MemorySessionStore;
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct ScriptedHttp {
        status: u16,
        body: &'static str,
        seen: RefCell<Vec<HttpRequest>>,
    }

    #[async_trait(?Send)]
    impl HttpClient for ScriptedHttp {
        async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
            self.seen.borrow_mut().push(req);
            Ok(HttpResponse::new(self.status, self.body))
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        redirects: RefCell<Vec<Redirect>>,
    }

    impl Navigator for RecordingNavigator {
        fn redirect(&self, redirect: Redirect) {
            self.redirects.borrow_mut().push(redirect);
        }
    }

    type Fixture = (
        Rc<MemorySessionStore>,
        ApiClient<Rc<ScriptedHttp>>,
        Rc<ScriptedHttp>,
    );

    fn client(status: u16, body: &'static str) -> Fixture {
        let http = Rc::new(ScriptedHttp {
            status,
            body,
            seen: RefCell::new(Vec::new()),
        });
        let session = Rc::new(MemorySessionStore::new());
        let api = ApiClient::new("http://localhost:8000", http.clone(), session.clone());
        (session, api, http)
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let (session, api, http) =
            client(200, r#"{"access_token":"abc123","token_type":"bearer"}"#);

        let token = login(&api, "ops@example.com", "s3cret&more").await.unwrap();

        assert_eq!(token.access_token, "abc123");
        assert_eq!(session.get_token().as_deref(), Some("abc123"));
        let seen = http.seen.borrow();
        assert_eq!(seen[0].url, "http://localhost:8000/api/v1/auth/login");
        assert_eq!(
            seen[0].body.as_deref(),
            Some("username=ops%40example.com&password=s3cret%26more")
        );
    }

    #[tokio::test]
    async fn test_failed_login_keeps_session_and_does_not_redirect() {
        let (session, api, _http) =
            client(401, r#"{"detail":"Incorrect email or password"}"#);
        let navigator = Rc::new(RecordingNavigator::default());
        let _guard = api.install(Rc::new(AuthFailureInterceptor::new(
            session.clone(),
            navigator.clone(),
        )));

        let err = login(&api, "ops@example.com", "wrong").await.unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert_eq!(err.detail().as_deref(), Some("Incorrect email or password"));
        assert_eq!(session.get_token(), None);
        assert!(navigator.redirects.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_signup_logs_in() {
        let (session, api, http) = client(200, r#"{"access_token":"fresh"}"#);

        signup(&api, "new@example.com", "pw").await.unwrap();

        assert_eq!(session.get_token().as_deref(), Some("fresh"));
        assert_eq!(
            http.seen.borrow()[0].header("Content-Type"),
            Some("application/json")
        );
    }

    #[test]
    fn test_logout_clears_then_navigates() {
        let session = MemorySessionStore::with_token("abc123");
        let navigator = RecordingNavigator::default();

        logout(&session, &navigator);

        assert_eq!(session.get_token(), None);
        assert_eq!(
            *navigator.redirects.borrow(),
            vec![Redirect::push(AppRoute::Login)]
        );
    }
}
