//! 路由守卫
//!
//! 纯同步决策：根据会话存储的当前状态决定受保护视图能否渲染。
//! 守卫只检查令牌是否存在，令牌有效性由 401 拦截器被动发现。

use crate::route::AppRoute;
use crate::session::SharedSession;

/// 重定向信号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: AppRoute,
    /// true 使用 replaceState，后退不会回到被拦截的页面
    pub replace: bool,
}

impl Redirect {
    pub fn replace(to: AppRoute) -> Self {
        Self { to, replace: true }
    }

    pub fn push(to: AppRoute) -> Self {
        Self { to, replace: false }
    }
}

/// 守卫决策结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Render(AppRoute),
    Redirect(Redirect),
}

/// 导航执行者
///
/// 守卫只产生信号，真正修改地址栏/视图的是注入的 Navigator
/// （浏览器端为 History API，测试中为记录器）。
pub trait Navigator {
    fn redirect(&self, redirect: Redirect);
}

impl<N: Navigator + ?Sized> Navigator for std::rc::Rc<N> {
    fn redirect(&self, redirect: Redirect) {
        (**self).redirect(redirect)
    }
}

#[derive(Clone)]
pub struct RouteGuard {
    session: SharedSession,
}

impl RouteGuard {
    pub fn new(session: SharedSession) -> Self {
        Self { session }
    }

    /// 对一次导航请求做出决策
    pub fn evaluate(&self, path: &str) -> GuardOutcome {
        let is_auth = self.session.is_authenticated();

        let Some(route) = AppRoute::from_path(path) else {
            // 未匹配路径：已认证去落地页，否则去登录页
            let to = if is_auth {
                AppRoute::auth_success_redirect()
            } else {
                AppRoute::auth_failure_redirect()
            };
            return GuardOutcome::Redirect(Redirect::replace(to));
        };

        if route.requires_auth() && !is_auth {
            tracing::debug!(path, "guard: access denied, redirecting to login");
            return GuardOutcome::Redirect(Redirect::replace(AppRoute::auth_failure_redirect()));
        }

        if route.should_redirect_when_authenticated() && is_auth {
            tracing::debug!(path, "guard: already authenticated, redirecting to landing");
            return GuardOutcome::Redirect(Redirect::replace(AppRoute::auth_success_redirect()));
        }

        GuardOutcome::Render(route)
    }
}
