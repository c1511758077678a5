//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppRoute {
    /// 登录页面（未认证入口）
    Login,
    /// 业务总览（已认证落地页）
    Dashboard,
    Products,
    Orders,
    Suppliers,
}

impl AppRoute {
    pub const ALL: [AppRoute; 5] = [
        AppRoute::Login,
        AppRoute::Dashboard,
        AppRoute::Products,
        AppRoute::Orders,
        AppRoute::Suppliers,
    ];

    /// 将 URL path 解析为路由枚举
    ///
    /// 未匹配的路径（包括 `/`）返回 `None`，由守卫决定重定向目标。
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        match path {
            "/login" => Some(Self::Login),
            "/dashboard" => Some(Self::Dashboard),
            "/products" => Some(Self::Products),
            "/orders" => Some(Self::Orders),
            "/suppliers" => Some(Self::Suppliers),
            _ => None,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::Products => "/products",
            Self::Orders => "/orders",
            Self::Suppliers => "/suppliers",
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login)
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（落地页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
