//! 会话感知的 API 客户端
//!
//! 所有页面都通过 [`ApiClient`] 发起 REST 调用：
//! - 每次调用时从 [`SessionStore`] 读取当前令牌并附加 `Authorization: Bearer <token>`；
//! - 没有令牌时照常发送，由服务端返回 401；
//! - 失败结果先经过拦截器注册表（401 清会话并重定向），再返回给调用方。

use crate::error::{ApiError, ApiResult};
use crate::interceptor::{
    FailedRequest, InterceptorHandle, InterceptorRegistry, ResponseInterceptor,
};
use crate::request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::session::SharedSession;
use inventory_shared::protocol::{ApiRequest, RequestBody};
use inventory_shared::{HEADER_AUTHORIZATION, bearer};
use std::cell::Cell;
use std::rc::Rc;

/// 出站请求描述
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    /// 以 `/` 开头的路径，可以带查询串
    pub path: String,
    pub body: RequestBody,
    pub requires_auth: bool,
}

impl OutboundRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            requires_auth: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    /// 由类型化的接口定义构建
    pub fn from_api<R: ApiRequest>(req: &R) -> ApiResult<Self> {
        Ok(Self {
            method: R::METHOD,
            path: req.target(),
            body: req.body()?,
            requires_auth: R::REQUIRES_AUTH,
        })
    }
}

pub struct ApiClient<C: HttpClient> {
    base_url: String,
    http: C,
    session: SharedSession,
    interceptors: InterceptorRegistry,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(base_url: impl Into<String>, http: C, session: SharedSession) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http,
            session,
            interceptors: InterceptorRegistry::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub fn interceptors(&self) -> &InterceptorRegistry {
        &self.interceptors
    }

    /// 安装响应拦截器，见 [`InterceptorRegistry::install`]
    pub fn install(&self, interceptor: Rc<dyn ResponseInterceptor>) -> InterceptorHandle {
        self.interceptors.install(interceptor)
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 构建传输层请求，令牌在这里（调用时）读取
    fn build(&self, req: OutboundRequest) -> HttpRequest {
        let mut http = HttpRequest::new(&self.url(&req.path), req.method)
            .with_header("Accept", "application/json");

        if req.requires_auth {
            if let Some(token) = self.session.get_token() {
                http = http.with_header(HEADER_AUTHORIZATION, &bearer(&token));
            }
        }

        if let Some(content_type) = req.body.content_type() {
            http = http.with_header("Content-Type", content_type);
        }
        if let Some(body) = req.body.into_text() {
            http = http.with_body(body);
        }
        http
    }

    /// 发送请求并统一处理失败
    pub async fn send(&self, req: OutboundRequest) -> ApiResult<HttpResponse> {
        let meta = FailedRequest {
            method: req.method,
            path: req.path.clone(),
            requires_auth: req.requires_auth,
        };
        let http = self.build(req);

        let outcome = match self.http.send(http).await {
            Ok(response) => response.error_for_status(),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(response) => {
                tracing::debug!(
                    method = meta.method.as_str(),
                    path = %meta.path,
                    status = response.status,
                    "request ok"
                );
                Ok(response)
            }
            Err(error) => {
                // 副作用（清会话、重定向）必须先于调用方看到错误
                self.interceptors.notify_error(&meta, &error);
                Err(error)
            }
        }
    }

    /// 调用类型化接口
    pub async fn call<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let outbound = OutboundRequest::from_api(req)?;
        let response = self.send(outbound).await?;
        response.json::<R::Response>().map_err(|e| match e {
            ApiError::Decode(msg) => ApiError::Decode(format!("{}: {}", req.path(), msg)),
            other => other,
        })
    }
}

// =========================================================
// 乱序完成
// =========================================================

/// 同一份数据的重复请求编号
///
/// 并发请求的完成顺序没有保证。每次发起请求前取一张 [`CallTicket`]，
/// 结果到达时只有最新的一张仍然有效，较早请求的结果直接丢弃。
#[derive(Debug, Clone, Default)]
pub struct CallSequence {
    issued: Rc<Cell<u64>>,
}

impl CallSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> CallTicket {
        let seq = self.issued.get() + 1;
        self.issued.set(seq);
        CallTicket {
            issued: self.issued.clone(),
            seq,
        }
    }
}

#[derive(Debug)]
pub struct CallTicket {
    issued: Rc<Cell<u64>>,
    seq: u64,
}

impl CallTicket {
    /// 之后没有再发起同类请求
    pub fn is_latest(&self) -> bool {
        self.issued.get() == self.seq
    }
}
