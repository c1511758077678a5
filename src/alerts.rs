//! 实时告警通道
//!
//! 与请求/响应无关的长连接推送通道，显式状态机：
//!
//! ```text
//! Disconnected --mount--> Connecting --open--> Connected
//!      ^                      |                    |
//!      +------ error / close -+--------------------+
//! ```
//!
//! - 每次连接尝试都生成新的 [`ClientId`]（毫秒时间戳），从不复用；
//! - 文本帧原样转发给 [`AlertSink`]，不做解析；
//! - 错误只记录日志，是否重连由注入的 [`ReconnectPolicy`] 决定（默认不重连）；
//! - `close()` 返回之后不会再有任何消息送达 sink。
//!
//! 通道本身不依赖任何运行时：`mount()` 返回驱动 future，由调用方
//! 交给 `spawn_local` / `LocalSet` / `wasm_bindgen_futures` 执行。

use crate::error::ChannelError;
use async_trait::async_trait;
use futures::future::{AbortHandle, LocalBoxFuture, abortable};
use futures::stream::LocalBoxStream;
use futures::{FutureExt, StreamExt};
use std::cell::{Cell, RefCell};
use std::fmt::{self, Display};
use std::rc::Rc;

/// 告警服务默认端口
pub const DEFAULT_ALERT_PORT: u16 = 8000;

/// 告警路径前缀，完整地址为 `/ws/<client-id>`
pub const ALERT_PATH: &str = "/ws";

// =========================================================
// 数据类型
// =========================================================

/// 通道状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// 一条告警，负载对客户端是不透明文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEvent {
    pub payload: String,
}

/// 传输层收到的数据帧
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    Text(String),
    Binary(Vec<u8>),
}

impl From<InboundFrame> for AlertEvent {
    fn from(frame: InboundFrame) -> Self {
        let payload = match frame {
            InboundFrame::Text(text) => text,
            InboundFrame::Binary(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        };
        AlertEvent { payload }
    }
}

/// 客户端标识：连接尝试时刻的毫秒时间戳
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClientId(pub i64);

impl ClientId {
    pub fn generate() -> Self {
        ClientId(chrono::Utc::now().timestamp_millis())
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 告警服务地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEndpoint {
    pub host: String,
    pub port: u16,
    /// true 时使用 `wss`
    pub secure: bool,
}

impl ChannelEndpoint {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_ALERT_PORT,
            secure: false,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// `ws(s)://<host>:<port>/ws/<client-id>`
    pub fn address(&self, id: &ClientId) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        format!("{}://{}:{}{}/{}", scheme, self.host, self.port, ALERT_PATH, id)
    }
}

// =========================================================
// 接口
// =========================================================

/// 告警接收方
pub trait AlertSink {
    fn deliver(&self, event: AlertEvent);
}

impl<F: Fn(AlertEvent)> AlertSink for F {
    fn deliver(&self, event: AlertEvent) {
        self(event)
    }
}

/// 入站帧流；流结束表示连接已关闭
pub type FrameStream = LocalBoxStream<'static, Result<InboundFrame, ChannelError>>;

/// 建立底层连接
///
/// 返回的流被 drop 时实现方必须关闭底层 socket。
#[async_trait(?Send)]
pub trait SocketConnector {
    async fn connect(&self, address: &str) -> Result<FrameStream, ChannelError>;
}

/// 断线后的重连策略
///
/// `attempt` 从 1 开始，表示连续第几次断开；实现方可以在返回前等待（退避）。
#[async_trait(?Send)]
pub trait ReconnectPolicy {
    async fn should_retry(&self, attempt: u32) -> bool;
}

/// 默认策略：不重连
#[derive(Debug, Default, Clone, Copy)]
pub struct NoReconnect;

#[async_trait(?Send)]
impl ReconnectPolicy for NoReconnect {
    async fn should_retry(&self, _attempt: u32) -> bool {
        false
    }
}

// =========================================================
// 通道
// =========================================================

type IdSource = Rc<dyn Fn() -> ClientId>;

struct ChannelInner {
    endpoint: ChannelEndpoint,
    connector: Rc<dyn SocketConnector>,
    sink: Rc<dyn AlertSink>,
    policy: Rc<dyn ReconnectPolicy>,
    id_source: IdSource,
    state: Cell<ChannelState>,
    /// 每次 mount/close 递增，旧连接据此判断自己是否已过期
    generation: Cell<u64>,
    abort: RefCell<Option<AbortHandle>>,
    /// 最近一次发出的标识，跨重连与重新挂载单调递增
    last_id: Cell<Option<ClientId>>,
}

impl ChannelInner {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    /// 取下一个客户端标识
    ///
    /// 同一毫秒内的多次尝试时间戳相同，此时顺延到上一个标识 + 1。
    fn next_id(&self) -> ClientId {
        let candidate = (self.id_source)();
        let id = match self.last_id.get() {
            Some(last) if candidate <= last => ClientId(last.0 + 1),
            _ => candidate,
        };
        self.last_id.set(Some(id));
        id
    }

    fn set_state(&self, state: ChannelState) {
        let previous = self.state.replace(state);
        if previous != state {
            tracing::debug!(from = ?previous, to = ?state, "alert channel state changed");
        }
    }
}

pub struct AlertChannelBuilder {
    endpoint: ChannelEndpoint,
    connector: Rc<dyn SocketConnector>,
    sink: Rc<dyn AlertSink>,
    policy: Rc<dyn ReconnectPolicy>,
    id_source: IdSource,
}

impl AlertChannelBuilder {
    pub fn policy(mut self, policy: Rc<dyn ReconnectPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// 替换客户端标识的生成方式（测试中使用固定序列）
    pub fn id_source(mut self, source: impl Fn() -> ClientId + 'static) -> Self {
        self.id_source = Rc::new(source);
        self
    }

    pub fn build(self) -> AlertChannel {
        AlertChannel {
            inner: Rc::new(ChannelInner {
                endpoint: self.endpoint,
                connector: self.connector,
                sink: self.sink,
                policy: self.policy,
                id_source: self.id_source,
                state: Cell::new(ChannelState::Disconnected),
                generation: Cell::new(0),
                abort: RefCell::new(None),
                last_id: Cell::new(None),
            }),
        }
    }
}

/// 实时告警通道
///
/// 同一时刻最多持有一个连接。重复 `mount` 会先关闭旧连接。
pub struct AlertChannel {
    inner: Rc<ChannelInner>,
}

impl AlertChannel {
    pub fn builder(
        endpoint: ChannelEndpoint,
        connector: Rc<dyn SocketConnector>,
        sink: Rc<dyn AlertSink>,
    ) -> AlertChannelBuilder {
        AlertChannelBuilder {
            endpoint,
            connector,
            sink,
            policy: Rc::new(NoReconnect),
            id_source: Rc::new(ClientId::generate),
        }
    }

    pub fn new(
        endpoint: ChannelEndpoint,
        connector: Rc<dyn SocketConnector>,
        sink: Rc<dyn AlertSink>,
    ) -> Self {
        Self::builder(endpoint, connector, sink).build()
    }

    pub fn state(&self) -> ChannelState {
        self.inner.state.get()
    }

    pub fn endpoint(&self) -> &ChannelEndpoint {
        &self.inner.endpoint
    }

    /// 打开通道
    ///
    /// 先关闭已有连接，再返回驱动连接的 future。future 在连接结束
    /// （且策略不再重连）或通道被 `close` 时完成。
    ///
    /// 返回时状态已是 `Connecting`；返回的 future 必须交给执行器，
    /// 不再需要时调用 `close`。
    pub fn mount(&self) -> LocalBoxFuture<'static, ()> {
        self.close();
        self.inner.set_state(ChannelState::Connecting);

        let generation = self.inner.generation.get();
        let (task, handle) = abortable(run(self.inner.clone(), generation));
        *self.inner.abort.borrow_mut() = Some(handle);

        async move {
            if task.await.is_err() {
                tracing::debug!(generation, "alert channel task aborted");
            }
        }
        .boxed_local()
    }

    /// 关闭通道，返回后不再有消息送达 sink
    pub fn close(&self) {
        let inner = &self.inner;
        inner.generation.set(inner.generation.get() + 1);
        if let Some(handle) = inner.abort.borrow_mut().take() {
            handle.abort();
        }
        if inner.state.get() != ChannelState::Disconnected {
            tracing::info!(host = %inner.endpoint.host, "alert channel closed");
        }
        inner.set_state(ChannelState::Disconnected);
    }
}

impl Drop for AlertChannel {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run(inner: Rc<ChannelInner>, generation: u64) {
    let mut attempt: u32 = 0;

    loop {
        let id = inner.next_id();
        let address = inner.endpoint.address(&id);
        inner.set_state(ChannelState::Connecting);

        match inner.connector.connect(&address).await {
            Ok(mut frames) => {
                if !inner.is_current(generation) {
                    return;
                }
                attempt = 0;
                inner.set_state(ChannelState::Connected);
                tracing::info!(%address, "alert channel connected");

                while let Some(frame) = frames.next().await {
                    if !inner.is_current(generation) {
                        return;
                    }
                    match frame {
                        Ok(frame) => {
                            let event = AlertEvent::from(frame);
                            tracing::debug!(payload = %event.payload, "alert received");
                            inner.sink.deliver(event);
                        }
                        Err(e) => {
                            tracing::warn!(%address, error = %e, "alert channel transport error");
                            break;
                        }
                    }
                }
                tracing::info!(%address, "alert channel disconnected");
            }
            Err(e) => {
                tracing::warn!(%address, error = %e, "alert channel connect failed");
            }
        }

        if !inner.is_current(generation) {
            return;
        }
        inner.set_state(ChannelState::Disconnected);

        attempt = attempt.saturating_add(1);
        if !inner.policy.should_retry(attempt).await || !inner.is_current(generation) {
            return;
        }
        tracing::debug!(attempt, "alert channel reconnecting");
    }
}

#[cfg(test)]
mod tests;
