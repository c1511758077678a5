use super::*;
use futures::channel::{mpsc, oneshot};
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use std::collections::VecDeque;

// =========================================================
// Shared Mock Components
// =========================================================

type Frames = mpsc::UnboundedSender<Result<InboundFrame, ChannelError>>;
type PendingConnect = LocalBoxFuture<'static, Result<FrameStream, ChannelError>>;

#[derive(Default)]
struct TestContext {
    /// Every address a connection was attempted against
    addresses: RefCell<Vec<String>>,
    script: RefCell<VecDeque<PendingConnect>>,
    delivered: RefCell<Vec<String>>,
}

impl TestContext {
    /// Queue a connection that opens immediately; returns the server side.
    fn accept(&self) -> Frames {
        let (tx, rx) = mpsc::unbounded();
        self.script
            .borrow_mut()
            .push_back(futures::future::ready(Ok(rx.boxed_local())).boxed_local());
        tx
    }

    /// Queue a connection that opens once the returned sender fires.
    fn accept_later(&self) -> (oneshot::Sender<()>, Frames) {
        let (open_tx, open_rx) = oneshot::channel::<()>();
        let (tx, rx) = mpsc::unbounded();
        let pending = async move {
            let _ = open_rx.await;
            Ok(rx.boxed_local())
        };
        self.script.borrow_mut().push_back(pending.boxed_local());
        (open_tx, tx)
    }

    fn refuse(&self) {
        self.script.borrow_mut().push_back(
            futures::future::ready(Err(ChannelError::Connect("connection refused".into())))
                .boxed_local(),
        );
    }
}

struct FakeConnector {
    ctx: Rc<TestContext>,
}

#[async_trait(?Send)]
impl SocketConnector for FakeConnector {
    async fn connect(&self, address: &str) -> Result<FrameStream, ChannelError> {
        self.ctx.addresses.borrow_mut().push(address.to_string());
        let next = self.ctx.script.borrow_mut().pop_front();
        match next {
            Some(pending) => pending.await,
            None => Err(ChannelError::Connect("no server scripted".into())),
        }
    }
}

struct RecordingSink {
    ctx: Rc<TestContext>,
}

impl AlertSink for RecordingSink {
    fn deliver(&self, event: AlertEvent) {
        self.ctx.delivered.borrow_mut().push(event.payload);
    }
}

/// Allows a fixed number of retries without waiting.
struct RetryTimes {
    limit: u32,
    asked: Cell<u32>,
}

#[async_trait(?Send)]
impl ReconnectPolicy for RetryTimes {
    async fn should_retry(&self, attempt: u32) -> bool {
        self.asked.set(self.asked.get() + 1);
        attempt <= self.limit
    }
}

fn sequential_ids() -> impl Fn() -> ClientId {
    let next = Cell::new(1_700_000_000_000_i64);
    move || {
        let id = next.get();
        next.set(id + 1);
        ClientId(id)
    }
}

fn setup() -> (Rc<TestContext>, AlertChannel) {
    let ctx = Rc::new(TestContext::default());
    let channel = AlertChannel::builder(
        ChannelEndpoint::new("example.com"),
        Rc::new(FakeConnector { ctx: ctx.clone() }),
        Rc::new(RecordingSink { ctx: ctx.clone() }),
    )
    .id_source(sequential_ids())
    .build();
    (ctx, channel)
}

fn text(s: &str) -> Result<InboundFrame, ChannelError> {
    Ok(InboundFrame::Text(s.to_string()))
}

// =========================================================
// Tests
// =========================================================

#[test]
fn test_endpoint_address_format() {
    let id = ClientId(1_700_000_000_000);
    let endpoint = ChannelEndpoint::new("example.com");
    assert_eq!(endpoint.address(&id), "ws://example.com:8000/ws/1700000000000");

    let secure = ChannelEndpoint::new("shop.example.com").with_secure(true);
    assert_eq!(
        secure.address(&id),
        "wss://shop.example.com:8000/ws/1700000000000"
    );

    let custom = ChannelEndpoint::new("localhost").with_port(9100);
    assert_eq!(custom.address(&ClientId(5)), "ws://localhost:9100/ws/5");
}

#[test]
fn test_generated_ids_are_millisecond_timestamps() {
    let before = chrono::Utc::now().timestamp_millis();
    let id = ClientId::generate();
    let after = chrono::Utc::now().timestamp_millis();
    assert!(before <= id.0 && id.0 <= after);
}

#[test]
fn test_connect_and_forward_text_verbatim() {
    let (ctx, channel) = setup();
    let server = ctx.accept();
    let mut pool = LocalPool::new();

    assert_eq!(channel.state(), ChannelState::Disconnected);
    pool.spawner().spawn_local(channel.mount()).unwrap();
    pool.run_until_stalled();

    assert_eq!(channel.state(), ChannelState::Connected);
    assert_eq!(
        *ctx.addresses.borrow(),
        vec!["ws://example.com:8000/ws/1700000000000".to_string()]
    );

    server.unbounded_send(text("Low stock: Widget")).unwrap();
    server.unbounded_send(text(r#"{"type":"alert","level":"#)).unwrap();
    server.unbounded_send(text("")).unwrap();
    pool.run_until_stalled();

    assert_eq!(
        *ctx.delivered.borrow(),
        vec![
            "Low stock: Widget".to_string(),
            r#"{"type":"alert","level":"#.to_string(),
            String::new(),
        ]
    );
}

#[test]
fn test_binary_frames_are_decoded_lossily() {
    let (ctx, channel) = setup();
    let server = ctx.accept();
    let mut pool = LocalPool::new();
    pool.spawner().spawn_local(channel.mount()).unwrap();
    pool.run_until_stalled();

    server
        .unbounded_send(Ok(InboundFrame::Binary(b"restock \xff".to_vec())))
        .unwrap();
    pool.run_until_stalled();

    assert_eq!(*ctx.delivered.borrow(), vec!["restock \u{FFFD}".to_string()]);
}

#[test]
fn test_no_delivery_after_close() {
    let (ctx, channel) = setup();
    let server = ctx.accept();
    let mut pool = LocalPool::new();
    pool.spawner().spawn_local(channel.mount()).unwrap();
    pool.run_until_stalled();

    server.unbounded_send(text("before")).unwrap();
    pool.run_until_stalled();

    // 已排队但尚未处理的消息也不能送达
    server.unbounded_send(text("queued")).unwrap();
    channel.close();
    assert_eq!(channel.state(), ChannelState::Disconnected);
    let _ = server.unbounded_send(text("after"));
    pool.run_until_stalled();

    assert_eq!(*ctx.delivered.borrow(), vec!["before".to_string()]);
    assert!(server.is_closed(), "socket must be released after close");
    assert_eq!(channel.state(), ChannelState::Disconnected);
}

#[test]
fn test_close_while_connecting() {
    let (ctx, channel) = setup();
    let (open, server) = ctx.accept_later();
    let mut pool = LocalPool::new();
    pool.spawner().spawn_local(channel.mount()).unwrap();
    pool.run_until_stalled();
    assert_eq!(channel.state(), ChannelState::Connecting);

    channel.close();
    let _ = open.send(());
    let _ = server.unbounded_send(text("late"));
    pool.run_until_stalled();

    assert_eq!(channel.state(), ChannelState::Disconnected);
    assert!(ctx.delivered.borrow().is_empty());
}

#[test]
fn test_remount_closes_previous_connection() {
    let (ctx, channel) = setup();
    let first = ctx.accept();
    let second = ctx.accept();
    let mut pool = LocalPool::new();

    pool.spawner().spawn_local(channel.mount()).unwrap();
    pool.run_until_stalled();
    pool.spawner().spawn_local(channel.mount()).unwrap();
    pool.run_until_stalled();

    assert!(first.is_closed());
    assert!(!second.is_closed());
    assert_eq!(channel.state(), ChannelState::Connected);

    let addresses = ctx.addresses.borrow().clone();
    assert_eq!(addresses.len(), 2);
    assert_ne!(addresses[0], addresses[1], "client id must not be reused");

    let _ = first.unbounded_send(text("stale"));
    second.unbounded_send(text("fresh")).unwrap();
    pool.run_until_stalled();
    assert_eq!(*ctx.delivered.borrow(), vec!["fresh".to_string()]);
}

#[test]
fn test_connect_failure_is_not_retried_by_default() {
    let (ctx, channel) = setup();
    ctx.refuse();
    let mut pool = LocalPool::new();
    pool.spawner().spawn_local(channel.mount()).unwrap();
    pool.run();

    assert_eq!(channel.state(), ChannelState::Disconnected);
    assert_eq!(ctx.addresses.borrow().len(), 1);
}

#[test]
fn test_peer_close_and_transport_error_end_in_disconnected() {
    let (ctx, channel) = setup();
    let server = ctx.accept();
    let mut pool = LocalPool::new();
    pool.spawner().spawn_local(channel.mount()).unwrap();
    pool.run_until_stalled();

    server.unbounded_send(text("one")).unwrap();
    server
        .unbounded_send(Err(ChannelError::Transport("reset by peer".into())))
        .unwrap();
    server.unbounded_send(text("never")).unwrap();
    pool.run();

    assert_eq!(channel.state(), ChannelState::Disconnected);
    assert_eq!(*ctx.delivered.borrow(), vec!["one".to_string()]);
    assert_eq!(ctx.addresses.borrow().len(), 1);
}

#[test]
fn test_policy_retries_with_fresh_ids() {
    let ctx = Rc::new(TestContext::default());
    let policy = Rc::new(RetryTimes {
        limit: 2,
        asked: Cell::new(0),
    });
    let channel = AlertChannel::builder(
        ChannelEndpoint::new("example.com"),
        Rc::new(FakeConnector { ctx: ctx.clone() }),
        Rc::new(RecordingSink { ctx: ctx.clone() }),
    )
    .policy(policy.clone())
    .id_source(sequential_ids())
    .build();

    ctx.refuse();
    ctx.refuse();
    let server = ctx.accept();

    let mut pool = LocalPool::new();
    pool.spawner().spawn_local(channel.mount()).unwrap();
    pool.run_until_stalled();

    assert_eq!(channel.state(), ChannelState::Connected);
    assert_eq!(policy.asked.get(), 2);
    assert_eq!(
        *ctx.addresses.borrow(),
        vec![
            "ws://example.com:8000/ws/1700000000000".to_string(),
            "ws://example.com:8000/ws/1700000000001".to_string(),
            "ws://example.com:8000/ws/1700000000002".to_string(),
        ]
    );

    server.unbounded_send(text("back online")).unwrap();
    pool.run_until_stalled();
    assert_eq!(*ctx.delivered.borrow(), vec!["back online".to_string()]);
}

/// Retries immediately, so every attempt lands in the same millisecond.
struct RetryImmediately {
    limit: u32,
}

#[async_trait(?Send)]
impl ReconnectPolicy for RetryImmediately {
    async fn should_retry(&self, attempt: u32) -> bool {
        attempt <= self.limit
    }
}

fn distinct(addresses: &[String]) -> usize {
    let mut unique = addresses.to_vec();
    unique.sort();
    unique.dedup();
    unique.len()
}

#[test]
fn test_default_ids_are_unique_across_immediate_retries() {
    let ctx = Rc::new(TestContext::default());
    let channel = AlertChannel::builder(
        ChannelEndpoint::new("example.com"),
        Rc::new(FakeConnector { ctx: ctx.clone() }),
        Rc::new(RecordingSink { ctx: ctx.clone() }),
    )
    .policy(Rc::new(RetryImmediately { limit: 3 }))
    .build();

    for _ in 0..4 {
        ctx.refuse();
    }

    let mut pool = LocalPool::new();
    pool.spawner().spawn_local(channel.mount()).unwrap();
    pool.run();

    let addresses = ctx.addresses.borrow().clone();
    assert_eq!(addresses.len(), 4);
    assert_eq!(distinct(&addresses), 4, "{addresses:?}");
    assert_eq!(channel.state(), ChannelState::Disconnected);
}

#[test]
fn test_default_ids_are_unique_across_same_tick_remounts() {
    let ctx = Rc::new(TestContext::default());
    let channel = AlertChannel::new(
        ChannelEndpoint::new("example.com"),
        Rc::new(FakeConnector { ctx: ctx.clone() }),
        Rc::new(RecordingSink { ctx: ctx.clone() }),
    );
    let first = ctx.accept();
    let second = ctx.accept();

    let mut pool = LocalPool::new();
    pool.spawner().spawn_local(channel.mount()).unwrap();
    pool.run_until_stalled();
    channel.close();
    pool.spawner().spawn_local(channel.mount()).unwrap();
    pool.run_until_stalled();

    assert!(first.is_closed());
    assert!(!second.is_closed());
    let addresses = ctx.addresses.borrow().clone();
    assert_eq!(distinct(&addresses), 2, "{addresses:?}");
}

#[test]
fn test_id_source_going_backwards_still_yields_fresh_ids() {
    let ctx = Rc::new(TestContext::default());
    let channel = AlertChannel::builder(
        ChannelEndpoint::new("example.com"),
        Rc::new(FakeConnector { ctx: ctx.clone() }),
        Rc::new(RecordingSink { ctx: ctx.clone() }),
    )
    .policy(Rc::new(RetryImmediately { limit: 2 }))
    .id_source(|| ClientId(1_700_000_000_000))
    .build();

    for _ in 0..3 {
        ctx.refuse();
    }

    let mut pool = LocalPool::new();
    pool.spawner().spawn_local(channel.mount()).unwrap();
    pool.run();

    assert_eq!(
        *ctx.addresses.borrow(),
        vec![
            "ws://example.com:8000/ws/1700000000000".to_string(),
            "ws://example.com:8000/ws/1700000000001".to_string(),
            "ws://example.com:8000/ws/1700000000002".to_string(),
        ]
    );
}

#[test]
fn test_mount_enters_connecting_before_first_poll() {
    let (ctx, channel) = setup();
    let _server = ctx.accept();

    let task = channel.mount();
    assert_eq!(channel.state(), ChannelState::Connecting);
    assert!(ctx.addresses.borrow().is_empty());

    let mut pool = LocalPool::new();
    pool.spawner().spawn_local(task).unwrap();
    pool.run_until_stalled();
    assert_eq!(channel.state(), ChannelState::Connected);

    channel.close();
    assert_eq!(channel.state(), ChannelState::Disconnected);
}

#[test]
fn test_closure_sink() {
    let received = Rc::new(RefCell::new(Vec::new()));
    let ctx = Rc::new(TestContext::default());
    let sink = {
        let received = received.clone();
        move |event: AlertEvent| received.borrow_mut().push(event)
    };
    let channel = AlertChannel::new(
        ChannelEndpoint::new("localhost"),
        Rc::new(FakeConnector { ctx: ctx.clone() }),
        Rc::new(sink),
    );
    let server = ctx.accept();

    let mut pool = LocalPool::new();
    pool.spawner().spawn_local(channel.mount()).unwrap();
    pool.run_until_stalled();
    server.unbounded_send(text("ping")).unwrap();
    pool.run_until_stalled();

    assert_eq!(
        *received.borrow(),
        vec![AlertEvent {
            payload: "ping".into()
        }]
    );
}

#[test]
fn test_drop_closes_channel() {
    let (ctx, channel) = setup();
    let server = ctx.accept();
    let mut pool = LocalPool::new();
    pool.spawner().spawn_local(channel.mount()).unwrap();
    pool.run_until_stalled();

    drop(channel);
    pool.run_until_stalled();
    assert!(server.is_closed());
}
