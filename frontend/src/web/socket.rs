//! WebSocket 封装模块
//!
//! 把 `web_sys::WebSocket` 的回调接口转换为核心库需要的帧流。
//! 流被 drop 时注销回调并关闭 socket。

use futures::StreamExt;
use futures::channel::{mpsc, oneshot};
use futures::stream::Stream;
use inventory_console::ChannelError;
use inventory_console::alerts::{FrameStream, InboundFrame, SocketConnector};
use std::cell::RefCell;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{BinaryType, CloseEvent, Event, MessageEvent, WebSocket};

type FrameSender = mpsc::UnboundedSender<Result<InboundFrame, ChannelError>>;
type OpenSignal = Rc<RefCell<Option<oneshot::Sender<Result<(), ChannelError>>>>>;

/// 持有 socket 及其回调，drop 时关闭连接
struct SocketGuard {
    ws: WebSocket,
    _on_open: Closure<dyn FnMut()>,
    _on_error: Closure<dyn FnMut(Event)>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

impl Drop for SocketGuard {
    fn drop(&mut self) {
        self.ws.set_onopen(None);
        self.ws.set_onerror(None);
        self.ws.set_onmessage(None);
        self.ws.set_onclose(None);
        let _ = self.ws.close();
    }
}

struct SocketStream {
    frames: mpsc::UnboundedReceiver<Result<InboundFrame, ChannelError>>,
    _guard: SocketGuard,
}

impl Stream for SocketStream {
    type Item = Result<InboundFrame, ChannelError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.frames.poll_next_unpin(cx)
    }
}

fn signal_open(open: &OpenSignal, outcome: Result<(), ChannelError>) -> bool {
    match open.borrow_mut().take() {
        Some(sender) => {
            let _ = sender.send(outcome);
            true
        }
        None => false,
    }
}

fn decode(event: &MessageEvent) -> Option<InboundFrame> {
    let data = event.data();
    if let Some(text) = data.as_string() {
        return Some(InboundFrame::Text(text));
    }
    data.dyn_into::<js_sys::ArrayBuffer>()
        .ok()
        .map(|buf| InboundFrame::Binary(js_sys::Uint8Array::new(&buf).to_vec()))
}

/// 浏览器 WebSocket 连接器
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSocketConnector;

#[async_trait::async_trait(?Send)]
impl SocketConnector for BrowserSocketConnector {
    async fn connect(&self, address: &str) -> Result<FrameStream, ChannelError> {
        let ws = WebSocket::new(address)
            .map_err(|e| ChannelError::Connect(format!("{:?}", e)))?;
        ws.set_binary_type(BinaryType::Arraybuffer);

        let (tx, rx) = mpsc::unbounded();
        let (open_tx, open_rx) = oneshot::channel();
        let open: OpenSignal = Rc::new(RefCell::new(Some(open_tx)));

        let on_open = {
            let open = open.clone();
            Closure::<dyn FnMut()>::new(move || {
                signal_open(&open, Ok(()));
            })
        };

        let on_error = {
            let open = open.clone();
            let tx: FrameSender = tx.clone();
            Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                if !signal_open(&open, Err(ChannelError::Connect("websocket error".into()))) {
                    let error = ChannelError::Transport("websocket error".into());
                    let _ = tx.unbounded_send(Err(error));
                }
            })
        };

        let on_message = {
            let tx: FrameSender = tx.clone();
            Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
                if let Some(frame) = decode(&event) {
                    let _ = tx.unbounded_send(Ok(frame));
                }
            })
        };

        let on_close = {
            let open = open.clone();
            let tx: FrameSender = tx;
            Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
                let reason = format!("closed before open (code {})", event.code());
                signal_open(&open, Err(ChannelError::Connect(reason)));
                tx.close_channel();
            })
        };

        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        let guard = SocketGuard {
            ws,
            _on_open: on_open,
            _on_error: on_error,
            _on_message: on_message,
            _on_close: on_close,
        };

        match open_rx.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(ChannelError::Connect("connection abandoned".into())),
        }

        Ok(SocketStream {
            frames: rx,
            _guard: guard,
        }
        .boxed_local())
    }
}
