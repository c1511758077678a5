use crate::alerts::{FrameStream, InboundFrame, SocketConnector};
use crate::error::ChannelError;
use async_trait::async_trait;
use futures::StreamExt;
use tokio_tungstenite::tungstenite::Message;

/// 基于 tokio-tungstenite 的连接器
///
/// 只转发数据帧；ping/pong 由 tungstenite 自动应答，close 帧结束流。
/// 返回的流被 drop 时底层 TCP 连接随之关闭。
#[derive(Debug, Default, Clone, Copy)]
pub struct TungsteniteConnector;

#[async_trait(?Send)]
impl SocketConnector for TungsteniteConnector {
    async fn connect(&self, address: &str) -> Result<FrameStream, ChannelError> {
        let (stream, _response) = tokio_tungstenite::connect_async(address)
            .await
            .map_err(|e| ChannelError::Connect(e.to_string()))?;

        let frames = stream
            .take_while(|msg| futures::future::ready(!matches!(msg, Ok(Message::Close(_)))))
            .filter_map(|msg| {
                futures::future::ready(match msg {
                    Ok(Message::Text(text)) => Some(Ok(InboundFrame::Text(text))),
                    Ok(Message::Binary(bytes)) => Some(Ok(InboundFrame::Binary(bytes))),
                    Ok(_) => None,
                    Err(e) => Some(Err(ChannelError::Transport(e.to_string()))),
                })
            });

        Ok(frames.boxed_local())
    }
}
