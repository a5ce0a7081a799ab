use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::oneshot;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use super::PushChannel;
use crate::controller::event::{PushMessage, PushSink};

/// Metric stream over a WebSocket, one JSON text frame per server tick.
pub struct WsPushChannel {
    url: String,
}

impl WsPushChannel {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl PushChannel for WsPushChannel {
    async fn pump(self: Box<Self>, sink: PushSink, mut shutdown: oneshot::Receiver<()>) {
        let connect = tokio::select! {
            res = connect_async(self.url.as_str()) => res,
            _ = &mut shutdown => {
                sink.deliver(PushMessage::Closed(None));
                return;
            }
        };
        let (mut ws, _) = match connect {
            Ok(value) => value,
            Err(err) => {
                warn!(url = %self.url, "stream connect failed: {err}");
                sink.deliver(PushMessage::Closed(Some(err.to_string())));
                return;
            }
        };
        info!(url = %self.url, "stream connected");
        if !sink.deliver(PushMessage::Opened) {
            let _ = ws.close(None).await;
            return;
        }

        let reason = loop {
            tokio::select! {
                _ = &mut shutdown => {
                    let _ = ws.close(None).await;
                    break None;
                }
                frame = ws.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        if !sink.deliver(PushMessage::Payload(text)) {
                            let _ = ws.close(None).await;
                            return;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        break frame.map(|f| f.reason.to_string());
                    }
                    Some(Ok(other)) => {
                        debug!(kind = ?other, "ignoring non-text frame");
                    }
                    Some(Err(err)) => break Some(err.to_string()),
                    None => break None,
                }
            }
        };
        sink.deliver(PushMessage::Closed(reason));
    }
}
