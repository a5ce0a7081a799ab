pub mod http;
pub mod local;
pub mod wire;
pub mod ws;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::controller::event::PushSink;

pub use http::HttpHost;
pub use local::{LocalHost, LocalPushChannel};
pub use ws::WsPushChannel;

/// Push side of the host-metrics service.
///
/// `pump` runs for the life of one connection: it reports `Opened`, every
/// text payload, and finally `Closed`. It must return promptly once
/// `shutdown` resolves, closing the connection on the way out. There is no
/// reconnect; after `Closed` the channel is done.
#[async_trait]
pub trait PushChannel: Send {
    async fn pump(self: Box<Self>, sink: PushSink, shutdown: oneshot::Receiver<()>);
}
