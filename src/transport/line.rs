//! Newline-delimited JSON adapter.
//!
//! Outbound frames are objects tagged by `op`:
//! `{"op":"subscribe","topic":..}`, `{"op":"unsubscribe","topic":..}` and
//! `{"op":"publish","topic":..,"event":..}`. Inbound frames carry
//! `{"topic":..,"event":..}` and are routed to the sink subscribed to that
//! topic. There is no reconnect: once the stream ends, every sink is
//! dropped and waiting receivers observe a closed queue.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::{TcpStream, ToSocketAddrs},
    task::JoinHandle,
};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};
use tracing::{debug, info, warn};

use super::{Transport, TransportError};
use crate::receiver::EventSink;

/// Longest accepted line, in bytes.
pub const MAX_LINE_LENGTH: usize = 1024 * 1024;

type Subscriptions = Arc<Mutex<HashMap<String, EventSink>>>;
type LineWriter = FramedWrite<Box<dyn AsyncWrite + Send + Unpin>, LinesCodec>;

#[derive(Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum OutboundFrame<'a> {
    Subscribe { topic: &'a str },
    Unsubscribe { topic: &'a str },
    Publish { topic: &'a str, event: &'a serde_json::Value },
}

#[derive(Deserialize)]
struct InboundFrame {
    topic: String,
    event: serde_json::Value,
}

/// Broker connection exchanging JSON lines over a byte stream.
pub struct LineTransport {
    writer: tokio::sync::Mutex<LineWriter>,
    subscriptions: Subscriptions,
    reader: JoinHandle<()>,
}

impl LineTransport {
    /// Connect to a broker over TCP.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] if the connection cannot be made.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr).await?;
        let peer = stream.peer_addr()?;
        info!(%peer, "connected to broker");
        Ok(Self::new(stream))
    }

    /// Run the adapter over an established stream.
    ///
    /// Must be called within a Tokio runtime; a reader task is spawned to
    /// route inbound frames.
    pub fn new<S>(stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        let writer: LineWriter = FramedWrite::new(
            Box::new(write_half),
            LinesCodec::new_with_max_length(MAX_LINE_LENGTH),
        );
        let subscriptions = Subscriptions::default();
        let reader = tokio::spawn(route_inbound(
            FramedRead::new(read_half, LinesCodec::new_with_max_length(MAX_LINE_LENGTH)),
            subscriptions.clone(),
        ));
        Self {
            writer: tokio::sync::Mutex::new(writer),
            subscriptions,
            reader,
        }
    }

    async fn send(&self, frame: &OutboundFrame<'_>) -> Result<(), TransportError> {
        let line = serde_json::to_string(frame).map_err(TransportError::Encode)?;
        if self.reader.is_finished() {
            return Err(TransportError::Closed);
        }
        self.writer.lock().await.send(line).await?;
        Ok(())
    }
}

async fn route_inbound<R>(mut lines: FramedRead<R, LinesCodec>, subscriptions: Subscriptions)
where
    R: AsyncRead + Unpin,
{
    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                warn!(%error, "unreadable frame from broker");
                if matches!(error, tokio_util::codec::LinesCodecError::Io(_)) {
                    break;
                }
                continue;
            }
        };
        let frame: InboundFrame = match serde_json::from_str(&line) {
            Ok(frame) => frame,
            Err(error) => {
                warn!(%error, "ignoring malformed frame from broker");
                continue;
            }
        };
        let sink = subscriptions
            .lock()
            .ok()
            .and_then(|subs| subs.get(&frame.topic).cloned());
        match sink {
            Some(sink) => sink.deliver(frame.event).await,
            None => debug!(topic = %frame.topic, "no subscriber for topic"),
        }
    }
    debug!("broker stream ended");
    if let Ok(mut subs) = subscriptions.lock() {
        subs.clear();
    }
}

#[async_trait]
impl Transport for LineTransport {
    async fn subscribe(&self, topic: &str, sink: EventSink) -> Result<(), TransportError> {
        self.subscriptions
            .lock()
            .map_err(|_| TransportError::Rejected("subscription table poisoned".into()))?
            .insert(topic.to_owned(), sink);
        self.send(&OutboundFrame::Subscribe { topic }).await?;
        debug!(topic, "subscribed");
        Ok(())
    }

    async fn publish(&self, topic: &str, event: serde_json::Value) -> Result<(), TransportError> {
        self.send(&OutboundFrame::Publish {
            topic,
            event: &event,
        })
        .await
    }

    async fn unsubscribe(&self, topic: &str) -> Result<(), TransportError> {
        self.send(&OutboundFrame::Unsubscribe { topic }).await?;
        self.subscriptions
            .lock()
            .map_err(|_| TransportError::Rejected("subscription table poisoned".into()))?
            .remove(topic);
        debug!(topic, "unsubscribed");
        Ok(())
    }
}

impl Drop for LineTransport {
    fn drop(&mut self) { self.reader.abort(); }
}
