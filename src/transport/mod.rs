//! Publish-subscribe transport used to reach the bot backend.
//!
//! The harness does not own the wire protocol. [`Transport`] is the seam a
//! backend adapter implements; [`LineTransport`] is the adapter shipped with
//! the binary, speaking newline-delimited JSON over a byte stream.

use async_trait::async_trait;

use crate::receiver::EventSink;

mod error;
mod line;

pub use error::TransportError;
pub use line::{LineTransport, MAX_LINE_LENGTH};

/// Connection to a publish-subscribe broker.
///
/// Implementations deliver inbound events for a subscribed topic by calling
/// [`EventSink::deliver`] from their own task; the call waits while the
/// event queue is full.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Route events published on `topic` to `sink`.
    async fn subscribe(&self, topic: &str, sink: EventSink) -> Result<(), TransportError>;

    /// Publish `event` on `topic`.
    async fn publish(&self, topic: &str, event: serde_json::Value) -> Result<(), TransportError>;

    /// Stop routing events for `topic`.
    async fn unsubscribe(&self, topic: &str) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn subscribe(&self, topic: &str, sink: EventSink) -> Result<(), TransportError> {
        (**self).subscribe(topic, sink).await
    }

    async fn publish(&self, topic: &str, event: serde_json::Value) -> Result<(), TransportError> {
        (**self).publish(topic, event).await
    }

    async fn unsubscribe(&self, topic: &str) -> Result<(), TransportError> {
        (**self).unsubscribe(topic).await
    }
}
