//! Transport doubles for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    receiver::EventSink,
    transport::{Transport, TransportError},
};

/// Records every publish; optionally fails them.
#[derive(Default)]
pub struct RecordingTransport {
    pub published: Mutex<Vec<(String, serde_json::Value)>>,
    pub fail_publish: bool,
}

impl RecordingTransport {
    pub fn failing() -> Self {
        Self {
            fail_publish: true,
            ..Self::default()
        }
    }

    pub fn published(&self) -> Vec<(String, serde_json::Value)> {
        self.published.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn subscribe(&self, _topic: &str, _sink: EventSink) -> Result<(), TransportError> {
        Ok(())
    }

    async fn publish(&self, topic: &str, event: serde_json::Value) -> Result<(), TransportError> {
        if self.fail_publish {
            return Err(TransportError::Closed);
        }
        self.published
            .lock()
            .expect("lock poisoned")
            .push((topic.to_owned(), event));
        Ok(())
    }

    async fn unsubscribe(&self, _topic: &str) -> Result<(), TransportError> { Ok(()) }
}
