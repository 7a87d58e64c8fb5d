//! Deterministic bot answering stimuli with canned events.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use botrunner::{
    BotEvent,
    EventSink,
    Package,
    Transport,
    TransportError,
    dispatch::OutboundMessage,
    script::POST_TOPIC,
};

#[derive(Default)]
struct Inner {
    replies: HashMap<OutboundMessage, Vec<BotEvent>>,
    sinks: HashMap<String, EventSink>,
    received: Vec<Package>,
    unsubscribed: Vec<String>,
    failing_publishes: usize,
    publishes_before_failing: usize,
    fail_subscribe: bool,
    fail_unsubscribe: bool,
}

/// In-process transport standing in for a bot backend.
///
/// Each stimulus published on [`POST_TOPIC`] is recorded, then answered
/// with the events registered for its message. Stimuli without a
/// registered reply get no answer. Clones share state.
#[derive(Clone, Default)]
pub struct StubBot {
    inner: Arc<Mutex<Inner>>,
}

impl StubBot {
    pub fn new() -> Self { Self::default() }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Answer the free text `text` with `events`.
    #[must_use]
    pub fn on_text(self, text: &str, events: impl IntoIterator<Item = BotEvent>) -> Self {
        self.lock().replies.insert(
            OutboundMessage::Text {
                text: text.to_owned(),
            },
            events.into_iter().collect(),
        );
        self
    }

    /// Answer a click on the button with `reply_payload` with `events`.
    #[must_use]
    pub fn on_click(self, reply_payload: &str, events: impl IntoIterator<Item = BotEvent>) -> Self {
        self.lock().replies.insert(
            OutboundMessage::Button {
                reply_payload: reply_payload.to_owned(),
            },
            events.into_iter().collect(),
        );
        self
    }

    /// Fail the next `count` publishes.
    #[must_use]
    pub fn failing_publishes(self, count: usize) -> Self { self.failing_publishes_after(0, count) }

    /// Accept `ok` publishes, then reject the next `count`.
    #[must_use]
    pub fn failing_publishes_after(self, ok: usize, count: usize) -> Self {
        {
            let mut inner = self.lock();
            inner.publishes_before_failing = ok;
            inner.failing_publishes = count;
        }
        self
    }

    #[must_use]
    pub fn failing_subscribe(self) -> Self {
        self.lock().fail_subscribe = true;
        self
    }

    #[must_use]
    pub fn failing_unsubscribe(self) -> Self {
        self.lock().fail_unsubscribe = true;
        self
    }

    /// Packages received so far, in order.
    pub fn received(&self) -> Vec<Package> { self.lock().received.clone() }

    /// Messages of the packages received so far.
    pub fn received_messages(&self) -> Vec<OutboundMessage> {
        self.lock()
            .received
            .iter()
            .map(|package| package.message.clone())
            .collect()
    }

    /// Topics unsubscribed so far.
    pub fn unsubscribed(&self) -> Vec<String> { self.lock().unsubscribed.clone() }
}

fn deliver(sinks: Vec<EventSink>, events: Vec<BotEvent>) {
    if sinks.is_empty() || events.is_empty() {
        return;
    }
    tokio::spawn(async move {
        for event in events {
            let raw = event.encode().expect("stub events encode");
            for sink in &sinks {
                sink.deliver(raw.clone()).await;
            }
        }
    });
}

#[async_trait]
impl Transport for StubBot {
    async fn subscribe(&self, topic: &str, sink: EventSink) -> Result<(), TransportError> {
        let mut inner = self.lock();
        if inner.fail_subscribe {
            return Err(TransportError::Rejected(format!("subscription to {topic} refused")));
        }
        inner.sinks.insert(topic.to_owned(), sink);
        Ok(())
    }

    async fn publish(&self, topic: &str, event: serde_json::Value) -> Result<(), TransportError> {
        let (sinks, events) = {
            let mut inner = self.lock();
            if inner.publishes_before_failing > 0 {
                inner.publishes_before_failing -= 1;
            } else if inner.failing_publishes > 0 {
                inner.failing_publishes -= 1;
                return Err(TransportError::Closed);
            }
            if topic != POST_TOPIC {
                return Ok(());
            }
            let package: Package = serde_json::from_value(event)
                .map_err(|e| TransportError::Rejected(format!("bad package: {e}")))?;
            let events = inner.replies.get(&package.message).cloned().unwrap_or_default();
            inner.received.push(package);
            (inner.sinks.values().cloned().collect(), events)
        };
        deliver(sinks, events);
        Ok(())
    }

    async fn unsubscribe(&self, topic: &str) -> Result<(), TransportError> {
        let mut inner = self.lock();
        if inner.fail_unsubscribe {
            return Err(TransportError::Rejected(format!("unsubscribe from {topic} refused")));
        }
        inner.sinks.remove(topic);
        inner.unsubscribed.push(topic.to_owned());
        Ok(())
    }
}
