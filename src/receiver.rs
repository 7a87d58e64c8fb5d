//! Hand-off of inbound bot events from the transport to the sequencer.
//!
//! The transport hands each raw event to [`EventSink::deliver`]. The sink
//! decodes it, stamps it with the turn that is open at that moment and
//! queues it on a bounded channel. A full queue applies backpressure to the
//! delivering task instead of losing events; the sink never touches
//! dialogue state. The sequencer
//! drains the queue through [`TurnReceiver::next_turn`], applying each
//! event to the state it owns until the bot's turn is complete. Because
//! every mutation happens after the event is received on the sequencer's
//! task, the state is always fully up to date when a turn is reported.
//!
//! The bot backend must finish exactly one turn per stimulus. Events
//! arriving before [`TurnReceiver::open_turn`] carry the previous turn's
//! stamp and are treated as late by [`DialogueState::apply_from`].

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{
    event::BotEvent,
    state::{DialogueState, TurnId, TurnSignal},
};

/// Queue capacity used when none is configured.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Errors returned while waiting for the bot's turn.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TurnError {
    /// The bot did not finish its turn within the allotted time.
    #[error("no reply from bot within {0:?}")]
    Timeout(Duration),
    /// Every sink was dropped; no further events can arrive.
    #[error("event stream closed")]
    Closed,
}

/// A decoded event and the turn that was open when it arrived.
#[derive(Debug)]
struct Stamped {
    turn: TurnId,
    event: BotEvent,
}

/// Transport-side handle feeding bot events to the sequencer.
#[derive(Clone, Debug)]
pub struct EventSink {
    tx: mpsc::Sender<Stamped>,
    open: Arc<AtomicU64>,
}

/// Sequencer-side end of the event queue.
#[derive(Debug)]
pub struct TurnReceiver {
    rx: mpsc::Receiver<Stamped>,
    open: Arc<AtomicU64>,
}

/// Create a bounded event queue.
///
/// # Panics
///
/// Panics if `capacity` is zero.
#[must_use]
pub fn event_queue(capacity: usize) -> (EventSink, TurnReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    let open = Arc::new(AtomicU64::new(0));
    (
        EventSink {
            tx,
            open: open.clone(),
        },
        TurnReceiver { rx, open },
    )
}

impl EventSink {
    /// Decode a raw inbound event and queue it.
    ///
    /// Waits for queue capacity when the sequencer is behind. Malformed
    /// events are logged and dropped.
    pub async fn deliver(&self, raw: serde_json::Value) {
        match BotEvent::decode(raw) {
            Ok(event) => self.deliver_event(event).await,
            Err(error) => warn!(%error, "dropping malformed bot event"),
        }
    }

    /// Queue an already decoded event, waiting for capacity if needed.
    pub async fn deliver_event(&self, event: BotEvent) {
        let turn = TurnId::new(self.open.load(Ordering::Acquire));
        if let Err(mpsc::error::SendError(stamped)) = self.tx.send(Stamped { turn, event }).await {
            debug!(event = ?stamped.event, "event queue closed; dropping bot event");
        }
    }
}

impl TurnReceiver {
    /// Mark `turn` as the one inbound events now belong to.
    ///
    /// Called before each stimulus is published. Events delivered earlier
    /// keep the stamp of the turn that was open at the time.
    pub fn open_turn(&self, turn: TurnId) { self.open.store(turn.get(), Ordering::Release); }

    /// Apply queued events to `state` until the bot completes its turn.
    ///
    /// Returns the identifier of the turn that completed. With a `limit`,
    /// gives up once that much time has passed; events applied before then
    /// stay in the state.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::Timeout`] if the limit elapses and
    /// [`TurnError::Closed`] if the queue closes first.
    pub async fn next_turn(
        &mut self,
        state: &mut DialogueState,
        limit: Option<Duration>,
    ) -> Result<TurnId, TurnError> {
        let turn = self.collect_turn(state);
        match limit {
            Some(limit) => tokio::time::timeout(limit, turn)
                .await
                .map_err(|_| TurnError::Timeout(limit))?,
            None => turn.await,
        }
    }

    async fn collect_turn(&mut self, state: &mut DialogueState) -> Result<TurnId, TurnError> {
        loop {
            let Stamped { turn, event } = self.rx.recv().await.ok_or(TurnError::Closed)?;
            if turn < state.turn() {
                debug!(?event, %turn, current = %state.turn(), "late bot event");
            } else {
                debug!(?event, %turn, "bot event received");
            }
            if state.apply_from(&event, turn) == TurnSignal::Complete {
                return Ok(state.turn());
            }
        }
    }

    /// Discard events already waiting in the queue. Returns how many were
    /// dropped.
    pub fn drain_pending(&mut self) -> usize {
        let mut dropped = 0;
        while self.rx.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!(dropped, "discarded pending bot events");
        }
        dropped
    }
}
