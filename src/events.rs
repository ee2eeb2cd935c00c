//! Outbound Event Channel
//!
//! Publish/subscribe primitive between the panel components and the host
//! application. Components never mutate shared state; they publish intents
//! here and the host applies them (see `MeetingContext::apply`). Events
//! published with `persist` are retained and replayed to late subscribers,
//! mirroring durable delivery to late-joining participants.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::polls::config::Poll;

/// Capacity of the live fan-out channels.
const BROADCAST_CAPACITY: usize = 64;

/// Intent published by a panel component for the host to apply and rebroadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundEvent {
    /// End a manually controlled poll
    #[serde(rename_all = "camelCase")]
    EndPoll { poll_id: String },
    /// Publish a new live poll (a promoted draft)
    CreatePoll(Poll),
    /// Drop a draft after promotion
    #[serde(rename_all = "camelCase")]
    RemovePollFromDraft { poll_id: String },
}

impl OutboundEvent {
    /// Wire topic name.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::EndPoll { .. } => "END_POLL",
            Self::CreatePoll(_) => "CREATE_POLL",
            Self::RemovePollFromDraft { .. } => "REMOVE_POLL_FROM_DRAFT",
        }
    }
}

impl std::fmt::Display for OutboundEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.topic())
    }
}

/// Delivery options attached to a publish.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PublishOptions {
    /// Retain the event and replay it to late subscribers
    #[serde(default)]
    pub persist: bool,
}

impl PublishOptions {
    /// Durable delivery; all poll events use this.
    pub fn persist() -> Self {
        Self { persist: true }
    }
}

/// Local UI signal; never persisted or rebroadcast to other participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// Viewer surface was double-clicked
    ToggleFullscreen,
}

/// Pub/sub channel with persisted replay.
#[derive(Debug)]
pub struct PubSubBus {
    tx: broadcast::Sender<OutboundEvent>,
    history: RwLock<Vec<OutboundEvent>>,
    ui_tx: broadcast::Sender<UiEvent>,
}

impl PubSubBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (ui_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            history: RwLock::new(Vec::new()),
            ui_tx,
        }
    }

    /// Publish an event to live subscribers; persisted events also join the
    /// replay history. Having no subscribers is not an error.
    pub fn publish(&self, event: OutboundEvent, opts: PublishOptions) {
        debug!(topic = %event.topic(), persist = opts.persist, "publishing event");
        // The write lock serializes publish against subscribe so a new
        // subscriber never drops or double-sees a persisted event.
        let mut history = self.history.write();
        if opts.persist {
            history.push(event.clone());
        }
        let _ = self.tx.send(event);
    }

    /// Replay of persisted events plus a live receiver for what follows.
    pub fn subscribe(&self) -> (Vec<OutboundEvent>, broadcast::Receiver<OutboundEvent>) {
        let history = self.history.write();
        (history.clone(), self.tx.subscribe())
    }

    /// Emit a local UI signal.
    pub fn emit_ui(&self, event: UiEvent) {
        let _ = self.ui_tx.send(event);
    }

    /// Receiver for local UI signals.
    pub fn subscribe_ui(&self) -> broadcast::Receiver<UiEvent> {
        self.ui_tx.subscribe()
    }
}

impl Default for PubSubBus {
    fn default() -> Self {
        Self::new()
    }
}
