//! Event System
//!
//! Callbacks for call session state changes.

use std::sync::Arc;

use super::call_control::CallCommand;
use crate::verdict::FraudVerdict;

/// Events emitted by a call session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The signaling channel connected or disconnected.
    ConnectionChanged {
        /// True once the channel is open.
        connected: bool,
    },

    /// A fraud verdict arrived. Replaces any earlier alert.
    FraudAlertRaised {
        /// The new verdict.
        verdict: FraudVerdict,
    },

    /// The fraud alert was cleared.
    FraudAlertCleared,

    /// Microphone mute changed.
    MuteChanged {
        /// New mute state.
        muted: bool,
    },

    /// Speaker routing changed.
    SpeakerChanged {
        /// New speaker state.
        enabled: bool,
    },

    /// Recording started or stopped.
    RecordingChanged {
        /// New recording state.
        recording: bool,
        /// Call SID held while recording.
        call_sid: Option<String>,
    },

    /// A call-control command failed. State is unchanged.
    CommandFailed {
        /// The command that failed.
        command: CallCommand,
        /// Error description.
        error: String,
    },

    /// The channel gave up reconnecting.
    SignalingUnavailable,

    /// The session was torn down.
    SessionEnded,
}

/// Event handler trait.
///
/// Implement this trait to receive session events.
pub trait EventHandler: Send + Sync {
    /// Called when an event occurs.
    fn on_event(&self, event: SessionEvent);
}

/// Simple callback-based event handler.
///
/// Wraps a closure for easy event handling.
pub struct CallbackHandler<F>
where
    F: Fn(SessionEvent) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackHandler<F>
where
    F: Fn(SessionEvent) + Send + Sync,
{
    /// Creates a new callback handler.
    pub fn new(callback: F) -> Self {
        CallbackHandler { callback }
    }
}

impl<F> EventHandler for CallbackHandler<F>
where
    F: Fn(SessionEvent) + Send + Sync,
{
    fn on_event(&self, event: SessionEvent) {
        (self.callback)(event);
    }
}

/// Handle returned by [`EventDispatcher::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Event dispatcher for managing multiple handlers.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<(SubscriptionId, Arc<dyn EventHandler>)>,
    next_id: u64,
}

impl EventDispatcher {
    /// Creates a new event dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an event handler.
    pub fn subscribe(&mut self, handler: Arc<dyn EventHandler>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    /// Removes a handler. Returns false if it was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        self.handlers.len() != before
    }

    /// Removes all handlers.
    pub fn clear_handlers(&mut self) {
        self.handlers.clear();
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Dispatches an event to all handlers.
    pub fn dispatch(&self, event: SessionEvent) {
        for (_, handler) in &self.handlers {
            handler.on_event(event.clone());
        }
    }
}
