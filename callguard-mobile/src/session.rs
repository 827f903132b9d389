//! Mobile Call Session
//!
//! Wraps the core session in a mutex for the platform. The platform drives
//! [`MobileCallSession::poll`] from its main-loop timer and receives events
//! through a [`SessionObserver`].

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use callguard_core::{CallSession, EventHandler, SessionEvent, WebSocketTransport};

use crate::error::MobileError;
use crate::types::{MobileSessionEvent, MobileSessionState};

/// Callback interface for session events.
///
/// Events are delivered after the session lock is released, so the observer
/// may call back into the session.
#[uniffi::export(callback_interface)]
pub trait SessionObserver: Send + Sync {
    fn on_event(&self, event: MobileSessionEvent);
}

/// Buffers events raised while the session lock is held.
#[derive(Default)]
struct EventQueue {
    events: Mutex<Vec<SessionEvent>>,
}

impl EventHandler for EventQueue {
    fn on_event(&self, event: SessionEvent) {
        self.events.lock().push(event);
    }
}

/// One active call, as seen by the platform.
#[derive(uniffi::Object)]
pub struct MobileCallSession {
    session: Mutex<CallSession<WebSocketTransport>>,
    queue: Arc<EventQueue>,
    observer: Box<dyn SessionObserver>,
    phone_number: Option<String>,
    poll_interval_ms: u64,
}

impl MobileCallSession {
    pub(crate) fn new(
        mut session: CallSession<WebSocketTransport>,
        observer: Box<dyn SessionObserver>,
        phone_number: Option<String>,
    ) -> Self {
        let queue = Arc::new(EventQueue::default());
        session.subscribe(queue.clone());
        let poll_interval_ms = session.config().io_poll_interval_ms;
        MobileCallSession {
            session: Mutex::new(session),
            queue,
            observer,
            phone_number,
            poll_interval_ms,
        }
    }

    fn with_session<R>(&self, f: impl FnOnce(&mut CallSession<WebSocketTransport>) -> R) -> R {
        let result = {
            let mut session = self.session.lock();
            f(&mut session)
        };
        self.flush_events();
        result
    }

    fn flush_events(&self) {
        let events = std::mem::take(&mut *self.queue.events.lock());
        if !events.is_empty() {
            debug!(count = events.len(), "Delivering session events");
        }
        for event in events {
            self.observer.on_event(event.into());
        }
    }
}

#[uniffi::export]
impl MobileCallSession {
    /// Connects to the fraud-scoring endpoint with the registered number.
    ///
    /// Without a registered number this returns `MissingPhoneNumber` and the
    /// session keeps working for call control only.
    pub fn start(&self) -> Result<(), MobileError> {
        let phone = self.phone_number.clone();
        self.with_session(|session| session.start(phone.as_deref()))
            .map_err(|e| {
                warn!("Call session did not start: {}", e);
                MobileError::from(e)
            })
    }

    /// Processes network events and reconnect timers.
    ///
    /// Returns the number of events delivered to the observer.
    pub fn poll(&self) -> u32 {
        self.with_session(|session| session.poll().len() as u32)
    }

    /// Suggested interval between `poll` calls, in milliseconds.
    pub fn poll_interval_ms(&self) -> u64 {
        self.poll_interval_ms
    }

    /// Dismiss the fraud alert and stay on the call.
    pub fn continue_call(&self) {
        self.with_session(|session| session.continue_call());
    }

    /// Dismiss the alert, end the call and tear the session down.
    pub fn hang_up(&self) {
        self.with_session(|session| session.hang_up());
    }

    /// Returns the mute state after the toggle.
    pub fn toggle_mute(&self) -> bool {
        self.with_session(|session| session.toggle_mute())
    }

    /// Returns the speaker state after the toggle.
    pub fn toggle_speaker(&self) -> bool {
        self.with_session(|session| session.toggle_speaker())
    }

    /// Returns the recording state after the toggle.
    pub fn toggle_recording(&self) -> bool {
        self.with_session(|session| session.toggle_recording())
    }

    /// Tear down without touching the call (the call ended elsewhere).
    pub fn end(&self) {
        self.with_session(|session| session.end());
    }

    /// Sends an ad hoc JSON frame. Returns false when not connected.
    pub fn send_json(&self, json: String) -> Result<bool, MobileError> {
        let value: serde_json::Value = serde_json::from_str(&json).map_err(|e| {
            warn!("Rejected outbound frame: {}", e);
            MobileError::InvalidInput(e.to_string())
        })?;
        Ok(self.with_session(|session| session.send(&value)))
    }

    pub fn state(&self) -> MobileSessionState {
        self.session.lock().snapshot().into()
    }

    pub fn is_connected(&self) -> bool {
        self.session.lock().is_connected()
    }
}
