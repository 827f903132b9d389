//! Mock Transport
//!
//! Scripted transport for tests. Clones share state, so a test keeps one
//! handle while the channel owns another.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use super::error::NetworkError;
use super::transport::{Transport, TransportEvent, TransportResult};

#[derive(Debug, Default)]
struct MockState {
    attached: bool,
    events: VecDeque<TransportEvent>,
    opened_urls: Vec<String>,
    sent: Vec<String>,
    close_count: usize,
    dropped_events: usize,
    fail_next_open: Option<NetworkError>,
}

/// In-memory transport with scripted events.
///
/// Events emitted while no connection is attached are dropped, the same
/// way a real transport discards events from a detached socket.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Creates a detached mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an event on the current connection.
    ///
    /// Returns false if no connection is attached and the event was dropped.
    pub fn emit(&self, event: TransportEvent) -> bool {
        let mut state = self.state.lock();
        if state.attached {
            state.events.push_back(event);
            true
        } else {
            state.dropped_events += 1;
            false
        }
    }

    /// Simulates the open handshake completing.
    pub fn emit_open(&self) -> bool {
        self.emit(TransportEvent::Opened)
    }

    /// Simulates an inbound text frame.
    pub fn emit_message(&self, raw: &str) -> bool {
        self.emit(TransportEvent::Message(raw.to_string()))
    }

    /// Simulates the socket closing.
    pub fn emit_close(&self, reason: &str) -> bool {
        self.emit(TransportEvent::Closed {
            code: None,
            reason: reason.to_string(),
        })
    }

    /// Simulates a transport error.
    pub fn emit_error(&self, message: &str) -> bool {
        self.emit(TransportEvent::Error(message.to_string()))
    }

    /// Makes the next `open` fail synchronously.
    pub fn fail_next_open(&self, error: NetworkError) {
        self.state.lock().fail_next_open = Some(error);
    }

    /// URLs passed to `open`, oldest first.
    pub fn opened_urls(&self) -> Vec<String> {
        self.state.lock().opened_urls.clone()
    }

    /// Number of `open` calls.
    pub fn open_count(&self) -> usize {
        self.state.lock().opened_urls.len()
    }

    /// Text frames sent, oldest first.
    pub fn sent_messages(&self) -> Vec<String> {
        self.state.lock().sent.clone()
    }

    /// Number of `close` calls.
    pub fn close_count(&self) -> usize {
        self.state.lock().close_count
    }

    /// Returns true while a connection is attached.
    pub fn is_attached(&self) -> bool {
        self.state.lock().attached
    }

    /// Number of events dropped because nothing was attached.
    pub fn dropped_events(&self) -> usize {
        self.state.lock().dropped_events
    }
}

impl Transport for MockTransport {
    fn open(&mut self, url: &str) -> TransportResult<()> {
        let mut state = self.state.lock();
        state.opened_urls.push(url.to_string());
        state.events.clear();
        if let Some(error) = state.fail_next_open.take() {
            state.attached = false;
            return Err(error);
        }
        state.attached = true;
        Ok(())
    }

    fn poll_event(&mut self) -> Option<TransportEvent> {
        self.state.lock().events.pop_front()
    }

    fn send_text(&mut self, text: &str) -> TransportResult<()> {
        let mut state = self.state.lock();
        if !state.attached {
            return Err(NetworkError::NotConnected);
        }
        state.sent.push(text.to_string());
        Ok(())
    }

    fn close(&mut self) {
        let mut state = self.state.lock();
        state.close_count += 1;
        state.attached = false;
        state.events.clear();
    }
}
