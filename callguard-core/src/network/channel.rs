// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Signaling Channel
//!
//! Owns the one connection to the fraud-scoring endpoint for an active call:
//! connect, reconnect with exponential backoff, send, teardown.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use super::backoff::{ReconnectPolicy, ReconnectState};
use super::endpoint::{build_connect_url, redact};
use super::error::NetworkError;
use super::transport::{ConnectionState, Transport, TransportEvent, TransportResult};
use crate::clock::Clock;

/// Notification from the channel to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The connection opened and the handshake completed.
    Opened,
    /// A text frame arrived.
    Message(String),
    /// The connection closed.
    Closed { reason: String },
    /// A transport error occurred.
    Error(String),
    /// A reconnect timer was armed.
    ReconnectScheduled { attempt: u32, delay: Duration },
    /// The reconnect timer fired and a new connection is being opened.
    Reconnecting { attempt: u32 },
    /// The reconnect ceiling was reached; the channel gave up.
    Unavailable,
}

/// Signaling channel with automatic reconnection.
///
/// Wraps a transport and adds:
/// - Connect URL construction with identity query parameters
/// - Exponential backoff reconnection after unexpected closes
/// - Connection state tracking
/// - Clean teardown that disarms pending reconnects
///
/// The channel is driven by its owner: [`poll`](Self::poll) drains transport
/// events, fires the reconnect timer when due, and returns what happened.
/// Nothing here blocks or spawns.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use callguard_core::network::{MockTransport, ReconnectPolicy, SignalingChannel};
/// use callguard_core::SystemClock;
///
/// let mut channel = SignalingChannel::new(
///     MockTransport::new(),
///     ReconnectPolicy::default(),
///     Arc::new(SystemClock),
/// );
/// channel.open("wss://fraud.example.com/api/ws", "user_1_2", "+15551234567")?;
/// for event in channel.poll() {
///     println!("{:?}", event);
/// }
/// channel.close();
/// ```
pub struct SignalingChannel<T: Transport> {
    transport: T,
    policy: ReconnectPolicy,
    clock: Arc<dyn Clock>,
    state: ConnectionState,
    target: Option<String>,
    reconnect: ReconnectState,
    reconnect_at: Option<Instant>,
    /// Set by `close()`; suppresses reconnects until the next `open()`.
    stopped: bool,
    unavailable: bool,
    pending: VecDeque<ChannelEvent>,
}

impl<T: Transport> SignalingChannel<T> {
    /// Creates a closed channel.
    pub fn new(transport: T, policy: ReconnectPolicy, clock: Arc<dyn Clock>) -> Self {
        SignalingChannel {
            transport,
            policy,
            clock,
            state: ConnectionState::Disconnected,
            target: None,
            reconnect: ReconnectState::default(),
            reconnect_at: None,
            stopped: true,
            unavailable: false,
            pending: VecDeque::new(),
        }
    }

    /// Opens the channel for a user and phone number.
    ///
    /// Moves to `Connecting` before returning. Fails without touching the
    /// network if the phone number is empty or the endpoint is not a
    /// WebSocket URL. Any previous connection is closed first.
    pub fn open(
        &mut self,
        endpoint: &str,
        user_id: &str,
        phone_number: &str,
    ) -> TransportResult<()> {
        if phone_number.trim().is_empty() {
            tracing::warn!("No phone number provided, skipping connection");
            return Err(NetworkError::MissingPhoneNumber);
        }
        let url = build_connect_url(endpoint, user_id, phone_number)?;

        if self.state != ConnectionState::Disconnected || self.reconnect_at.is_some() {
            self.close();
        }

        self.target = Some(url);
        self.stopped = false;
        self.unavailable = false;
        self.reconnect.reset();
        self.connect();
        Ok(())
    }

    /// Processes pending transport events and timers.
    ///
    /// Returns the resulting events in the order they happened.
    pub fn poll(&mut self) -> Vec<ChannelEvent> {
        if !self.stopped {
            while let Some(event) = self.transport.poll_event() {
                self.handle_transport_event(event);
                if self.stopped {
                    break;
                }
            }

            if let Some(deadline) = self.reconnect_at {
                if self.clock.monotonic_now() >= deadline {
                    self.reconnect_at = None;
                    tracing::info!("Reconnect attempt {}", self.reconnect.attempt);
                    self.pending.push_back(ChannelEvent::Reconnecting {
                        attempt: self.reconnect.attempt,
                    });
                    self.connect();
                }
            }
        }

        self.pending.drain(..).collect()
    }

    /// Sends a JSON message.
    ///
    /// Only sends while connected. Anything else, including a serialization
    /// failure, drops the message, logs, and returns false. Messages are
    /// never queued.
    pub fn send<M: Serialize + ?Sized>(&mut self, message: &M) -> bool {
        if self.state != ConnectionState::Connected {
            tracing::warn!("Cannot send, not connected");
            return false;
        }

        let text = match serde_json::to_string(message) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Send error: {}", NetworkError::Serialization(e.to_string()));
                return false;
            }
        };

        match self.transport.send_text(&text) {
            Ok(()) => {
                tracing::debug!("Sent message: {}", text);
                true
            }
            Err(e) => {
                tracing::error!("Send error: {}", e);
                false
            }
        }
    }

    /// Shuts the channel down.
    ///
    /// Disarms any pending reconnect, detaches the transport so late events
    /// from the old socket are never seen, and discards undelivered events.
    /// Idempotent.
    pub fn close(&mut self) {
        let was_active =
            self.state != ConnectionState::Disconnected || self.reconnect_at.is_some();

        self.stopped = true;
        self.reconnect_at = None;
        self.transport.close();
        self.state = ConnectionState::Disconnected;
        self.pending.clear();

        if was_active {
            tracing::info!("Cleaned up connection");
        }
    }

    /// Returns the current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Returns true if connected and ready.
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Returns the consecutive disconnection counter.
    pub fn reconnect_attempt(&self) -> u32 {
        self.reconnect.attempt
    }

    /// Returns true if a reconnect timer is armed.
    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_at.is_some()
    }

    /// Time left until the armed reconnect fires.
    pub fn time_until_reconnect(&self) -> Option<Duration> {
        self.reconnect_at
            .map(|deadline| deadline.saturating_duration_since(self.clock.monotonic_now()))
    }

    /// Returns true once the reconnect ceiling has been hit.
    pub fn is_unavailable(&self) -> bool {
        self.unavailable
    }

    /// Returns true if the channel was closed by its owner (or never opened).
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// The URL the channel connects to, if opened.
    pub fn target_url(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Returns the reconnect policy.
    pub fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }

    /// Returns a reference to the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns a mutable reference to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn connect(&mut self) {
        let Some(url) = self.target.clone() else {
            return;
        };

        self.state = ConnectionState::Connecting;
        tracing::info!("Connecting to: {}", redact(&url));

        if let Err(e) = self.transport.open(&url) {
            tracing::error!("Initialization error: {}", e);
            self.pending.push_back(ChannelEvent::Error(e.to_string()));
            self.connection_lost();
        }
    }

    fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Opened => {
                if self.state != ConnectionState::Connecting {
                    tracing::debug!("Ignoring open event in state {:?}", self.state);
                    return;
                }
                self.state = ConnectionState::Connected;
                self.reconnect.reset();
                tracing::info!("Connected");
                self.pending.push_back(ChannelEvent::Opened);
            }
            TransportEvent::Message(raw) => {
                if self.state != ConnectionState::Connected {
                    tracing::debug!("Ignoring frame in state {:?}", self.state);
                    return;
                }
                tracing::debug!("Message received: {}", raw);
                self.pending.push_back(ChannelEvent::Message(raw));
            }
            TransportEvent::Closed { code, reason } => {
                let reason = match (reason.is_empty(), code) {
                    (false, _) => reason,
                    (true, Some(code)) => code.to_string(),
                    (true, None) => String::new(),
                };
                tracing::warn!("Connection closed: {}", reason);
                self.pending.push_back(ChannelEvent::Closed { reason });
                self.connection_lost();
            }
            TransportEvent::Error(message) => {
                tracing::error!("Error: {}", message);
                self.pending.push_back(ChannelEvent::Error(message));
                self.connection_lost();
            }
        }
    }

    /// Moves to `Disconnected` and arms a reconnect unless stopped.
    ///
    /// A loss reported twice for one connection (error, then close) counts
    /// once: the second report finds the channel already disconnected.
    fn connection_lost(&mut self) {
        if self.state == ConnectionState::Disconnected {
            return;
        }
        self.state = ConnectionState::Disconnected;

        if self.stopped {
            return;
        }

        if !self.policy.allows(self.reconnect.attempt) {
            if !self.unavailable {
                self.unavailable = true;
                tracing::warn!(
                    "Giving up after {} reconnect attempts, signaling unavailable",
                    self.reconnect.attempt
                );
                self.pending.push_back(ChannelEvent::Unavailable);
            }
            return;
        }

        let delay = self.policy.delay_for(self.reconnect.attempt);
        self.reconnect.record_failure();
        self.reconnect_at = Some(self.clock.monotonic_now() + delay);
        tracing::info!("Reconnecting in {}s...", delay.as_secs_f64());
        self.pending.push_back(ChannelEvent::ReconnectScheduled {
            attempt: self.reconnect.attempt,
            delay,
        });
    }
}

impl<T: Transport> Drop for SignalingChannel<T> {
    fn drop(&mut self) {
        self.close();
    }
}
