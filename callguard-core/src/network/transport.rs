// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Transport Trait
//!
//! Platform-agnostic abstraction for the fraud-signaling connection.

use super::error::NetworkError;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, NetworkError>;

/// Connection state of the signaling channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No socket, or the last one closed.
    #[default]
    Disconnected,
    /// Socket requested, open handshake not yet complete.
    Connecting,
    /// Socket open and handshake complete.
    Connected,
}

/// Something that happened on the underlying connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The open handshake completed.
    Opened,
    /// A text frame arrived.
    Message(String),
    /// The connection closed, cleanly or not.
    Closed {
        /// Close code, when the peer sent one.
        code: Option<u16>,
        /// Close reason, possibly empty.
        reason: String,
    },
    /// A transport error. Usually followed by `Closed`.
    Error(String),
}

/// Transport trait for the signaling connection.
///
/// Unlike a request/response transport, this one is event-driven: `open`
/// only starts connecting and returns immediately. Progress is reported
/// through `poll_event`, which must never block.
///
/// # Detaching
///
/// `close` detaches the current connection. After it returns, no event from
/// that connection may come out of `poll_event`, even if the socket reports
/// its close later. `open` on a transport that still has a connection
/// detaches the old one first.
///
/// # Example
///
/// ```ignore
/// use callguard_core::network::{MockTransport, Transport, TransportEvent};
///
/// let mut transport = MockTransport::new();
/// transport.open("wss://fraud.example.com/api/ws?user_id=u&phone_number=1")?;
/// transport.emit(TransportEvent::Opened);
/// assert_eq!(transport.poll_event(), Some(TransportEvent::Opened));
/// transport.close();
/// ```
pub trait Transport: Send {
    /// Starts connecting to `url`.
    ///
    /// Returns an error only if the attempt could not be started at all.
    fn open(&mut self, url: &str) -> TransportResult<()>;

    /// Returns the next pending event, if any. Non-blocking.
    fn poll_event(&mut self) -> Option<TransportEvent>;

    /// Queues a text frame on the current connection.
    fn send_text(&mut self, text: &str) -> TransportResult<()>;

    /// Closes and detaches the current connection.
    ///
    /// Safe to call when nothing is open.
    fn close(&mut self);
}

/// Configuration for socket-level behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// TCP connect and WebSocket handshake timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// How long a blocked read waits before checking for outbound commands
    /// (milliseconds).
    pub io_poll_interval_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            connect_timeout_ms: 10_000,
            io_poll_interval_ms: 100,
        }
    }
}
