// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network + Transport Layer
//!
//! Carries fraud verdicts from the scoring service to the active call.
//!
//! # Architecture
//!
//! The network layer consists of:
//! - **Transport trait**: event-driven, non-blocking socket abstraction
//! - **Signaling channel**: connect URL, reconnection with backoff, teardown
//! - **Backoff policy**: exponential delays with an optional ceiling
//! - **Transports**: tungstenite WebSocket for production, mock for tests
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use callguard_core::network::{ChannelEvent, MockTransport, ReconnectPolicy, SignalingChannel};
//! use callguard_core::ManualClock;
//!
//! let transport = MockTransport::new();
//! let handle = transport.clone();
//! let mut channel = SignalingChannel::new(transport, ReconnectPolicy::default(), Arc::new(ManualClock::default()));
//!
//! channel.open("wss://fraud.example.com/api/ws", "user_1_2", "+15551234567")?;
//! handle.emit_open();
//! assert_eq!(channel.poll(), vec![ChannelEvent::Opened]);
//! ```

mod backoff;
mod channel;
mod endpoint;
mod error;
mod mock;
mod transport;

#[cfg(any(feature = "network-native-tls", feature = "network-rustls"))]
mod websocket;

// Error types
pub use error::NetworkError;

// Transport abstraction
pub use transport::{ConnectionState, Transport, TransportConfig, TransportEvent, TransportResult};

// Reconnection
pub use backoff::{ReconnectPolicy, ReconnectState};

// Connect URL
pub use endpoint::build_connect_url;

// Signaling channel
pub use channel::{ChannelEvent, SignalingChannel};

// Mock transport for testing
pub use mock::MockTransport;

// WebSocket transport for production
#[cfg(any(feature = "network-native-tls", feature = "network-rustls"))]
pub use websocket::WebSocketTransport;
