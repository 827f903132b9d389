//! CallGuard Core Library
//!
//! Real-time fraud signaling client for an in-call screen. Streams the active
//! call's identity to a fraud-scoring endpoint over WebSocket and turns its
//! verdicts into alert state, next to native call controls.

pub mod clock;
pub mod config;
pub mod error;
pub mod identity;
pub mod network;
pub mod session;
pub mod storage;
pub mod verdict;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SignalingConfig;
pub use error::{CallGuardError, CallGuardResult};
pub use identity::{IdentityError, IdentityResolver, PhoneNumberStore, UserIdentity};
#[cfg(any(feature = "network-native-tls", feature = "network-rustls"))]
pub use network::WebSocketTransport;
pub use network::{
    ChannelEvent, ConnectionState, MockTransport, NetworkError, ReconnectPolicy, SignalingChannel,
    Transport, TransportConfig, TransportEvent,
};
pub use session::{
    CallCommand, CallControl, CallControlError, CallSession, CallSid, CallbackHandler,
    EventHandler, RecordingStatus, SessionEvent, SessionSnapshot, SubscriptionId,
};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, StorageError};
pub use verdict::{interpret, FraudVerdict};
