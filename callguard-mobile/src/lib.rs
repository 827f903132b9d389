//! CallGuard Mobile Bindings
//!
//! UniFFI bindings for Android and iOS platforms.
//! Exposes a simplified, mobile-friendly API on top of callguard-core.

use std::path::PathBuf;
use std::sync::Arc;

use callguard_core::network::build_connect_url;
use callguard_core::{
    CallSession, IdentityResolver, PhoneNumberStore, SignalingConfig, SqliteStore, SystemClock,
    WebSocketTransport,
};

// === Modules ===

mod call_control;
mod error;
mod session;
mod types;

// Re-export public types
pub use call_control::PlatformCallControl;
pub use error::MobileError;
pub use session::{MobileCallSession, SessionObserver};
pub use types::{MobileCallCommand, MobileFraudAlert, MobileSessionEvent, MobileSessionState};

use call_control::PlatformCallControlAdapter;

uniffi::setup_scaffolding!();

/// Interpret one fraud-scoring frame.
///
/// Returns the alert for `is_fraud: true` frames and nothing otherwise.
#[uniffi::export]
pub fn interpret_frame(raw: String) -> Option<MobileFraudAlert> {
    callguard_core::interpret(&raw).map(MobileFraudAlert::from)
}

/// Minimum number of digits in a registered phone number.
#[uniffi::export]
pub fn min_phone_digits() -> u32 {
    callguard_core::identity::MIN_PHONE_DIGITS as u32
}

// === Main Interface ===

/// Main CallGuard interface for mobile platforms.
///
/// Owns the local store (phone number and user id) and creates one
/// [`MobileCallSession`] per call.
#[derive(uniffi::Object)]
pub struct CallGuardMobile {
    store: Arc<SqliteStore>,
    config: SignalingConfig,
}

#[uniffi::export]
impl CallGuardMobile {
    /// Create a new CallGuardMobile instance.
    ///
    /// `data_dir` is created if needed. `endpoint` is the fraud-scoring
    /// WebSocket URL (`ws://` or `wss://`).
    #[uniffi::constructor]
    pub fn new(data_dir: String, endpoint: String) -> Result<Arc<Self>, MobileError> {
        Self::new_with_options(data_dir, endpoint, None)
    }

    /// Like `new`, with a reconnect ceiling. With `None` the session retries
    /// for as long as the call lasts.
    #[uniffi::constructor]
    pub fn new_with_options(
        data_dir: String,
        endpoint: String,
        max_reconnect_attempts: Option<u32>,
    ) -> Result<Arc<Self>, MobileError> {
        build_connect_url(&endpoint, "", "")
            .map_err(|e| MobileError::ConfigurationError(e.to_string()))?;

        let data_path = PathBuf::from(&data_dir);
        std::fs::create_dir_all(&data_path)
            .map_err(|e| MobileError::StorageError(e.to_string()))?;

        let store = SqliteStore::open(data_path.join("callguard.db"))?;

        let mut config = SignalingConfig::new(endpoint);
        if let Some(attempts) = max_reconnect_attempts {
            config = config.with_max_reconnect_attempts(attempts);
        }

        Ok(Arc::new(CallGuardMobile {
            store: Arc::new(store),
            config,
        }))
    }

    pub fn endpoint(&self) -> String {
        self.config.endpoint.clone()
    }

    // === Phone Number ===

    /// Validates and stores the user's phone number. Returns the stored
    /// digits.
    pub fn save_phone_number(&self, number: String) -> Result<String, MobileError> {
        Ok(self.phone_numbers().save(&number)?)
    }

    pub fn phone_number(&self) -> Result<Option<String>, MobileError> {
        Ok(self.phone_numbers().load()?)
    }

    pub fn has_phone_number(&self) -> bool {
        self.phone_numbers().has_phone_number()
    }

    pub fn clear_phone_number(&self) -> Result<(), MobileError> {
        Ok(self.phone_numbers().clear()?)
    }

    // === Identity ===

    /// Returns the install's user id, creating it from the registered phone
    /// number on first use.
    pub fn user_id(&self) -> Result<String, MobileError> {
        let phone = self.phone_numbers().load()?;
        Ok(self.identity().get_or_create_user_id(phone.as_deref()))
    }

    // === Call Session ===

    /// Creates a session for the current call. Call `start` on it to
    /// connect, then `poll` it from a timer.
    pub fn create_call_session(
        &self,
        call_control: Box<dyn PlatformCallControl>,
        observer: Box<dyn SessionObserver>,
    ) -> Result<Arc<MobileCallSession>, MobileError> {
        let phone_number = self.phone_numbers().load()?;
        let session = CallSession::new(
            self.config.clone(),
            WebSocketTransport::new(self.config.to_transport_config()),
            self.identity(),
            Arc::new(PlatformCallControlAdapter::new(call_control)),
            Arc::new(SystemClock),
        );
        Ok(Arc::new(MobileCallSession::new(session, observer, phone_number)))
    }
}

impl CallGuardMobile {
    fn phone_numbers(&self) -> PhoneNumberStore {
        PhoneNumberStore::new(self.store.clone())
    }

    fn identity(&self) -> IdentityResolver {
        IdentityResolver::new(self.store.clone(), Arc::new(SystemClock))
    }
}
