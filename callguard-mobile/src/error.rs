//! Mobile-friendly error types.

use callguard_core::{CallGuardError, IdentityError, StorageError};

/// Mobile-friendly error type.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MobileError {
    #[error("No phone number registered")]
    MissingPhoneNumber,

    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for MobileError {
    fn from(err: StorageError) -> Self {
        MobileError::StorageError(err.to_string())
    }
}

impl From<IdentityError> for MobileError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidPhoneNumber(reason) => MobileError::InvalidPhoneNumber(reason),
            IdentityError::Storage(e) => e.into(),
        }
    }
}

impl From<CallGuardError> for MobileError {
    fn from(err: CallGuardError) -> Self {
        match err {
            CallGuardError::MissingPhoneNumber => MobileError::MissingPhoneNumber,
            CallGuardError::Network(e) => MobileError::NetworkError(e.to_string()),
            CallGuardError::Storage(e) => e.into(),
            CallGuardError::Identity(e) => e.into(),
            CallGuardError::CallControl(e) => MobileError::Internal(e.to_string()),
            CallGuardError::Configuration(msg) => MobileError::ConfigurationError(msg),
        }
    }
}
