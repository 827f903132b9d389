// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error Types
//!
//! Unified error type for CallGuard operations.

use thiserror::Error;

use crate::identity::IdentityError;
use crate::network::NetworkError;
use crate::session::CallControlError;
use crate::storage::StorageError;

/// Unified error type for CallGuard operations.
#[derive(Error, Debug)]
pub enum CallGuardError {
    /// Signaling channel operation failed.
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Identity or phone number operation failed.
    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Native call control refused a command.
    #[error("call control error: {0}")]
    CallControl(#[from] CallControlError),

    /// No registered phone number to connect with.
    #[error("no phone number registered")]
    MissingPhoneNumber,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type for CallGuard operations.
pub type CallGuardResult<T> = Result<T, CallGuardError>;
