// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Identity Resolver
//!
//! Derives the stable user id that the fraud-scoring backend keys sessions
//! on. The id is generated once per install from the registered phone number
//! and the creation time, then persisted. It only changes if storage is
//! cleared.

mod phone;

pub use phone::{digits_only, PhoneNumberStore, MIN_PHONE_DIGITS, PHONE_NUMBER_KEY};

use std::sync::Arc;

use thiserror::Error;

use crate::clock::Clock;
use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the generated user id.
pub const USER_ID_KEY: &str = "fraud_detector_user_id";

/// Identity error types.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// A user id paired with the phone number it was resolved for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: String,
    pub phone_number: String,
}

/// Resolves the per-install user id.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use callguard_core::{IdentityResolver, MemoryStore, SystemClock};
///
/// let resolver = IdentityResolver::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock));
/// let id = resolver.get_or_create_user_id(Some("+1 555 123 4567"));
/// assert!(id.starts_with("user_15551234567_"));
/// ```
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl IdentityResolver {
    /// Creates a resolver over the given store.
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        IdentityResolver { store, clock }
    }

    /// Returns the persisted user id, creating and persisting one if needed.
    ///
    /// An existing id is returned unchanged whatever `phone_number` is. If
    /// the store fails, a session-only id of the same shape is returned so
    /// the current call can still connect.
    pub fn get_or_create_user_id(&self, phone_number: Option<&str>) -> String {
        match self.load_or_create(phone_number) {
            Ok(user_id) => user_id,
            Err(e) => {
                tracing::error!("Error managing user ID, using session ID: {}", e);
                self.synthesize(phone_number)
            }
        }
    }

    /// Resolves the full identity for a phone number.
    pub fn resolve(&self, phone_number: &str) -> UserIdentity {
        UserIdentity {
            user_id: self.get_or_create_user_id(Some(phone_number)),
            phone_number: phone_number.to_string(),
        }
    }

    /// Returns the persisted user id without creating one.
    pub fn stored_user_id(&self) -> Result<Option<String>, IdentityError> {
        Ok(self.store.get(USER_ID_KEY)?)
    }

    fn load_or_create(&self, phone_number: Option<&str>) -> Result<String, StorageError> {
        if let Some(existing) = self.store.get(USER_ID_KEY)? {
            return Ok(existing);
        }

        let candidate = self.synthesize(phone_number);
        let stored = self.store.set_if_absent(USER_ID_KEY, &candidate)?;
        if stored == candidate {
            tracing::info!("Created new user ID");
        }
        Ok(stored)
    }

    fn synthesize(&self, phone_number: Option<&str>) -> String {
        let digits = phone_number.map(digits_only).unwrap_or_default();
        let digits = if digits.is_empty() {
            "unknown".to_string()
        } else {
            digits
        };
        format!("user_{}_{}", digits, self.clock.now_ms())
    }
}
