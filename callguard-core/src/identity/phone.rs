//! Registered phone number.
//!
//! The user's own number is entered once in settings and stored alongside
//! the user id. Only digits are kept.

use std::sync::Arc;

use super::IdentityError;
use crate::storage::KeyValueStore;

/// Storage key holding the registered phone number.
pub const PHONE_NUMBER_KEY: &str = "@user_phone_number";

/// Minimum number of digits accepted as a phone number.
pub const MIN_PHONE_DIGITS: usize = 10;

/// Strips everything but ASCII digits.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Reads and writes the registered phone number.
#[derive(Clone)]
pub struct PhoneNumberStore {
    store: Arc<dyn KeyValueStore>,
}

impl PhoneNumberStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        PhoneNumberStore { store }
    }

    /// Validates, normalizes and persists a phone number.
    ///
    /// Returns the stored digits.
    pub fn save(&self, number: &str) -> Result<String, IdentityError> {
        let cleaned = digits_only(number);
        if cleaned.len() < MIN_PHONE_DIGITS {
            return Err(IdentityError::InvalidPhoneNumber(format!(
                "expected at least {} digits, got {}",
                MIN_PHONE_DIGITS,
                cleaned.len()
            )));
        }
        self.store.set(PHONE_NUMBER_KEY, &cleaned)?;
        Ok(cleaned)
    }

    pub fn load(&self) -> Result<Option<String>, IdentityError> {
        Ok(self.store.get(PHONE_NUMBER_KEY)?)
    }

    pub fn clear(&self) -> Result<(), IdentityError> {
        Ok(self.store.remove(PHONE_NUMBER_KEY)?)
    }

    /// Returns true if a number is stored. Storage errors count as no number.
    pub fn has_phone_number(&self) -> bool {
        match self.load() {
            Ok(number) => number.is_some(),
            Err(e) => {
                tracing::error!("Error checking phone number: {}", e);
                false
            }
        }
    }
}
