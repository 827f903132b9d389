//! Call SID.
//!
//! Identifies the recorded call to the fraud backend. The platform's own
//! identifier is preferred; otherwise one is made up locally in the
//! `CA<millis><suffix>` shape.

use std::fmt;

use rand::Rng;

use super::call_control::CallControl;
use crate::clock::Clock;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// Where a call SID came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallSidSource {
    Native,
    Generated,
}

/// Opaque call identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSid {
    value: String,
    source: CallSidSource,
}

impl CallSid {
    /// Wraps an identifier reported by the platform.
    pub fn from_native(value: impl Into<String>) -> Self {
        CallSid {
            value: value.into(),
            source: CallSidSource::Native,
        }
    }

    /// Generates `"CA" + millis + 9 random base-36 characters`.
    pub fn generate(clock: &dyn Clock) -> Self {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect();
        CallSid {
            value: format!("CA{}{}", clock.now_ms(), suffix),
            source: CallSidSource::Generated,
        }
    }

    /// Asks the platform first and falls back to a generated SID.
    pub fn resolve(call_control: &dyn CallControl, clock: &dyn Clock) -> Self {
        match call_control.call_sid().filter(|sid| !sid.is_empty()) {
            Some(sid) => Self::from_native(sid),
            None => Self::generate(clock),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> CallSidSource {
        self.source
    }
}

impl fmt::Display for CallSid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
