// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Verdict Interpreter
//!
//! Turns inbound text frames into fraud verdicts. Frames look like
//! `{"is_fraud": true, "fraud_type": "scam", ...}`; anything else is
//! ignored. A bad frame must never disturb the call, so every failure
//! here is logged and swallowed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category used when the server does not name one.
pub const UNKNOWN_FRAUD_TYPE: &str = "UNKNOWN";

/// Fraud alert state shown to the user.
///
/// `status == true` is an active, unacknowledged alert. The cleared value
/// (`FraudVerdict::default()`) has `status == false` and an empty type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudVerdict {
    pub status: bool,
    #[serde(rename = "type")]
    pub fraud_type: String,
}

impl FraudVerdict {
    /// An active alert for the given category (stored uppercase).
    pub fn alert(fraud_type: &str) -> Self {
        FraudVerdict {
            status: true,
            fraud_type: fraud_type.to_uppercase(),
        }
    }

    /// The cleared state.
    pub fn cleared() -> Self {
        Self::default()
    }

    /// Returns true for an active alert.
    pub fn is_active(&self) -> bool {
        self.status
    }
}

/// Interprets one inbound frame.
///
/// Returns `Some` only for frames with `"is_fraud": true`. Malformed JSON,
/// non-object payloads, and frames without a true `is_fraud` all yield
/// `None`. A missing, empty, or non-string `fraud_type` becomes
/// [`UNKNOWN_FRAUD_TYPE`].
pub fn interpret(raw: &str) -> Option<FraudVerdict> {
    let payload: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Error parsing message: {}", e);
            return None;
        }
    };

    let Some(fields) = payload.as_object() else {
        tracing::warn!("Ignoring non-object frame");
        return None;
    };

    if fields.get("is_fraud").and_then(Value::as_bool) != Some(true) {
        return None;
    }

    let fraud_type = fields
        .get("fraud_type")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .unwrap_or(UNKNOWN_FRAUD_TYPE);

    tracing::info!("Fraud detected: {}", fraud_type);
    Some(FraudVerdict::alert(fraud_type))
}
