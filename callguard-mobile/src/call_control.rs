// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mobile Call Control
//!
//! Provides a callback interface for the platform telephony layer.
//! Android implements it over `InCallService`, iOS over CallKit.

use callguard_core::{CallCommand, CallControl, CallControlError, RecordingStatus};
use tracing::{debug, warn};

/// Callback interface for native call-control operations.
///
/// Implement this trait in Swift (iOS) or Kotlin (Android).
#[uniffi::export(callback_interface)]
pub trait PlatformCallControl: Send + Sync {
    /// End the active call.
    ///
    /// Returns empty string on success, error message on failure.
    fn end_call(&self) -> String;

    /// Start or stop recording the active call.
    ///
    /// Returns "Recording started" or "Recording stopped". Anything else is
    /// treated as an error message.
    fn toggle_recording(&self) -> String;

    /// Route audio to the speaker (`true`) or the earpiece (`false`).
    ///
    /// Returns empty string on success, error message on failure.
    fn set_speaker(&self, enabled: bool) -> String;

    /// Mute or unmute the microphone.
    ///
    /// Returns empty string on success, error message on failure.
    fn set_muted(&self, muted: bool) -> String;

    /// The platform's call identifier, if it exposes one.
    fn call_sid(&self) -> Option<String>;
}

/// Adapts the string-based platform interface to [`CallControl`].
pub(crate) struct PlatformCallControlAdapter {
    handler: Box<dyn PlatformCallControl>,
}

impl PlatformCallControlAdapter {
    pub(crate) fn new(handler: Box<dyn PlatformCallControl>) -> Self {
        PlatformCallControlAdapter { handler }
    }
}

fn check(command: CallCommand, result: String) -> Result<(), CallControlError> {
    if result.is_empty() {
        Ok(())
    } else {
        warn!("Platform refused to {}: {}", command, result);
        Err(CallControlError::Rejected(result))
    }
}

impl CallControl for PlatformCallControlAdapter {
    fn end_call(&self) -> Result<(), CallControlError> {
        check(CallCommand::EndCall, self.handler.end_call())
    }

    fn toggle_recording(&self) -> Result<RecordingStatus, CallControlError> {
        let response = self.handler.toggle_recording();
        response.parse().map_err(|_| {
            warn!("Unexpected recording response: {:?}", response);
            if response.is_empty() {
                CallControlError::UnexpectedResponse(response)
            } else {
                CallControlError::Rejected(response)
            }
        })
    }

    fn set_speaker(&self, enabled: bool) -> Result<(), CallControlError> {
        check(CallCommand::ToggleSpeaker, self.handler.set_speaker(enabled))
    }

    fn set_muted(&self, muted: bool) -> Result<(), CallControlError> {
        check(CallCommand::ToggleMute, self.handler.set_muted(muted))
    }

    fn call_sid(&self) -> Option<String> {
        let sid = self.handler.call_sid().filter(|sid| !sid.is_empty());
        if sid.is_none() {
            debug!("Platform exposes no call SID");
        }
        sid
    }
}
