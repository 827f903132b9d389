//! Native call-control collaborator.
//!
//! Mute, speaker, recording and hang-up live in the platform telephony
//! layer. The session only forwards commands and mirrors the results.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Call-control error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallControlError {
    #[error("Command rejected: {0}")]
    Rejected(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("No active call")]
    NoActiveCall,
}

/// Recording state reported by the platform after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingStatus {
    Started,
    Stopped,
}

impl RecordingStatus {
    /// The platform's wire string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordingStatus::Started => "Recording started",
            RecordingStatus::Stopped => "Recording stopped",
        }
    }
}

impl fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordingStatus {
    type Err = CallControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Recording started" => Ok(RecordingStatus::Started),
            "Recording stopped" => Ok(RecordingStatus::Stopped),
            other => Err(CallControlError::UnexpectedResponse(other.to_string())),
        }
    }
}

/// Commands the session forwards to the platform.
///
/// Implementations talk to the native telephony stack (Android
/// `InCallService`, iOS CallKit). All methods are called from the session's
/// event loop.
pub trait CallControl: Send + Sync {
    /// Ends the active call.
    fn end_call(&self) -> Result<(), CallControlError>;

    /// Starts or stops recording and reports which happened.
    fn toggle_recording(&self) -> Result<RecordingStatus, CallControlError>;

    /// Routes audio to or away from the speaker.
    fn set_speaker(&self, enabled: bool) -> Result<(), CallControlError>;

    /// Mutes or unmutes the microphone.
    fn set_muted(&self, muted: bool) -> Result<(), CallControlError>;

    /// The platform's identifier for the active call, if it has one.
    fn call_sid(&self) -> Option<String> {
        None
    }
}

/// Name of a forwarded command, for failure notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallCommand {
    EndCall,
    ToggleMute,
    ToggleSpeaker,
    ToggleRecording,
}

impl fmt::Display for CallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallCommand::EndCall => "end call",
            CallCommand::ToggleMute => "toggle mute",
            CallCommand::ToggleSpeaker => "toggle speaker",
            CallCommand::ToggleRecording => "toggle recording",
        };
        f.write_str(name)
    }
}
