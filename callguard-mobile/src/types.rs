//! Mobile-friendly data types.
//!
//! These types are wrappers around callguard-core types that are compatible
//! with UniFFI for cross-language bindings.

use callguard_core::{CallCommand, FraudVerdict, SessionEvent, SessionSnapshot};

/// Fraud alert shown over the in-call screen.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct MobileFraudAlert {
    /// True while the alert is active and unacknowledged.
    pub status: bool,
    /// Uppercase category, empty when cleared.
    pub fraud_type: String,
}

impl From<FraudVerdict> for MobileFraudAlert {
    fn from(verdict: FraudVerdict) -> Self {
        MobileFraudAlert {
            status: verdict.status,
            fraud_type: verdict.fraud_type,
        }
    }
}

/// Everything the in-call screen renders.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct MobileSessionState {
    pub is_connected: bool,
    pub fraud_alert: MobileFraudAlert,
    pub is_recording: bool,
    pub is_muted: bool,
    pub speaker_enabled: bool,
    pub user_id: Option<String>,
    pub call_sid: Option<String>,
    pub signaling_unavailable: bool,
}

impl From<SessionSnapshot> for MobileSessionState {
    fn from(snapshot: SessionSnapshot) -> Self {
        MobileSessionState {
            is_connected: snapshot.is_connected,
            fraud_alert: snapshot.fraud_alert.into(),
            is_recording: snapshot.is_recording,
            is_muted: snapshot.is_muted,
            speaker_enabled: snapshot.speaker_enabled,
            user_id: snapshot.user_id,
            call_sid: snapshot.call_sid,
            signaling_unavailable: snapshot.signaling_unavailable,
        }
    }
}

/// Call-control command names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum MobileCallCommand {
    EndCall,
    ToggleMute,
    ToggleSpeaker,
    ToggleRecording,
}

impl From<CallCommand> for MobileCallCommand {
    fn from(command: CallCommand) -> Self {
        match command {
            CallCommand::EndCall => MobileCallCommand::EndCall,
            CallCommand::ToggleMute => MobileCallCommand::ToggleMute,
            CallCommand::ToggleSpeaker => MobileCallCommand::ToggleSpeaker,
            CallCommand::ToggleRecording => MobileCallCommand::ToggleRecording,
        }
    }
}

/// Session event delivered to the platform observer.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum MobileSessionEvent {
    ConnectionChanged { connected: bool },
    FraudAlertRaised { alert: MobileFraudAlert },
    FraudAlertCleared,
    MuteChanged { muted: bool },
    SpeakerChanged { enabled: bool },
    RecordingChanged { recording: bool, call_sid: Option<String> },
    CommandFailed { command: MobileCallCommand, error: String },
    SignalingUnavailable,
    SessionEnded,
}

impl From<SessionEvent> for MobileSessionEvent {
    fn from(event: SessionEvent) -> Self {
        match event {
            SessionEvent::ConnectionChanged { connected } => {
                MobileSessionEvent::ConnectionChanged { connected }
            }
            SessionEvent::FraudAlertRaised { verdict } => MobileSessionEvent::FraudAlertRaised {
                alert: verdict.into(),
            },
            SessionEvent::FraudAlertCleared => MobileSessionEvent::FraudAlertCleared,
            SessionEvent::MuteChanged { muted } => MobileSessionEvent::MuteChanged { muted },
            SessionEvent::SpeakerChanged { enabled } => {
                MobileSessionEvent::SpeakerChanged { enabled }
            }
            SessionEvent::RecordingChanged {
                recording,
                call_sid,
            } => MobileSessionEvent::RecordingChanged {
                recording,
                call_sid,
            },
            SessionEvent::CommandFailed { command, error } => MobileSessionEvent::CommandFailed {
                command: command.into(),
                error,
            },
            SessionEvent::SignalingUnavailable => MobileSessionEvent::SignalingUnavailable,
            SessionEvent::SessionEnded => MobileSessionEvent::SessionEnded,
        }
    }
}
