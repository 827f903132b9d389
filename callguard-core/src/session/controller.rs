// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Call Session Controller
//!
//! Glues identity, the signaling channel, the verdict interpreter and native
//! call control into the state the in-call screen renders.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use super::call_control::{CallCommand, CallControl, CallControlError, RecordingStatus};
use super::call_sid::CallSid;
use super::events::{EventDispatcher, EventHandler, SessionEvent, SubscriptionId};
use crate::clock::Clock;
use crate::config::SignalingConfig;
use crate::error::{CallGuardError, CallGuardResult};
use crate::identity::IdentityResolver;
use crate::network::{ChannelEvent, ConnectionState, SignalingChannel, Transport};
use crate::verdict::{self, FraudVerdict};

/// Point-in-time copy of the session's reactive fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub is_connected: bool,
    pub fraud_alert: FraudVerdict,
    pub is_recording: bool,
    pub is_muted: bool,
    pub speaker_enabled: bool,
    pub user_id: Option<String>,
    pub call_sid: Option<String>,
    pub signaling_unavailable: bool,
}

/// One active call.
///
/// Owns its signaling channel. All state changes happen on the owner's
/// thread, either in a command method or in [`CallSession::poll`].
pub struct CallSession<T: Transport> {
    config: SignalingConfig,
    identity: IdentityResolver,
    channel: SignalingChannel<T>,
    call_control: Arc<dyn CallControl>,
    clock: Arc<dyn Clock>,
    dispatcher: EventDispatcher,
    active: bool,
    phone_number: Option<String>,
    user_id: Option<String>,
    is_connected: bool,
    fraud_alert: FraudVerdict,
    is_recording: bool,
    is_muted: bool,
    speaker_enabled: bool,
    call_sid: Option<CallSid>,
    signaling_unavailable: bool,
}

impl<T: Transport> CallSession<T> {
    /// Creates an idle session. Nothing connects until [`CallSession::start`].
    pub fn new(
        config: SignalingConfig,
        transport: T,
        identity: IdentityResolver,
        call_control: Arc<dyn CallControl>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let channel = SignalingChannel::new(transport, config.reconnect.clone(), clock.clone());
        CallSession {
            config,
            identity,
            channel,
            call_control,
            clock,
            dispatcher: EventDispatcher::new(),
            active: false,
            phone_number: None,
            user_id: None,
            is_connected: false,
            fraud_alert: FraudVerdict::cleared(),
            is_recording: false,
            is_muted: false,
            speaker_enabled: false,
            call_sid: None,
            signaling_unavailable: false,
        }
    }

    /// Resolves identity and opens the signaling channel.
    ///
    /// Closes any channel left over from an earlier start. Without a phone
    /// number the session stays disconnected; call control keeps working.
    /// A failed restart ends the previous session.
    pub fn start(&mut self, phone_number: Option<&str>) -> CallGuardResult<()> {
        if self.channel.state() != ConnectionState::Disconnected || self.channel.reconnect_pending()
        {
            info!("Restarting call session, closing previous channel");
            self.channel.close();
            self.set_connected(false);
        }
        self.clear_fraud_alert();
        self.signaling_unavailable = false;

        let phone = match phone_number.map(str::trim).filter(|p| !p.is_empty()) {
            Some(phone) => phone.to_string(),
            None => {
                warn!("No phone number provided, session stays disconnected");
                self.abandon_start();
                return Err(CallGuardError::MissingPhoneNumber);
            }
        };

        let user_id = self.identity.get_or_create_user_id(Some(&phone));
        if let Err(e) = self.channel.open(&self.config.endpoint, &user_id, &phone) {
            error!("Failed to open signaling channel: {}", e);
            self.abandon_start();
            return Err(e.into());
        }
        self.active = true;
        self.phone_number = Some(phone);
        self.user_id = Some(user_id);
        info!("Call session started");
        Ok(())
    }

    /// Drives the channel and applies the results.
    ///
    /// Returns the session events produced, after they have been dispatched
    /// to subscribers.
    pub fn poll(&mut self) -> Vec<SessionEvent> {
        let mut emitted = Vec::new();
        for event in self.channel.poll() {
            match event {
                ChannelEvent::Opened => {
                    if !self.is_connected {
                        self.is_connected = true;
                        emitted.push(SessionEvent::ConnectionChanged { connected: true });
                    }
                }
                ChannelEvent::Message(raw) => {
                    if let Some(verdict) = verdict::interpret(&raw) {
                        self.fraud_alert = verdict.clone();
                        emitted.push(SessionEvent::FraudAlertRaised { verdict });
                    }
                }
                ChannelEvent::Closed { .. } | ChannelEvent::Error(_) => {
                    if self.is_connected {
                        self.is_connected = false;
                        emitted.push(SessionEvent::ConnectionChanged { connected: false });
                    }
                }
                ChannelEvent::Unavailable => {
                    self.signaling_unavailable = true;
                    emitted.push(SessionEvent::SignalingUnavailable);
                }
                ChannelEvent::ReconnectScheduled { .. } | ChannelEvent::Reconnecting { .. } => {}
            }
        }

        for event in &emitted {
            self.dispatcher.dispatch(event.clone());
        }
        emitted
    }

    /// Dismisses the fraud alert and keeps the call going.
    pub fn continue_call(&mut self) {
        info!("User chose to continue the call");
        self.clear_fraud_alert();
    }

    /// Dismisses the alert, ends the call natively and tears the session
    /// down. Teardown happens even if the platform refuses to end the call.
    pub fn hang_up(&mut self) {
        self.clear_fraud_alert();
        match self.call_control.end_call() {
            Ok(()) => info!("Call ended"),
            Err(e) => {
                error!("Failed to end call: {}", e);
                self.command_failed(CallCommand::EndCall, &e);
            }
        }
        self.end();
    }

    /// Flips microphone mute. Returns the mute state afterwards.
    pub fn toggle_mute(&mut self) -> bool {
        let target = !self.is_muted;
        match self.call_control.set_muted(target) {
            Ok(()) => {
                self.is_muted = target;
                self.dispatcher.dispatch(SessionEvent::MuteChanged { muted: target });
            }
            Err(e) => {
                error!("Failed to toggle mute: {}", e);
                self.command_failed(CallCommand::ToggleMute, &e);
            }
        }
        self.is_muted
    }

    /// Flips speaker routing. Returns the speaker state afterwards.
    pub fn toggle_speaker(&mut self) -> bool {
        let target = !self.speaker_enabled;
        match self.call_control.set_speaker(target) {
            Ok(()) => {
                self.speaker_enabled = target;
                self.dispatcher.dispatch(SessionEvent::SpeakerChanged { enabled: target });
            }
            Err(e) => {
                error!("Failed to toggle speaker: {}", e);
                self.command_failed(CallCommand::ToggleSpeaker, &e);
            }
        }
        self.speaker_enabled
    }

    /// Starts or stops recording. Returns the recording state afterwards.
    pub fn toggle_recording(&mut self) -> bool {
        match self.call_control.toggle_recording() {
            Ok(RecordingStatus::Started) => {
                if self.call_sid.is_none() {
                    let sid = CallSid::resolve(self.call_control.as_ref(), self.clock.as_ref());
                    info!(source = ?sid.source(), "Recording started, call SID assigned");
                    self.call_sid = Some(sid);
                }
                self.set_recording(true);
            }
            Ok(RecordingStatus::Stopped) => {
                info!("Recording stopped");
                self.call_sid = None;
                self.set_recording(false);
            }
            Err(e) => {
                error!("Failed to toggle recording: {}", e);
                self.command_failed(CallCommand::ToggleRecording, &e);
            }
        }
        self.is_recording
    }

    /// Tears the session down: closes the channel, cancels reconnects and
    /// clears the alert and call SID. Safe to call more than once.
    pub fn end(&mut self) {
        self.channel.close();
        self.clear_fraud_alert();
        self.set_connected(false);
        self.call_sid = None;
        if self.is_recording {
            self.set_recording(false);
        }
        if self.active {
            self.active = false;
            info!("Call session ended");
            self.dispatcher.dispatch(SessionEvent::SessionEnded);
        }
    }

    /// Sends an ad hoc frame. Dropped with a warning when not connected.
    pub fn send<M: Serialize + ?Sized>(&mut self, message: &M) -> bool {
        self.channel.send(message)
    }

    /// Registers a session event handler.
    pub fn subscribe(&mut self, handler: Arc<dyn EventHandler>) -> SubscriptionId {
        self.dispatcher.subscribe(handler)
    }

    /// Removes a handler. Returns false if it was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.dispatcher.unsubscribe(id)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            is_connected: self.is_connected,
            fraud_alert: self.fraud_alert.clone(),
            is_recording: self.is_recording,
            is_muted: self.is_muted,
            speaker_enabled: self.speaker_enabled,
            user_id: self.user_id.clone(),
            call_sid: self.call_sid.as_ref().map(|sid| sid.to_string()),
            signaling_unavailable: self.signaling_unavailable,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn fraud_alert(&self) -> &FraudVerdict {
        &self.fraud_alert
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    pub fn speaker_enabled(&self) -> bool {
        self.speaker_enabled
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    pub fn call_sid(&self) -> Option<&CallSid> {
        self.call_sid.as_ref()
    }

    /// True once the channel gave up reconnecting.
    pub fn is_signaling_unavailable(&self) -> bool {
        self.signaling_unavailable
    }

    /// True between a successful `start` and `end`.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn config(&self) -> &SignalingConfig {
        &self.config
    }

    pub fn channel(&self) -> &SignalingChannel<T> {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut SignalingChannel<T> {
        &mut self.channel
    }

    fn abandon_start(&mut self) {
        self.phone_number = None;
        self.user_id = None;
        if self.active {
            self.end();
        }
    }

    fn clear_fraud_alert(&mut self) {
        if self.fraud_alert.is_active() {
            self.fraud_alert = FraudVerdict::cleared();
            self.dispatcher.dispatch(SessionEvent::FraudAlertCleared);
        }
    }

    fn set_connected(&mut self, connected: bool) {
        if self.is_connected != connected {
            self.is_connected = connected;
            self.dispatcher.dispatch(SessionEvent::ConnectionChanged { connected });
        }
    }

    fn set_recording(&mut self, recording: bool) {
        self.is_recording = recording;
        self.dispatcher.dispatch(SessionEvent::RecordingChanged {
            recording,
            call_sid: self.call_sid.as_ref().map(|sid| sid.to_string()),
        });
    }

    fn command_failed(&self, command: CallCommand, error: &CallControlError) {
        self.dispatcher.dispatch(SessionEvent::CommandFailed {
            command,
            error: error.to_string(),
        });
    }
}
