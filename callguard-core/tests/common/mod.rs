// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Common Test Utilities
//!
//! Shared fixtures for session and identity tests.

#![allow(dead_code)]

pub mod strategies;

use std::sync::Arc;

use parking_lot::Mutex;

use callguard_core::session::{CallControl, CallControlError, RecordingStatus};
use callguard_core::storage::{KeyValueStore, MemoryStore, StorageError};
use callguard_core::{
    CallSession, IdentityResolver, ManualClock, MockTransport, SessionEvent, SignalingConfig,
};

pub const TEST_ENDPOINT: &str = "wss://fraud.example.com/api/ws";
pub const TEST_PHONE: &str = "+15551234567";

#[derive(Debug, Default)]
struct CallControlState {
    calls: Vec<String>,
    fail_end_call: bool,
    fail_mute: bool,
    fail_speaker: bool,
    recording_response: Option<Result<RecordingStatus, CallControlError>>,
    recording: bool,
    native_sid: Option<String>,
}

/// Scripted platform call control.
///
/// Records every command. Recording toggles alternate between started and
/// stopped unless a response is forced.
#[derive(Debug, Default)]
pub struct MockCallControl {
    state: Mutex<CallControlState>,
}

impl MockCallControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn fail_end_call(&self) {
        self.state.lock().fail_end_call = true;
    }

    pub fn fail_mute(&self) {
        self.state.lock().fail_mute = true;
    }

    pub fn fail_speaker(&self) {
        self.state.lock().fail_speaker = true;
    }

    pub fn force_recording_response(&self, response: Result<RecordingStatus, CallControlError>) {
        self.state.lock().recording_response = Some(response);
    }

    pub fn set_native_sid(&self, sid: &str) {
        self.state.lock().native_sid = Some(sid.to_string());
    }
}

impl CallControl for MockCallControl {
    fn end_call(&self) -> Result<(), CallControlError> {
        let mut state = self.state.lock();
        state.calls.push("end_call".into());
        if state.fail_end_call {
            return Err(CallControlError::NoActiveCall);
        }
        Ok(())
    }

    fn toggle_recording(&self) -> Result<RecordingStatus, CallControlError> {
        let mut state = self.state.lock();
        state.calls.push("toggle_recording".into());
        if let Some(response) = state.recording_response.take() {
            return response;
        }
        state.recording = !state.recording;
        Ok(if state.recording {
            RecordingStatus::Started
        } else {
            RecordingStatus::Stopped
        })
    }

    fn set_speaker(&self, enabled: bool) -> Result<(), CallControlError> {
        let mut state = self.state.lock();
        state.calls.push(format!("set_speaker({})", enabled));
        if state.fail_speaker {
            return Err(CallControlError::Rejected("audio route busy".into()));
        }
        Ok(())
    }

    fn set_muted(&self, muted: bool) -> Result<(), CallControlError> {
        let mut state = self.state.lock();
        state.calls.push(format!("set_muted({})", muted));
        if state.fail_mute {
            return Err(CallControlError::Rejected("microphone unavailable".into()));
        }
        Ok(())
    }

    fn call_sid(&self) -> Option<String> {
        self.state.lock().native_sid.clone()
    }
}

/// Store whose every operation fails.
#[derive(Debug, Default)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Backend("disk unavailable".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Backend("disk unavailable".into()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Backend("disk unavailable".into()))
    }
}

/// A session wired to mocks, plus handles to drive them.
pub struct SessionHarness {
    pub session: CallSession<MockTransport>,
    pub transport: MockTransport,
    pub call_control: Arc<MockCallControl>,
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemoryStore>,
    pub events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl SessionHarness {
    pub fn new() -> Self {
        Self::with_config(SignalingConfig::new(TEST_ENDPOINT))
    }

    pub fn with_config(config: SignalingConfig) -> Self {
        let transport = MockTransport::new();
        let call_control = Arc::new(MockCallControl::new());
        let clock = Arc::new(ManualClock::default());
        let store = Arc::new(MemoryStore::new());
        let identity = IdentityResolver::new(store.clone(), clock.clone());

        let mut session = CallSession::new(
            config,
            transport.clone(),
            identity,
            call_control.clone(),
            clock.clone(),
        );

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        session.subscribe(Arc::new(callguard_core::CallbackHandler::new(
            move |event| sink.lock().push(event),
        )));

        SessionHarness {
            session,
            transport,
            call_control,
            clock,
            store,
            events,
        }
    }

    /// Starts the session and completes the handshake.
    pub fn connect(&mut self) {
        self.session
            .start(Some(TEST_PHONE))
            .expect("start should succeed");
        assert!(self.transport.emit_open());
        self.session.poll();
        assert!(self.session.is_connected());
    }

    pub fn take_events(&self) -> Vec<SessionEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}
