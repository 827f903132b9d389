//! Monitor Command
//!
//! Runs a live call session against the fraud-scoring endpoint and prints
//! every session event. There is no telephony stack behind the terminal, so
//! call control is a console stub.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use callguard_core::{
    CallControl, CallControlError, CallGuardError, CallSession, CallbackHandler, IdentityResolver,
    PhoneNumberStore, RecordingStatus, SessionEvent, SystemClock, WebSocketTransport,
};
use tracing::debug;

use crate::config::CliConfig;
use crate::display;

/// Options for `callguard monitor`.
pub struct MonitorOptions {
    pub phone: Option<String>,
    pub duration: Option<u64>,
    pub max_reconnects: Option<u32>,
    pub hang_up_on_alert: bool,
    pub record: bool,
}

/// Call control that only reports what a phone would do.
#[derive(Default)]
struct ConsoleCallControl {
    recording: AtomicBool,
}

impl CallControl for ConsoleCallControl {
    fn end_call(&self) -> Result<(), CallControlError> {
        println!("[call] end call");
        Ok(())
    }

    fn toggle_recording(&self) -> Result<RecordingStatus, CallControlError> {
        let was_recording = self.recording.fetch_xor(true, Ordering::SeqCst);
        let status = if was_recording {
            RecordingStatus::Stopped
        } else {
            RecordingStatus::Started
        };
        println!("[call] {}", status);
        Ok(status)
    }

    fn set_speaker(&self, enabled: bool) -> Result<(), CallControlError> {
        println!("[call] speaker {}", if enabled { "on" } else { "off" });
        Ok(())
    }

    fn set_muted(&self, muted: bool) -> Result<(), CallControlError> {
        println!("[call] microphone {}", if muted { "muted" } else { "live" });
        Ok(())
    }
}

pub fn run(config: &CliConfig, options: MonitorOptions) -> Result<()> {
    let mut signaling = config.signaling_config()?;
    if let Some(attempts) = options.max_reconnects {
        signaling = signaling.with_max_reconnect_attempts(attempts);
    }

    let store = config.open_store()?;
    let phone = match options.phone {
        Some(phone) => Some(phone),
        None => PhoneNumberStore::new(store.clone()).load()?,
    };

    let clock = Arc::new(SystemClock);
    let poll_interval = Duration::from_millis(signaling.io_poll_interval_ms.max(1));
    let transport = WebSocketTransport::new(signaling.to_transport_config());
    let mut session = CallSession::new(
        signaling,
        transport,
        IdentityResolver::new(store, clock.clone()),
        Arc::new(ConsoleCallControl::default()),
        clock,
    );
    session.subscribe(Arc::new(CallbackHandler::new(|event: SessionEvent| {
        display::session_event(&event)
    })));

    match session.start(phone.as_deref()) {
        Ok(()) => {}
        Err(CallGuardError::MissingPhoneNumber) => {
            bail!("No phone number. Pass --phone or run: callguard phone set <number>")
        }
        Err(e) => return Err(e.into()),
    }
    display::info(&format!("Monitoring {}", session.config().endpoint));

    let deadline = options
        .duration
        .map(|secs| Instant::now() + Duration::from_secs(secs));
    let mut record_pending = options.record;

    while session.is_active() {
        for event in session.poll() {
            match event {
                SessionEvent::ConnectionChanged { connected: true } if record_pending => {
                    record_pending = false;
                    session.toggle_recording();
                }
                SessionEvent::FraudAlertRaised { .. } if options.hang_up_on_alert => {
                    session.hang_up();
                }
                SessionEvent::SignalingUnavailable => session.end(),
                _ => {}
            }
        }

        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            debug!("Monitor duration elapsed");
            session.end();
        }
        thread::sleep(poll_interval);
    }

    Ok(())
}
