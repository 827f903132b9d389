//! Tests for session::events
//! Extracted from events.rs

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use callguard_core::session::*;
use callguard_core::FraudVerdict;

fn counting_handler(count: &Arc<AtomicUsize>) -> Arc<dyn EventHandler> {
    let count = count.clone();
    Arc::new(CallbackHandler::new(move |_| {
        count.fetch_add(1, Ordering::SeqCst);
    }))
}

#[test]
fn test_session_event_variants() {
    let event = SessionEvent::FraudAlertRaised {
        verdict: FraudVerdict::alert("scam"),
    };
    assert!(matches!(event, SessionEvent::FraudAlertRaised { .. }));

    let event = SessionEvent::CommandFailed {
        command: CallCommand::ToggleMute,
        error: "microphone unavailable".into(),
    };
    assert!(matches!(event, SessionEvent::CommandFailed { .. }));
}

#[test]
fn test_callback_handler() {
    let count = Arc::new(AtomicUsize::new(0));
    let handler = counting_handler(&count);

    handler.on_event(SessionEvent::FraudAlertCleared);

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_event_dispatcher_subscribe() {
    let mut dispatcher = EventDispatcher::new();
    assert_eq!(dispatcher.handler_count(), 0);

    let first = dispatcher.subscribe(Arc::new(CallbackHandler::new(|_| {})));
    let second = dispatcher.subscribe(Arc::new(CallbackHandler::new(|_| {})));

    assert_ne!(first, second);
    assert_eq!(dispatcher.handler_count(), 2);
}

#[test]
fn test_event_dispatcher_dispatch() {
    let count = Arc::new(AtomicUsize::new(0));
    let mut dispatcher = EventDispatcher::new();
    dispatcher.subscribe(counting_handler(&count));
    dispatcher.subscribe(counting_handler(&count));

    dispatcher.dispatch(SessionEvent::SessionEnded);

    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn test_event_dispatcher_unsubscribe_is_idempotent() {
    let count = Arc::new(AtomicUsize::new(0));
    let mut dispatcher = EventDispatcher::new();
    let id = dispatcher.subscribe(counting_handler(&count));

    assert!(dispatcher.unsubscribe(id));
    assert!(!dispatcher.unsubscribe(id));
    assert_eq!(dispatcher.handler_count(), 0);

    dispatcher.dispatch(SessionEvent::SessionEnded);
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unsubscribe_leaves_other_handlers() {
    let kept = Arc::new(AtomicUsize::new(0));
    let removed = Arc::new(AtomicUsize::new(0));
    let mut dispatcher = EventDispatcher::new();
    dispatcher.subscribe(counting_handler(&kept));
    let id = dispatcher.subscribe(counting_handler(&removed));

    dispatcher.unsubscribe(id);
    dispatcher.dispatch(SessionEvent::SignalingUnavailable);

    assert_eq!(kept.load(Ordering::SeqCst), 1);
    assert_eq!(removed.load(Ordering::SeqCst), 0);
}

#[test]
fn test_ids_are_not_reused() {
    let mut dispatcher = EventDispatcher::new();
    let first = dispatcher.subscribe(Arc::new(CallbackHandler::new(|_| {})));
    dispatcher.unsubscribe(first);
    let second = dispatcher.subscribe(Arc::new(CallbackHandler::new(|_| {})));

    assert_ne!(first, second);
}

#[test]
fn test_clear_handlers() {
    let mut dispatcher = EventDispatcher::new();
    dispatcher.subscribe(Arc::new(CallbackHandler::new(|_| {})));
    dispatcher.clear_handlers();
    assert_eq!(dispatcher.handler_count(), 0);
}

#[test]
fn test_call_command_display() {
    assert_eq!(CallCommand::EndCall.to_string(), "end call");
    assert_eq!(CallCommand::ToggleRecording.to_string(), "toggle recording");
}

#[test]
fn test_recording_status_parsing() {
    assert_eq!("Recording started".parse::<RecordingStatus>().unwrap(), RecordingStatus::Started);
    assert_eq!("Recording stopped".parse::<RecordingStatus>().unwrap(), RecordingStatus::Stopped);
    assert_eq!(
        "Paused".parse::<RecordingStatus>(),
        Err(CallControlError::UnexpectedResponse("Paused".into()))
    );
    assert_eq!(RecordingStatus::Started.to_string(), "Recording started");
}
