//! Tests for network::channel
//! Extracted from channel.rs

use std::sync::Arc;
use std::time::Duration;

use callguard_core::network::*;
use callguard_core::ManualClock;

const ENDPOINT: &str = "wss://fraud.example.com/api/ws";
const USER_ID: &str = "user_15551234567_1700000000000";
const PHONE: &str = "+15551234567";

struct Fixture {
    channel: SignalingChannel<MockTransport>,
    transport: MockTransport,
    clock: Arc<ManualClock>,
}

fn fixture_with_policy(policy: ReconnectPolicy) -> Fixture {
    let transport = MockTransport::new();
    let clock = Arc::new(ManualClock::default());
    let channel = SignalingChannel::new(transport.clone(), policy, clock.clone());
    Fixture {
        channel,
        transport,
        clock,
    }
}

fn fixture() -> Fixture {
    fixture_with_policy(ReconnectPolicy::default())
}

fn open_and_connect(f: &mut Fixture) {
    f.channel.open(ENDPOINT, USER_ID, PHONE).unwrap();
    f.transport.emit_open();
    assert_eq!(f.channel.poll(), vec![ChannelEvent::Opened]);
}

#[test]
fn test_open_moves_to_connecting_synchronously() {
    let mut f = fixture();
    assert_eq!(f.channel.state(), ConnectionState::Disconnected);

    f.channel.open(ENDPOINT, USER_ID, PHONE).unwrap();
    assert_eq!(f.channel.state(), ConnectionState::Connecting);
    assert_eq!(f.transport.open_count(), 1);

    // Nothing happened on the wire yet
    assert!(f.channel.poll().is_empty());
    assert_eq!(f.channel.state(), ConnectionState::Connecting);

    f.transport.emit_open();
    assert_eq!(f.channel.poll(), vec![ChannelEvent::Opened]);
    assert_eq!(f.channel.state(), ConnectionState::Connected);
    assert!(f.channel.is_connected());
}

#[test]
fn test_open_builds_connect_url() {
    let mut f = fixture();
    f.channel.open(ENDPOINT, USER_ID, PHONE).unwrap();

    let urls = f.transport.opened_urls();
    assert_eq!(
        urls,
        vec![format!("{}?user_id={}&phone_number=%2B15551234567", ENDPOINT, USER_ID)]
    );
    assert_eq!(f.channel.target_url(), Some(urls[0].as_str()));
}

#[test]
fn test_open_without_phone_number_does_nothing() {
    let mut f = fixture();

    assert_eq!(
        f.channel.open(ENDPOINT, USER_ID, ""),
        Err(NetworkError::MissingPhoneNumber)
    );
    assert_eq!(
        f.channel.open(ENDPOINT, USER_ID, "   "),
        Err(NetworkError::MissingPhoneNumber)
    );
    assert_eq!(f.channel.state(), ConnectionState::Disconnected);
    assert_eq!(f.transport.open_count(), 0);
}

#[test]
fn test_open_rejects_non_websocket_endpoint() {
    let mut f = fixture();

    let result = f.channel.open("https://fraud.example.com/api", USER_ID, PHONE);
    assert!(matches!(result, Err(NetworkError::InvalidEndpoint(_))));
    assert_eq!(f.channel.state(), ConnectionState::Disconnected);
    assert_eq!(f.transport.open_count(), 0);
}

#[test]
fn test_messages_forwarded_in_order() {
    let mut f = fixture();
    open_and_connect(&mut f);

    f.transport.emit_message("one");
    f.transport.emit_message("two");
    f.transport.emit_message("three");

    assert_eq!(
        f.channel.poll(),
        vec![
            ChannelEvent::Message("one".into()),
            ChannelEvent::Message("two".into()),
            ChannelEvent::Message("three".into()),
        ]
    );
}

#[test]
fn test_unexpected_close_arms_reconnect() {
    let mut f = fixture();
    open_and_connect(&mut f);

    f.transport.emit_close("server restart");
    let events = f.channel.poll();
    assert_eq!(
        events,
        vec![
            ChannelEvent::Closed {
                reason: "server restart".into()
            },
            ChannelEvent::ReconnectScheduled {
                attempt: 1,
                delay: Duration::from_millis(2_000),
            },
        ]
    );
    assert_eq!(f.channel.state(), ConnectionState::Disconnected);
    assert!(f.channel.reconnect_pending());
    assert_eq!(f.channel.time_until_reconnect(), Some(Duration::from_millis(2_000)));
}

#[test]
fn test_reconnect_fires_after_delay() {
    let mut f = fixture();
    open_and_connect(&mut f);
    f.transport.emit_close("gone");
    f.channel.poll();

    f.clock.advance(Duration::from_millis(1_999));
    assert!(f.channel.poll().is_empty());
    assert_eq!(f.transport.open_count(), 1);

    f.clock.advance(Duration::from_millis(1));
    assert_eq!(f.channel.poll(), vec![ChannelEvent::Reconnecting { attempt: 1 }]);
    assert_eq!(f.channel.state(), ConnectionState::Connecting);
    assert_eq!(f.transport.open_count(), 2);

    // Same URL on reconnect
    let urls = f.transport.opened_urls();
    assert_eq!(urls[0], urls[1]);
}

#[test]
fn test_backoff_grows_and_resets_after_success() {
    let mut f = fixture();
    f.channel.open(ENDPOINT, USER_ID, PHONE).unwrap();

    // Four failed cycles without ever opening
    let expected = [2_000u64, 4_000, 8_000, 16_000, 30_000, 30_000];
    for (i, delay_ms) in expected.iter().enumerate() {
        f.transport.emit_error("connection refused");
        let events = f.channel.poll();
        assert!(events.contains(&ChannelEvent::ReconnectScheduled {
            attempt: i as u32 + 1,
            delay: Duration::from_millis(*delay_ms),
        }));
        assert_eq!(f.channel.reconnect_attempt(), i as u32 + 1);

        f.clock.advance(Duration::from_millis(*delay_ms));
        f.channel.poll();
        assert_eq!(f.channel.state(), ConnectionState::Connecting);
    }

    f.transport.emit_open();
    f.channel.poll();
    assert_eq!(f.channel.reconnect_attempt(), 0);

    f.transport.emit_close("again");
    let events = f.channel.poll();
    assert!(events.contains(&ChannelEvent::ReconnectScheduled {
        attempt: 1,
        delay: Duration::from_millis(2_000),
    }));
}

#[test]
fn test_error_then_close_counts_once() {
    let mut f = fixture();
    open_and_connect(&mut f);

    f.transport.emit_error("broken pipe");
    f.transport.emit_close("");
    let events = f.channel.poll();

    let scheduled = events
        .iter()
        .filter(|e| matches!(e, ChannelEvent::ReconnectScheduled { .. }))
        .count();
    assert_eq!(scheduled, 1);
    assert_eq!(f.channel.reconnect_attempt(), 1);
}

#[test]
fn test_close_cancels_armed_reconnect() {
    let mut f = fixture();
    open_and_connect(&mut f);
    f.transport.emit_close("gone");
    f.channel.poll();
    assert!(f.channel.reconnect_pending());

    f.channel.close();
    assert!(!f.channel.reconnect_pending());
    assert!(f.channel.is_stopped());

    f.clock.advance(Duration::from_secs(120));
    assert!(f.channel.poll().is_empty());
    assert_eq!(f.transport.open_count(), 1);
    assert_eq!(f.channel.state(), ConnectionState::Disconnected);
}

#[test]
fn test_close_in_every_state_prevents_reconnect() {
    // Connecting
    let mut f = fixture();
    f.channel.open(ENDPOINT, USER_ID, PHONE).unwrap();
    f.channel.close();
    f.clock.advance(Duration::from_secs(60));
    assert!(f.channel.poll().is_empty());
    assert_eq!(f.transport.open_count(), 1);

    // Connected
    let mut f = fixture();
    open_and_connect(&mut f);
    f.channel.close();
    f.clock.advance(Duration::from_secs(60));
    assert!(f.channel.poll().is_empty());
    assert_eq!(f.transport.open_count(), 1);

    // Never opened
    let mut f = fixture();
    f.channel.close();
    assert!(f.channel.poll().is_empty());
    assert_eq!(f.transport.open_count(), 0);
}

#[test]
fn test_late_close_after_close_is_ignored() {
    let mut f = fixture();
    open_and_connect(&mut f);

    f.channel.close();
    assert!(!f.transport.is_attached());

    // The old socket reports its close after we detached
    assert!(!f.transport.emit_close("late"));
    assert_eq!(f.transport.dropped_events(), 1);

    f.clock.advance(Duration::from_secs(60));
    assert!(f.channel.poll().is_empty());
    assert!(!f.channel.reconnect_pending());
}

#[test]
fn test_close_is_idempotent() {
    let mut f = fixture();
    open_and_connect(&mut f);

    f.channel.close();
    f.channel.close();

    assert_eq!(f.channel.state(), ConnectionState::Disconnected);
    assert!(f.channel.is_stopped());
}

#[test]
fn test_close_discards_undelivered_events() {
    let mut f = fixture();
    open_and_connect(&mut f);
    f.transport.emit_message(r#"{"is_fraud": true}"#);

    f.channel.close();
    assert!(f.channel.poll().is_empty());
}

#[test]
fn test_reopen_after_close() {
    let mut f = fixture();
    open_and_connect(&mut f);
    f.channel.close();

    f.channel.open(ENDPOINT, USER_ID, PHONE).unwrap();
    assert!(!f.channel.is_stopped());
    f.transport.emit_open();
    assert_eq!(f.channel.poll(), vec![ChannelEvent::Opened]);
}

#[test]
fn test_second_open_closes_previous_connection() {
    let mut f = fixture();
    open_and_connect(&mut f);
    let closes_before = f.transport.close_count();

    f.channel.open(ENDPOINT, USER_ID, PHONE).unwrap();

    assert_eq!(f.transport.close_count(), closes_before + 1);
    assert_eq!(f.transport.open_count(), 2);
    assert_eq!(f.channel.state(), ConnectionState::Connecting);
}

#[test]
fn test_failed_open_schedules_reconnect() {
    let mut f = fixture();
    f.transport.fail_next_open(NetworkError::ConnectionFailed("dns lookup failed".into()));

    f.channel.open(ENDPOINT, USER_ID, PHONE).unwrap();
    let events = f.channel.poll();

    assert!(matches!(events[0], ChannelEvent::Error(_)));
    assert_eq!(
        events[1],
        ChannelEvent::ReconnectScheduled {
            attempt: 1,
            delay: Duration::from_millis(2_000),
        }
    );

    f.clock.advance(Duration::from_millis(2_000));
    f.channel.poll();
    assert_eq!(f.transport.open_count(), 2);
    assert_eq!(f.channel.state(), ConnectionState::Connecting);
}

#[test]
fn test_send_while_disconnected_is_noop() {
    let mut f = fixture();
    assert!(!f.channel.send(&serde_json::json!({"type": "ping"})));

    f.channel.open(ENDPOINT, USER_ID, PHONE).unwrap();
    assert!(!f.channel.send(&serde_json::json!({"type": "ping"})));

    assert!(f.transport.sent_messages().is_empty());
}

#[test]
fn test_send_while_connected() {
    let mut f = fixture();
    open_and_connect(&mut f);

    assert!(f.channel.send(&serde_json::json!({"type": "ping"})));
    assert_eq!(f.transport.sent_messages(), vec![r#"{"type":"ping"}"#.to_string()]);
}

#[test]
fn test_message_before_open_is_ignored() {
    let mut f = fixture();
    f.channel.open(ENDPOINT, USER_ID, PHONE).unwrap();

    f.transport.emit_message("early");
    assert!(f.channel.poll().is_empty());
}

#[test]
fn test_ceiling_reports_unavailable_once() {
    let mut f = fixture_with_policy(ReconnectPolicy {
        max_attempts: Some(2),
        ..Default::default()
    });
    f.channel.open(ENDPOINT, USER_ID, PHONE).unwrap();

    for _ in 0..2 {
        f.transport.emit_error("refused");
        f.channel.poll();
        f.clock.advance(Duration::from_secs(30));
        f.channel.poll();
    }
    assert_eq!(f.transport.open_count(), 3);

    f.transport.emit_error("refused");
    let events = f.channel.poll();
    assert!(events.contains(&ChannelEvent::Unavailable));
    assert!(f.channel.is_unavailable());
    assert!(!f.channel.reconnect_pending());

    f.clock.advance(Duration::from_secs(300));
    assert!(f.channel.poll().is_empty());
    assert_eq!(f.transport.open_count(), 3);
}

#[test]
fn test_drop_closes_transport() {
    let transport = MockTransport::new();
    {
        let mut channel = SignalingChannel::new(
            transport.clone(),
            ReconnectPolicy::default(),
            Arc::new(ManualClock::default()),
        );
        channel.open(ENDPOINT, USER_ID, PHONE).unwrap();
        assert!(transport.is_attached());
    }
    assert!(!transport.is_attached());
}
