//! Display Helpers
//!
//! Terminal output formatting and styling.

use console::style;
use callguard_core::{FraudVerdict, SessionEvent};

/// Prints a success message.
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Prints a warning message.
pub fn warning(msg: &str) {
    println!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Prints an info message.
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Prints a fraud alert banner.
pub fn alert(verdict: &FraudVerdict) {
    println!(
        "{} {}",
        style("!!").red().bold(),
        style(format!("FRAUD ALERT: {}", verdict.fraud_type))
            .red()
            .bold()
    );
}

/// Masks all but the last four digits of a phone number.
pub fn mask_phone(number: &str) -> String {
    let digits: Vec<char> = number.chars().collect();
    if digits.len() <= 4 {
        return number.to_string();
    }
    let visible: String = digits[digits.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(digits.len() - 4), visible)
}

/// Prints one session event.
pub fn session_event(event: &SessionEvent) {
    match event {
        SessionEvent::ConnectionChanged { connected: true } => success("Connected"),
        SessionEvent::ConnectionChanged { connected: false } => warning("Disconnected"),
        SessionEvent::FraudAlertRaised { verdict } => alert(verdict),
        SessionEvent::FraudAlertCleared => info("Alert cleared"),
        SessionEvent::MuteChanged { muted } => info(&format!("Muted: {}", muted)),
        SessionEvent::SpeakerChanged { enabled } => info(&format!("Speaker: {}", enabled)),
        SessionEvent::RecordingChanged {
            recording: true,
            call_sid,
        } => info(&format!(
            "Recording started (call SID {})",
            call_sid.as_deref().unwrap_or("-")
        )),
        SessionEvent::RecordingChanged {
            recording: false, ..
        } => info("Recording stopped"),
        SessionEvent::CommandFailed { command, error } => {
            warning(&format!("Failed to {}: {}", command, error))
        }
        SessionEvent::SignalingUnavailable => warning("Fraud signaling unavailable"),
        SessionEvent::SessionEnded => info("Session ended"),
    }
}

#[cfg(test)]
mod tests {
    // INLINE_TEST_REQUIRED: display is a private module of the binary
    use super::*;

    #[test]
    fn test_mask_phone() {
        assert_eq!(mask_phone("15551234567"), "*******4567");
        assert_eq!(mask_phone("1234"), "1234");
        assert_eq!(mask_phone(""), "");
    }
}
