//! Proptest strategies shared by the property tests.

use proptest::prelude::*;

/// Phone numbers the way users type them: digits mixed with separators.
pub fn formatted_phone_number() -> impl Strategy<Value = String> {
    (
        prop::option::of(Just("+")),
        prop::collection::vec(
            (0u8..10, prop::sample::select(vec!["", " ", "-", "(", ")", "."])),
            10..15,
        ),
    )
        .prop_map(|(prefix, parts)| {
            let mut out = prefix.unwrap_or_default().to_string();
            for (digit, sep) in parts {
                out.push_str(sep);
                out.push(char::from(b'0' + digit));
            }
            out
        })
}

/// Arbitrary text, including invalid JSON.
pub fn arbitrary_frame() -> impl Strategy<Value = String> {
    prop_oneof![
        ".*",
        Just(r#"{"is_fraud": true}"#.to_string()),
        Just(r#"{"is_fraud": "yes"}"#.to_string()),
        Just("[]".to_string()),
        "[a-z]{0,12}".prop_map(|t| format!(r#"{{"is_fraud": true, "fraud_type": "{}"}}"#, t)),
    ]
}
