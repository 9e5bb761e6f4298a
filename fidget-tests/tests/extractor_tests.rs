//! Integration Tests für den Descriptor Extractor
//!
//! Realistische API-Antworten plus kaputte und abgeschnittene Eingaben.

mod common;

use common::amber_body;
use fidget_core::{ParseError, extract_descriptor, scan_descriptor};

#[test]
fn test_realistic_response() {
    let body = amber_body("neutral");
    assert_eq!(extract_descriptor(body.as_bytes()), Some("neutral"));
}

#[test]
fn test_pretty_printed_response() {
    let body = br#"
    [
      {
        "type": "CurrentInterval",
        "perKwh": 31.5,
        "channelType": "general",
        "descriptor": "high",
        "tariffInformation": { "period": "peak", "block": [1, 2, 3] },
        "estimate": false
      }
    ]
    "#;
    assert_eq!(extract_descriptor(body), Some("high"));
}

#[test]
fn test_general_among_noise() {
    let body = br#"[1, "text", null, [true, {"channelType":"general"}], {"channelType": 7},
        {"channelType":"controlledLoad","descriptor":"spike"},
        {"channelType":"general","descriptor":"high"}, {"bogus"}]"#;
    assert_eq!(extract_descriptor(body), Some("high"));
}

#[test]
fn test_escaped_quotes_do_not_end_strings() {
    let body = br#"["say \"hi\" ]", "\\", {"channelType":"general","descriptor":"low"}]"#;
    assert_eq!(extract_descriptor(body), Some("low"));
}

#[test]
fn test_any_truncation_is_absent() {
    let body = amber_body("spike");
    let bytes = body.as_bytes();
    for cut in 0..bytes.len() {
        assert_eq!(
            extract_descriptor(&bytes[..cut]),
            None,
            "prefix of {} bytes produced a descriptor",
            cut
        );
    }
    assert_eq!(extract_descriptor(bytes), Some("spike"));
}

#[test]
fn test_truncation_reason() {
    let body = amber_body("spike");
    let bytes = &body.as_bytes()[..200];
    assert_eq!(scan_descriptor(bytes), Err(ParseError::Malformed));
}

#[test]
fn test_garbage_inputs_are_absent() {
    let inputs: [&[u8]; 9] = [
        b"",
        b"\0",
        b"null",
        b"42",
        b"<html><body>Bad Gateway</body></html>",
        br#"{"channelType":"general","descriptor":"high"}"#,
        b"[1, 2, 3]",
        b"[[[[[[[[[[[[[[[[[[[[]]]]]]]]]]]]]]]]]]]]",
        &[0xFF, 0xFE, b'[', 0x80],
    ];
    for input in inputs {
        assert_eq!(extract_descriptor(input), None);
    }
}

#[test]
fn test_descriptor_that_is_not_a_string_is_skipped() {
    let body = br#"[{"channelType":"general","descriptor":5},{"channelType":"general","descriptor":"low"}]"#;
    assert_eq!(extract_descriptor(body), Some("low"));
}
