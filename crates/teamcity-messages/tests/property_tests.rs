// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Property-based tests for the escape table
//!
//! These tests use proptest to check that escaped values never leak a
//! protocol-significant character and never touch anything else.

use proptest::prelude::*;
use teamcity_messages::{encode, escape};

/// Reverse the escape table; `None` if the input is not a valid escape output
fn unescape(value: &str) -> Option<String> {
    let mut out = String::new();
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '|' {
            let decoded = match chars.next()? {
                '\'' => '\'',
                'n' => '\n',
                'r' => '\r',
                '|' => '|',
                '[' => '[',
                ']' => ']',
                _ => return None,
            };
            out.push(decoded);
        } else {
            out.push(ch);
        }
    }
    Some(out)
}

/// Strings biased towards the characters the protocol cares about
fn protocol_string() -> impl Strategy<Value = String> {
    prop_oneof![
        ".*{0,100}".prop_map(|s| s),
        prop::collection::vec(
            prop_oneof![
                Just('\''),
                Just('\n'),
                Just('\r'),
                Just('|'),
                Just('['),
                Just(']'),
                Just('\t'),
                Just('\u{0}'),
                Just('a'),
                Just('é'),
            ],
            0..50
        )
        .prop_map(|chars| chars.into_iter().collect()),
    ]
}

proptest! {
    #[test]
    fn escape_is_reversible(value in protocol_string()) {
        let escaped = escape(&value);
        prop_assert_eq!(unescape(&escaped), Some(value));
    }

    #[test]
    fn escape_leaves_no_raw_special_characters(value in protocol_string()) {
        let escaped = escape(&value);
        prop_assert!(!escaped.contains('\n'));
        prop_assert!(!escaped.contains('\r'));

        // Every special character in the output is preceded by an escaping `|`
        let mut pending_bar = false;
        for ch in escaped.chars() {
            if pending_bar {
                pending_bar = false;
                continue;
            }
            match ch {
                '|' => pending_bar = true,
                '\'' | '[' | ']' => prop_assert!(false, "unescaped {:?} in {:?}", ch, escaped),
                _ => {}
            }
        }
        prop_assert!(!pending_bar);
    }

    #[test]
    fn escape_is_identity_without_special_characters(value in "[^'\\n\\r|\\[\\]]{0,100}") {
        prop_assert_eq!(escape(&value), value);
    }

    #[test]
    fn encoded_line_is_single_line(name in "[a-zA-Z]{1,20}", value in protocol_string()) {
        let line = encode(&name, "", [("name", value.as_str())]).expect("valid names");
        prop_assert!(line.starts_with("##teamcity["));
        prop_assert!(line.ends_with(']'));
        prop_assert_eq!(line.lines().count(), 1);
    }
}
