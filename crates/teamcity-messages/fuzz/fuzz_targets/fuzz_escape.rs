// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for service message encoding
//!
//! Any UTF-8 value must encode into exactly one physical line.

#![no_main]

use libfuzzer_sys::fuzz_target;

use teamcity_messages::encode;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = std::str::from_utf8(data) {
        let line = encode("testFailed", value, [("details", value)]).expect("fixed names are valid");
        assert!(!line.contains('\n'));
        assert!(!line.contains('\r'));
    }
});
