// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for node id normalization

#![no_main]

use libfuzzer_sys::fuzz_target;

use teamcity_bridge::normalize;

fuzz_target!(|data: &[u8]| {
    if let Ok(nodeid) = std::str::from_utf8(data) {
        match normalize(nodeid) {
            Ok(id) => assert_eq!(normalize(nodeid).ok(), Some(id)),
            Err(_) => assert!(nodeid.is_empty()),
        }
    }
});
