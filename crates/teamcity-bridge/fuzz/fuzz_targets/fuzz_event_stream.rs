// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the lifecycle event stream
//!
//! Decodes arbitrary input line by line and feeds every decoded event to a
//! bridge. Neither step may panic, and every emitted line must be a single
//! well-formed service message.

#![no_main]

use libfuzzer_sys::fuzz_target;

use teamcity_bridge::LifecycleBridge;
use teamcity_bridge::stream::{LifecycleEvent, LineDecoder};
use teamcity_messages::ServiceMessages;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let mut decoder = LineDecoder::<LifecycleEvent>::new();
        let mut bridge = LifecycleBridge::new(ServiceMessages::new(Vec::new()));

        for line in input.lines() {
            if let Ok(Some(event)) = decoder.decode_line(line) {
                let _ = bridge.handle(&event);
            }
        }

        let out = String::from_utf8(bridge.into_inner()).expect("output is UTF-8");
        for line in out.lines() {
            assert!(line.starts_with("##teamcity["));
            assert!(line.ends_with(']'));
        }
    }
});
