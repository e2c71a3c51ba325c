// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! teamcity-bridge: test lifecycle and lint reporting for TeamCity
//!
//! This library crate turns test runner lifecycle events (test started,
//! phase reports, collection failures, session end) and lint diagnostics
//! into TeamCity service messages.
//!
//! # Example
//!
//! ```
//! use teamcity_bridge::LifecycleBridge;
//! use teamcity_bridge::stream::{LifecycleEvent, decode_all};
//! use teamcity_messages::ServiceMessages;
//!
//! let input = r#"{"event":"logstart","nodeid":"tests/test_math.py::test_add"}
//! {"event":"report","nodeid":"tests/test_math.py::test_add","outcome":"passed","when":"call","duration":1.5}"#;
//!
//! let mut bridge = LifecycleBridge::new(ServiceMessages::new(Vec::new()));
//! for event in decode_all::<LifecycleEvent>(input).unwrap() {
//!     bridge.handle(&event).unwrap();
//! }
//!
//! let out = String::from_utf8(bridge.into_inner()).unwrap();
//! let expected = concat!(
//!     "##teamcity[testStarted name='tests.test_math_py.test_add']\n",
//!     "##teamcity[testFinished name='tests.test_math_py.test_add' duration='1.500000']\n",
//! );
//! assert_eq!(out, expected);
//! ```

pub mod diagnostic;
pub mod error;
pub mod lifecycle;
pub mod node_id;
pub mod report;
pub mod stream;

pub use diagnostic::{Diagnostic, LintReport, adapt};
pub use error::BridgeError;
pub use lifecycle::{LifecycleBridge, TestRunState};
pub use node_id::{TestId, normalize};
pub use report::{CollectReport, Location, Outcome, Phase, ReportDetail, TestReport};
pub use stream::{LifecycleEvent, LineDecoder, Records, decode_all};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::diagnostic::{Diagnostic, LintReport};
    pub use crate::error::BridgeError;
    pub use crate::lifecycle::LifecycleBridge;
    pub use crate::stream::{LifecycleEvent, Records};
}
