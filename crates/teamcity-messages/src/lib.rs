// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! teamcity-messages: TeamCity service message encoding
//!
//! This library crate turns a message name and ordered attributes into one
//! escaped `##teamcity[...]` line, and provides a writer that emits those
//! lines to any [`std::io::Write`] sink.
//!
//! # Example
//!
//! ```
//! use teamcity_messages::{Message, ServiceMessages};
//!
//! let line = Message::new("testIgnored")
//!     .attr("name", "pkg.test_it")
//!     .attr("message", "needs [network]")
//!     .encode()
//!     .unwrap();
//! assert_eq!(line, "##teamcity[testIgnored name='pkg.test_it' message='needs |[network|]']");
//!
//! let mut messages = ServiceMessages::new(std::io::stdout());
//! messages.test_started("pkg.test_it").unwrap();
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod message;
pub mod writer;

pub use error::MessagesError;
pub use message::{Message, encode, escape, format_duration, format_duration_secs};
pub use writer::{Clock, ServiceMessages, format_timestamp};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::MessagesError;
    pub use crate::message::{Message, escape};
    pub use crate::writer::ServiceMessages;
}
