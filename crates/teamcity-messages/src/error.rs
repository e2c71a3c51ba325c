// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for teamcity-messages

use thiserror::Error;

/// Errors that can occur while encoding or writing service messages
#[derive(Debug, Error)]
pub enum MessagesError {
    /// A message or attribute name that the protocol cannot carry unescaped
    #[error("Invalid {kind} name: {name:?}")]
    InvalidName {
        /// What the name was used for ("message" or "attribute")
        kind: &'static str,
        /// The offending name
        name: String,
    },

    /// A duration that cannot be rendered (negative, NaN or infinite)
    #[error("Invalid duration: {seconds} seconds")]
    InvalidDuration {
        /// The raw value in seconds
        seconds: f64,
    },

    /// Error writing to the output sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
