// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for teamcity-bridge

use teamcity_messages::MessagesError;
use thiserror::Error;

/// Errors that can occur while bridging events to service messages
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A node identifier that cannot be normalized
    #[error("Invalid test identifier {nodeid:?}: {reason}")]
    InvalidIdentifier {
        /// The raw node identifier
        nodeid: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// A record that is missing required fields or carries invalid values
    #[error("Malformed input: {message}")]
    MalformedInput {
        /// Description of the problem
        message: String,
    },

    /// A line of the input stream that could not be decoded
    #[error("Malformed input at line {line}: {source}")]
    InvalidLine {
        /// 1-based line number in the input stream
        line: usize,
        /// The underlying decode error
        source: serde_json::Error,
    },

    /// Error encoding or writing a service message
    #[error("Service message error: {0}")]
    Messages(#[from] MessagesError),

    /// Error reading the input stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }
}
