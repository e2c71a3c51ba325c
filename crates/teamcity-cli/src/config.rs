// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for the tc-bridge command
//!
//! This module provides the command-line surface: which input to read,
//! where to write service messages, the reporting enable flag, and logging
//! options.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use teamcity_messages::ServiceMessages;

/// Environment variable TeamCity agents export to build steps
pub const TEAMCITY_VERSION_ENV: &str = "TEAMCITY_VERSION";

/// tc-bridge - report test runs and lint results to TeamCity
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "tc-bridge")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// What to report (defaults to test lifecycle events from stdin)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output TeamCity service messages
    ///
    /// Reporting is also enabled automatically when running under a
    /// TeamCity agent (TEAMCITY_VERSION is set).
    #[arg(long, action = ArgAction::Count)]
    pub teamcity: u8,

    /// TeamCity agent version, taken from the agent environment
    #[arg(long, env = TEAMCITY_VERSION_ENV, hide = true)]
    pub teamcity_version: Option<String>,

    /// Write service messages to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Add a flowId attribute to every message
    ///
    /// Needed when several processes report into the same build log.
    #[arg(long, env = "TEAMCITY_FLOW_ID")]
    pub flow_id: Option<String>,

    /// Add a timestamp attribute to every message
    #[arg(long, default_value = "false")]
    pub timestamps: bool,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so they never mix with the service
    /// message stream.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Report test lifecycle events
    ///
    /// Reads one JSON event per line (logstart, report, collectreport,
    /// suitestart, sessionfinish).
    ///
    /// Example:
    ///   my-runner --json-events | tc-bridge --teamcity pytest
    Pytest {
        /// Read events from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Report lint diagnostics as failed tests
    ///
    /// Reads one JSON diagnostic per line (filename, line_number,
    /// column_number, code, text, physical_line).
    Flake8 {
        /// Read diagnostics from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

impl Command {
    /// Input file, if one was given
    #[must_use]
    pub fn input(&self) -> Option<&Path> {
        match self {
            Self::Pytest { input } | Self::Flake8 { input } => input.as_deref(),
        }
    }
}

impl Config {
    /// The command to run, falling back to test events from stdin
    #[must_use]
    pub fn resolved_command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Pytest { input: None })
    }

    /// Whether service messages should be written at all
    #[must_use]
    pub fn reporting_enabled(&self) -> bool {
        self.teamcity >= 1 || self.teamcity_version.is_some()
    }

    /// Build a service message writer with the configured attributes
    pub fn service_messages<W: Write>(&self, out: W) -> ServiceMessages<W> {
        let mut messages = ServiceMessages::new(out);
        if let Some(flow_id) = &self.flow_id {
            messages = messages.with_flow_id(flow_id.clone());
        }
        if self.timestamps {
            messages = messages.with_timestamps();
        }
        messages
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input path is given but doesn't exist or isn't a file
    /// - The output path's parent directory doesn't exist
    /// - The flow id is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(input) = self.command.as_ref().and_then(Command::input) {
            if !input.exists() {
                return Err(ConfigError::InputNotFound(input.to_path_buf()));
            }
            if !input.is_file() {
                return Err(ConfigError::InputNotFile(input.to_path_buf()));
            }
        }

        if let Some(output) = &self.output {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() && !parent.is_dir() {
                    return Err(ConfigError::OutputDirectoryNotFound(parent.to_path_buf()));
                }
            }
        }

        if self.flow_id.as_deref() == Some("") {
            return Err(ConfigError::EmptyFlowId);
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Input path not found
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// Input path is not a regular file
    #[error("Input path is not a file: {0}")]
    InputNotFile(PathBuf),

    /// Output directory not found
    #[error("Output directory not found: {0}")]
    OutputDirectoryNotFound(PathBuf),

    /// Flow id given but empty
    #[error("Flow id must not be empty")]
    EmptyFlowId,
}
