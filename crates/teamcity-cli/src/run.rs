// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Reporting runs
//!
//! This module wires the configured input and output streams to the
//! lifecycle bridge or the lint formatter.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use teamcity_cli::run::report_tests;
//! use teamcity_messages::ServiceMessages;
//!
//! let input = Cursor::new("{\"event\":\"logstart\",\"nodeid\":\"a.py::t\"}\n");
//! let stats = report_tests(input, ServiceMessages::new(Vec::new())).expect("report");
//! assert_eq!(stats.records, 1);
//! assert_eq!(stats.unfinished, 1);
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use teamcity_bridge::BridgeError;
use teamcity_bridge::diagnostic::{Diagnostic, LintReport};
use teamcity_bridge::lifecycle::LifecycleBridge;
use teamcity_bridge::stream::{LifecycleEvent, Records};
use teamcity_messages::ServiceMessages;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{Command, Config};

/// Errors from a reporting run
#[derive(Debug, Error)]
pub enum RunError {
    /// Error bridging a record to service messages
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// Input file could not be opened
    #[error("Cannot open input {path}: {source}")]
    OpenInput {
        /// Path of the input file
        path: PathBuf,
        /// The underlying IO error
        source: io::Error,
    },

    /// Output file could not be created
    #[error("Cannot create output {path}: {source}")]
    CreateOutput {
        /// Path of the output file
        path: PathBuf,
        /// The underlying IO error
        source: io::Error,
    },

    /// Error reading input while reporting is disabled
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Statistics from a reporting run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Records decoded from the input
    pub records: usize,
    /// Tests still open when the input ended
    pub unfinished: usize,
    /// Diagnostics reported as failures
    pub diagnostics: usize,
}

/// Feed test lifecycle events through the bridge
///
/// Tests still open when the input ends are counted in
/// [`RunStats::unfinished`]; the input is expected to end with a
/// `sessionfinish` event.
///
/// # Errors
///
/// Returns the first decode, bridge or write error. Lines already written
/// stay written.
pub fn report_tests<R: BufRead, W: Write>(
    reader: R,
    messages: ServiceMessages<W>,
) -> Result<RunStats, RunError> {
    let mut bridge = LifecycleBridge::new(messages);
    let mut stats = RunStats::default();
    let mut finished = false;

    for event in Records::<_, LifecycleEvent>::new(reader) {
        let event = event?;
        finished = matches!(event, LifecycleEvent::SessionFinish);
        bridge.handle(&event)?;
        stats.records += 1;
    }

    stats.unfinished = bridge.open_count();
    if !finished {
        warn!(
            records = stats.records,
            unfinished = stats.unfinished,
            "Input ended without sessionfinish"
        );
    }
    Ok(stats)
}

/// Report each lint diagnostic as a failed test
///
/// # Errors
///
/// Returns the first decode, validation or write error.
pub fn report_lint<R: BufRead, W: Write>(
    reader: R,
    messages: ServiceMessages<W>,
) -> Result<RunStats, RunError> {
    let mut report = LintReport::start(messages)?;
    let mut stats = RunStats::default();

    for diagnostic in Records::<_, Diagnostic>::new(reader) {
        report.format(&diagnostic?)?;
        stats.records += 1;
    }

    stats.diagnostics = report.reported();
    Ok(stats)
}

/// Consume the input without reporting anything
///
/// Keeps the producer on the other end of a pipe from blocking.
///
/// # Errors
///
/// Returns a read error.
pub fn drain<R: BufRead>(mut reader: R) -> Result<u64, RunError> {
    Ok(io::copy(&mut reader, &mut io::sink())?)
}

/// Run the configured command
///
/// # Errors
///
/// Returns an error if the input or output cannot be opened, or if
/// reporting fails.
pub fn run(config: &Config) -> Result<RunStats, RunError> {
    let command = config.resolved_command();
    let reader = open_input(&command)?;

    if !config.reporting_enabled() {
        let bytes = drain(reader)?;
        info!(bytes, "TeamCity reporting disabled; input drained");
        return Ok(RunStats::default());
    }

    let messages = config.service_messages(open_output(config)?);
    let stats = match command {
        Command::Pytest { .. } => report_tests(reader, messages)?,
        Command::Flake8 { .. } => report_lint(reader, messages)?,
    };

    info!(
        records = stats.records,
        diagnostics = stats.diagnostics,
        unfinished = stats.unfinished,
        "Reporting complete"
    );
    Ok(stats)
}

fn open_input(command: &Command) -> Result<Box<dyn BufRead>, RunError> {
    match command.input() {
        Some(path) => {
            debug!(path = %path.display(), "Reading input file");
            let file = File::open(path).map_err(|source| RunError::OpenInput {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn open_output(config: &Config) -> Result<Box<dyn Write>, RunError> {
    match &config.output {
        Some(path) => {
            debug!(path = %path.display(), "Writing service messages to file");
            let file = File::create(path).map_err(|source| RunError::CreateOutput {
                path: path.clone(),
                source,
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}
