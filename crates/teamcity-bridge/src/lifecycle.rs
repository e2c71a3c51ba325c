// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test lifecycle bridge
//!
//! [`LifecycleBridge`] consumes test runner events in the order the runner
//! delivers them and writes the matching service messages. Every test it
//! reports gets exactly one `testStarted`, at most one `testFailed` or
//! `testIgnored`, and exactly one `testFinished`.
//!
//! Failures that happen outside a test's own start/finish window are
//! reported as separate synthetic tests:
//!
//! - a failing teardown becomes `<id>_teardown`
//! - a failing collection becomes `<id>_collect`

use std::collections::HashMap;
use std::io::Write;

use teamcity_messages::ServiceMessages;
use tracing::{debug, warn};

use crate::error::BridgeError;
use crate::node_id::{COLLECT_SUFFIX, TEARDOWN_SUFFIX, TestId};
use crate::report::{CollectReport, Outcome, Phase, TestReport};
use crate::stream::LifecycleEvent;

/// Per-test record kept between `testStarted` and `testFinished`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestRunState {
    /// Whether `testStarted` has been written
    pub started: bool,
    /// Last non-terminal phase outcome seen for the test
    pub phase_outcome: Option<(Phase, Outcome)>,
}

/// Bridge from test lifecycle events to service messages
pub struct LifecycleBridge<W: Write> {
    messages: ServiceMessages<W>,
    open: HashMap<TestId, TestRunState>,
    current_suite: Option<String>,
}

impl<W: Write> LifecycleBridge<W> {
    /// Create a bridge writing through `messages`
    pub fn new(messages: ServiceMessages<W>) -> Self {
        Self {
            messages,
            open: HashMap::new(),
            current_suite: None,
        }
    }

    /// Dispatch a decoded event to the matching handler
    ///
    /// # Errors
    ///
    /// Propagates the error of the handler.
    pub fn handle(&mut self, event: &LifecycleEvent) -> Result<(), BridgeError> {
        match event {
            LifecycleEvent::LogStart { nodeid } => self.log_start(nodeid),
            LifecycleEvent::Report(report) => self.log_report(report),
            LifecycleEvent::CollectReport(report) => self.collect_report(report),
            LifecycleEvent::SuiteStart { name } => self.suite_started(name),
            LifecycleEvent::SessionFinish => self.session_finish(),
        }
    }

    /// A test is about to run
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::InvalidIdentifier` for an empty node id, or a
    /// write error.
    pub fn log_start(&mut self, nodeid: &str) -> Result<(), BridgeError> {
        let id = TestId::normalize(nodeid)?;
        self.messages.test_started(id.as_str())?;

        let state = self.open.entry(id).or_default();
        if state.started {
            debug!(nodeid, "Test started again before finishing");
        }
        *state = TestRunState {
            started: true,
            phase_outcome: None,
        };
        Ok(())
    }

    /// One phase of a test has a result
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::InvalidIdentifier` for an empty node id,
    /// `BridgeError::MalformedInput` for an invalid duration, or a write
    /// error. Nothing is written when the report itself is invalid.
    pub fn log_report(&mut self, report: &TestReport) -> Result<(), BridgeError> {
        let id = TestId::normalize(&report.nodeid)?;

        match (report.outcome, report.when) {
            (Outcome::Passed, Phase::Call) => {
                let elapsed = report.elapsed()?;
                self.messages.test_finished(id.as_str(), Some(elapsed))?;
                self.close(&id);
            }
            (Outcome::Passed, phase) => {
                self.record(&id, phase, Outcome::Passed);
            }
            (Outcome::Failed, Phase::Setup | Phase::Call) => {
                let elapsed = report.elapsed()?;
                self.messages.test_failed(
                    id.as_str(),
                    &report.short_location(),
                    &report.longrepr.to_string(),
                )?;
                self.messages.test_finished(id.as_str(), Some(elapsed))?;
                self.close(&id);
            }
            (Outcome::Failed, Phase::Teardown) => {
                // The test already finished at call; report the teardown on its own
                self.synthetic_failure(
                    &id.with_suffix(TEARDOWN_SUFFIX),
                    &report.short_location(),
                    &report.longrepr.to_string(),
                )?;
            }
            (Outcome::Skipped, _) => {
                self.messages
                    .test_ignored(id.as_str(), &report.longrepr.skip_reason())?;
                self.messages.test_finished(id.as_str(), None)?;
                self.close(&id);
            }
        }
        Ok(())
    }

    /// A node finished collecting
    ///
    /// Only failed collections produce output.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::InvalidIdentifier` for an empty node id, or a
    /// write error.
    pub fn collect_report(&mut self, report: &CollectReport) -> Result<(), BridgeError> {
        if report.outcome != Outcome::Failed {
            return Ok(());
        }

        let id = TestId::normalize(&report.nodeid)?.with_suffix(COLLECT_SUFFIX);
        self.synthetic_failure(
            &id,
            &report.short_location(),
            &report.longrepr.to_string(),
        )
    }

    /// A test suite begins; any suite still open is finished first
    ///
    /// # Errors
    ///
    /// Returns a write error.
    pub fn suite_started(&mut self, name: &str) -> Result<(), BridgeError> {
        if let Some(previous) = self.current_suite.take() {
            self.messages.test_suite_finished(&previous)?;
        }
        self.messages.test_suite_started(name)?;
        self.current_suite = Some(name.to_string());
        Ok(())
    }

    /// The test session is over
    ///
    /// Closes the current suite, if any. Tests that were started but never
    /// finished are logged and forgotten.
    ///
    /// # Errors
    ///
    /// Returns a write error.
    pub fn session_finish(&mut self) -> Result<(), BridgeError> {
        for (id, state) in self.open.drain() {
            warn!(test = %id, phase_outcome = ?state.phase_outcome, "Test never finished");
        }

        if let Some(suite) = self.current_suite.take() {
            self.messages.test_suite_finished(&suite)?;
        }
        Ok(())
    }

    /// Name of the open suite, if any
    #[must_use]
    pub fn current_suite(&self) -> Option<&str> {
        self.current_suite.as_deref()
    }

    /// State of a test that is started but not finished
    #[must_use]
    pub fn open_test(&self, id: &TestId) -> Option<&TestRunState> {
        self.open.get(id)
    }

    /// Number of tests started but not finished
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Borrow the message writer
    pub fn messages(&self) -> &ServiceMessages<W> {
        &self.messages
    }

    /// Consume the bridge and return the underlying sink
    pub fn into_inner(self) -> W {
        self.messages.into_inner()
    }

    fn synthetic_failure(
        &mut self,
        id: &TestId,
        message: &str,
        details: &str,
    ) -> Result<(), BridgeError> {
        self.messages.test_started(id.as_str())?;
        self.messages.test_failed(id.as_str(), message, details)?;
        self.messages.test_finished(id.as_str(), None)?;
        Ok(())
    }

    fn record(&mut self, id: &TestId, phase: Phase, outcome: Outcome) {
        if let Some(state) = self.open.get_mut(id) {
            state.phase_outcome = Some((phase, outcome));
        }
    }

    fn close(&mut self, id: &TestId) {
        if self.open.remove(id).is_none() {
            debug!(test = %id, "Finished a test that was not open");
        }
    }
}
