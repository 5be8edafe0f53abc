// crates/riskscore-scenario/src/report.rs
// ============================================================================
// Module: Scenario Report
// Description: Per-step outcome record of a scenario run.
// Purpose: Summarize a run for logs and write it as canonical JSON.
// Dependencies: serde, serde_jcs
// ============================================================================

//! ## Overview
//! A [`ScenarioReport`] lists every scenario step in order with its outcome
//! and duration, followed by any cleanup actions taken after a failure. The
//! JSON form is canonical (RFC 8785) so two reports of equal runs compare
//! byte-for-byte.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::steps::StepName;

/// Outcome of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// The step's assertions held.
    Passed,
    /// The step failed.
    Failed,
    /// The step did not run because an earlier step failed.
    Skipped,
}

/// Overall run status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Every step passed.
    Passed,
    /// At least one step failed.
    Failed,
}

/// One report line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    /// Step phrase.
    pub step: String,
    /// Step outcome.
    pub outcome: StepOutcome,
    /// Wall time spent in the step.
    pub duration_ms: u64,
    /// Failure message, when the step failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepRecord {
    /// Records a passed step.
    #[must_use]
    pub fn passed(step: StepName, elapsed: Duration) -> Self {
        Self::new(step.as_str(), StepOutcome::Passed, elapsed, None)
    }

    /// Records a failed step with its error message.
    #[must_use]
    pub fn failed(step: StepName, elapsed: Duration, error: impl Into<String>) -> Self {
        Self::new(step.as_str(), StepOutcome::Failed, elapsed, Some(error.into()))
    }

    /// Records a step that never ran.
    #[must_use]
    pub fn skipped(step: StepName) -> Self {
        Self::new(step.as_str(), StepOutcome::Skipped, Duration::ZERO, None)
    }

    /// Builds a record from raw parts.
    fn new(step: &str, outcome: StepOutcome, elapsed: Duration, error: Option<String>) -> Self {
        Self {
            step: step.to_string(),
            outcome,
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            error,
        }
    }
}

/// Report of one scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    /// Overall status.
    pub status: ReportStatus,
    /// Generated ecosystem name, when one was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecosystem_name: Option<String>,
    /// Scenario steps in execution order.
    pub steps: Vec<StepRecord>,
    /// Cleanup actions run after a failure.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cleanup: Vec<StepRecord>,
}

impl ScenarioReport {
    /// Creates an empty, passing report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: ReportStatus::Passed,
            ecosystem_name: None,
            steps: Vec::new(),
            cleanup: Vec::new(),
        }
    }

    /// Appends a step record; a failed record fails the report.
    pub fn push(&mut self, record: StepRecord) {
        if record.outcome == StepOutcome::Failed {
            self.status = ReportStatus::Failed;
        }
        self.steps.push(record);
    }

    /// Appends a cleanup record. Cleanup never changes the overall status.
    pub fn push_cleanup(&mut self, record: StepRecord) {
        self.cleanup.push(record);
    }

    /// Returns true when every step passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ReportStatus::Passed
    }

    /// Counts steps with the given outcome.
    #[must_use]
    pub fn count(&self, outcome: StepOutcome) -> usize {
        self.steps.iter().filter(|record| record.outcome == outcome).count()
    }

    /// Returns the first failed step, if any.
    #[must_use]
    pub fn first_failure(&self) -> Option<&StepRecord> {
        self.steps.iter().find(|record| record.outcome == StepOutcome::Failed)
    }

    /// One-line summary suitable for CLI output.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let passed = self.count(StepOutcome::Passed);
        let total = self.steps.len();
        match self.first_failure() {
            None => format!("scenario passed: {passed}/{total} steps"),
            Some(failure) => format!(
                "scenario failed at `{}`: {passed}/{total} steps passed ({})",
                failure.step,
                failure.error.as_deref().unwrap_or("no error message")
            ),
        }
    }

    /// Serializes the report as canonical JSON.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when serialization fails.
    pub fn to_canonical_json(&self) -> io::Result<Vec<u8>> {
        serde_jcs::to_vec(self).map_err(io::Error::other)
    }

    /// Writes the canonical JSON report to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when serialization or the write fails.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        let bytes = self.to_canonical_json()?;
        fs::write(path, bytes)
    }
}

impl Default for ScenarioReport {
    fn default() -> Self {
        Self::new()
    }
}
