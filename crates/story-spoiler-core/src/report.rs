// crates/story-spoiler-core/src/report.rs
// ============================================================================
// Module: Run Report
// Description: Per-step outcomes and summary artifacts for a scenario run.
// Purpose: Report every step independently and persist a deterministic summary.
// Dependencies: serde, serde_jcs
// ============================================================================

//! ## Overview
//! A [`RunReport`] holds one [`StepReport`] per executed step, in execution
//! order, plus the final value of the scenario context. Summaries are written
//! as canonical JSON (JCS) and Markdown so runs can be diffed and read.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::client::HttpMethod;
use crate::scenario::StepFailure;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// File name of the canonical JSON summary.
pub const SUMMARY_JSON_FILE: &str = "summary.json";
/// File name of the Markdown summary.
pub const SUMMARY_MARKDOWN_FILE: &str = "summary.md";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome of a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Every check passed.
    Passed,
    /// The first failing check.
    Failed(StepFailure),
}

impl StepOutcome {
    /// Returns true when the step passed.
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Returns the failure when the step failed.
    #[must_use]
    pub const fn failure(&self) -> Option<&StepFailure> {
        match self {
            Self::Passed => None,
            Self::Failed(failure) => Some(failure),
        }
    }
}

/// Record of one executed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Declared sequence number.
    pub order: u32,
    /// Step name.
    pub name: &'static str,
    /// HTTP verb sent.
    pub method: HttpMethod,
    /// Request path sent.
    pub path: String,
    /// HTTP status received, absent on transport failure.
    pub status: Option<u16>,
    /// Step outcome.
    pub outcome: StepOutcome,
    /// Wall-clock duration of the step.
    pub duration: Duration,
}

/// Ordered record of a complete scenario run.
///
/// # Invariants
/// - `steps` is in execution order and holds every step exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Step reports in execution order.
    steps: Vec<StepReport>,
    /// Final value of the context slot.
    last_created_id: Option<String>,
}

/// Serializable run summary.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// `pass` when every step passed, otherwise `fail`.
    pub status: &'static str,
    /// Number of executed steps.
    pub total: usize,
    /// Number of passed steps.
    pub passed: usize,
    /// Number of failed steps.
    pub failed: usize,
    /// Final value of the context slot.
    pub last_created_id: Option<String>,
    /// Step summaries in execution order.
    pub steps: Vec<StepSummary>,
}

/// Serializable step summary.
#[derive(Debug, Clone, Serialize)]
pub struct StepSummary {
    /// Declared sequence number.
    pub order: u32,
    /// Step name.
    pub name: &'static str,
    /// HTTP verb sent.
    pub method: HttpMethod,
    /// Request path sent.
    pub path: String,
    /// HTTP status received.
    pub status: Option<u16>,
    /// `pass` or `fail`.
    pub result: &'static str,
    /// Failure category (`transport`, `decode`, `assertion`).
    pub failure_kind: Option<&'static str>,
    /// Failure message.
    pub failure: Option<String>,
    /// Step duration in milliseconds.
    pub duration_ms: u64,
}

// ============================================================================
// SECTION: Report API
// ============================================================================

impl RunReport {
    /// Builds a report from executed steps and the final context id.
    #[must_use]
    pub const fn new(steps: Vec<StepReport>, last_created_id: Option<String>) -> Self {
        Self {
            steps,
            last_created_id,
        }
    }

    /// Returns the step reports in execution order.
    #[must_use]
    pub fn steps(&self) -> &[StepReport] {
        &self.steps
    }

    /// Returns the final value of the context slot.
    #[must_use]
    pub fn last_created_id(&self) -> Option<&str> {
        self.last_created_id.as_deref()
    }

    /// Returns the report of the named step.
    #[must_use]
    pub fn step(&self, name: &str) -> Option<&StepReport> {
        self.steps.iter().find(|step| step.name == name)
    }

    /// Returns true when every step passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.steps.iter().all(|step| step.outcome.is_passed())
    }

    /// Returns the number of passed steps.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.steps.iter().filter(|step| step.outcome.is_passed()).count()
    }

    /// Returns the number of failed steps.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.steps.len() - self.passed_count()
    }

    /// Iterates over failed steps.
    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|step| !step.outcome.is_passed())
    }

    /// Builds the serializable summary.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let passed = self.passed_count();
        RunSummary {
            status: if self.passed() { "pass" } else { "fail" },
            total: self.steps.len(),
            passed,
            failed: self.steps.len() - passed,
            last_created_id: self.last_created_id.clone(),
            steps: self.steps.iter().map(StepSummary::from_report).collect(),
        }
    }

    /// Renders the Markdown summary.
    #[must_use]
    pub fn summary_markdown(&self) -> String {
        let summary = self.summary();
        let mut out = String::new();
        out.push_str("# Story Spoiler Run Summary\n\n");
        out.push_str("## Status\n\n");
        let _ = writeln!(out, "- Status: {}", summary.status);
        let _ = writeln!(out, "- Passed: {}/{}", summary.passed, summary.total);
        let _ = writeln!(
            out,
            "- Last created story: {}",
            summary.last_created_id.as_deref().unwrap_or("none")
        );
        out.push_str("\n## Steps\n\n");
        for step in &summary.steps {
            let status = step.status.map_or_else(|| "-".to_string(), |status| status.to_string());
            let _ = writeln!(
                out,
                "- {}. {} `{} {}` -> {} [{}]",
                step.order,
                step.name,
                step.method.as_str(),
                step.path,
                status,
                step.result
            );
            if let Some(failure) = &step.failure {
                let _ = writeln!(out, "  - {failure}");
            }
        }
        out
    }

    /// Writes `summary.json` (JCS) and `summary.md` into `dir`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory or files cannot be written.
    pub fn write_artifacts(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        let json_path = dir.join(SUMMARY_JSON_FILE);
        let bytes = serde_jcs::to_vec(&self.summary()).map_err(io::Error::other)?;
        fs::write(&json_path, bytes)?;
        let markdown_path = dir.join(SUMMARY_MARKDOWN_FILE);
        fs::write(&markdown_path, self.summary_markdown().as_bytes())?;
        Ok(vec![json_path, markdown_path])
    }
}

impl StepSummary {
    /// Builds a summary entry from a step report.
    fn from_report(report: &StepReport) -> Self {
        let failure = report.outcome.failure();
        Self {
            order: report.order,
            name: report.name,
            method: report.method,
            path: report.path.clone(),
            status: report.status,
            result: if failure.is_none() { "pass" } else { "fail" },
            failure_kind: failure.map(StepFailure::kind),
            failure: failure.map(ToString::to_string),
            duration_ms: u64::try_from(report.duration.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
