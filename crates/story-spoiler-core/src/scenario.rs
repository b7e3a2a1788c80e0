// crates/story-spoiler-core/src/scenario.rs
// ============================================================================
// Module: Scenario Sequence
// Description: Ordered step descriptors and the single driver loop.
// Purpose: Execute dependent steps in declared order and verify each contract.
// Dependencies: thiserror, tracing
// ============================================================================

//! ## Overview
//! A scenario is an explicit list of [`ScenarioStep`] descriptors. Each
//! descriptor names its sequence number, a request builder that reads the
//! [`ScenarioContext`], the expected status code and a [`BodyContract`].
//! [`ScenarioSequence`] sorts the list once, rejects ambiguous orderings and
//! runs the steps one after another against an [`ApiTransport`].
//!
//! ## Invariants
//! - Steps run strictly in ascending `order`, each exactly once.
//! - A failing step never short-circuits the run; later steps depend on the
//!   context, not on earlier pass/fail results.
//! - Per step, the first failing check is reported: transport, then status,
//!   then body decoding, then field assertions.
//! - The context is written only by a passing [`BodyContract::Created`] step.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;
use std::time::Instant;

use thiserror::Error;
use tracing::Instrument;
use tracing::info;
use tracing::info_span;
use tracing::warn;

use crate::client::ApiRequest;
use crate::client::ApiTransport;
use crate::client::RawResponse;
use crate::client::TransportError;
use crate::context::ScenarioContext;
use crate::envelope::DecodeError;
use crate::envelope::ResponseEnvelope;
use crate::envelope::decode;
use crate::envelope::decode_many;
use crate::report::RunReport;
use crate::report::StepOutcome;
use crate::report::StepReport;

// ============================================================================
// SECTION: Step Descriptors
// ============================================================================

/// Builds the request for a step from the current context.
pub type RequestBuilder = fn(&ScenarioContext) -> ApiRequest;

/// Expected shape of a step's response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyContract {
    /// Only the status code is asserted.
    StatusOnly,
    /// The decoded envelope `msg` must equal the text.
    Message(&'static str),
    /// `storyId` must be non-empty and `msg` must equal the text; the id is
    /// recorded in the context when both hold.
    Created {
        /// Expected `msg` text.
        message: &'static str,
    },
    /// The body must decode as a non-empty envelope list.
    NonEmptyList,
}

/// One ordered unit of a scenario.
#[derive(Clone, Copy)]
pub struct ScenarioStep {
    /// Declared sequence number (unique within a sequence).
    pub order: u32,
    /// Step name (unique within a sequence).
    pub name: &'static str,
    /// Request builder reading the context.
    pub request: RequestBuilder,
    /// Expected HTTP status code.
    pub expected_status: u16,
    /// Expected body contract.
    pub contract: BodyContract,
}

impl fmt::Debug for ScenarioStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioStep")
            .field("order", &self.order)
            .field("name", &self.name)
            .field("expected_status", &self.expected_status)
            .field("contract", &self.contract)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Why a single step failed.
///
/// # Invariants
/// - Failures are isolated to their step and never abort the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StepFailure {
    /// The request did not complete at the network level.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// The body did not decode as the contract's shape.
    #[error("decode failure: {0}")]
    Decode(#[from] DecodeError),
    /// A decoded value or the status code did not match the contract.
    #[error("assertion failed on {check}: expected {expected}, actual {actual}")]
    Assertion {
        /// Checked field (`status`, `storyId`, `msg`, `list`).
        check: &'static str,
        /// Expected value.
        expected: String,
        /// Observed value.
        actual: String,
    },
}

impl StepFailure {
    /// Returns a stable category label.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
            Self::Assertion {
                ..
            } => "assertion",
        }
    }

    /// Builds an assertion failure.
    fn assertion(
        check: &'static str,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        Self::Assertion {
            check,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// Invalid step lists.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// The step list was empty.
    #[error("scenario sequence has no steps")]
    Empty,
    /// Two steps share a sequence number.
    #[error("duplicate step order {0}")]
    DuplicateOrder(u32),
    /// Two steps share a name.
    #[error("duplicate step name {0}")]
    DuplicateName(String),
}

// ============================================================================
// SECTION: Sequence
// ============================================================================

/// Validated, ordered list of steps.
///
/// # Invariants
/// - Steps are sorted by `order`; orders and names are unique.
#[derive(Debug, Clone)]
pub struct ScenarioSequence {
    /// Steps in execution order.
    steps: Vec<ScenarioStep>,
}

impl ScenarioSequence {
    /// Validates and orders a step list.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError`] when the list is empty or orders/names repeat.
    pub fn new(mut steps: Vec<ScenarioStep>) -> Result<Self, SequenceError> {
        if steps.is_empty() {
            return Err(SequenceError::Empty);
        }
        steps.sort_by_key(|step| step.order);
        if let Some(pair) = steps.windows(2).find(|pair| pair[0].order == pair[1].order) {
            return Err(SequenceError::DuplicateOrder(pair[1].order));
        }
        let mut names = BTreeSet::new();
        for step in &steps {
            if !names.insert(step.name) {
                return Err(SequenceError::DuplicateName(step.name.to_string()));
            }
        }
        Ok(Self {
            steps,
        })
    }

    /// Returns the steps in execution order.
    #[must_use]
    pub fn steps(&self) -> &[ScenarioStep] {
        &self.steps
    }

    /// Runs every step with a fresh context.
    pub async fn run<T: ApiTransport + ?Sized>(&self, transport: &T) -> RunReport {
        let mut context = ScenarioContext::new();
        self.run_with_context(transport, &mut context).await
    }

    /// Runs every step against a caller-owned context.
    pub async fn run_with_context<T: ApiTransport + ?Sized>(
        &self,
        transport: &T,
        context: &mut ScenarioContext,
    ) -> RunReport {
        let mut reports = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            let span = info_span!("scenario_step", order = step.order, name = step.name);
            let report = execute_step(step, transport, context).instrument(span).await;
            reports.push(report);
        }
        RunReport::new(reports, context.last_created_id().map(ToString::to_string))
    }
}

// ============================================================================
// SECTION: Driver
// ============================================================================

/// Executes and verifies one step.
async fn execute_step<T: ApiTransport + ?Sized>(
    step: &ScenarioStep,
    transport: &T,
    context: &mut ScenarioContext,
) -> StepReport {
    let started = Instant::now();
    let request = (step.request)(context);
    info!(method = request.method.as_str(), path = %request.path, "step started");
    let (status, result) = match transport.execute(&request).await {
        Ok(response) => (Some(response.status), verify_response(step, &response, context)),
        Err(err) => (None, Err(StepFailure::Transport(err))),
    };
    let outcome = match result {
        Ok(()) => {
            info!(status, "step passed");
            StepOutcome::Passed
        }
        Err(failure) => {
            warn!(status, kind = failure.kind(), failure = %failure, "step failed");
            StepOutcome::Failed(failure)
        }
    };
    StepReport {
        order: step.order,
        name: step.name,
        method: request.method,
        path: request.path,
        status,
        outcome,
        duration: started.elapsed(),
    }
}

/// Checks a response against the step's status and body contract.
///
/// # Errors
///
/// Returns the first failing check as a [`StepFailure`].
pub fn verify_response(
    step: &ScenarioStep,
    response: &RawResponse,
    context: &mut ScenarioContext,
) -> Result<(), StepFailure> {
    if response.status != step.expected_status {
        return Err(StepFailure::assertion("status", step.expected_status, response.status));
    }
    match step.contract {
        BodyContract::StatusOnly => Ok(()),
        BodyContract::Message(expected) => expect_message(expected, &decode(&response.body)?),
        BodyContract::Created {
            message,
        } => {
            let envelope = decode(&response.body)?;
            let story_id = match envelope.story_id.as_deref() {
                Some(id) if !id.is_empty() => id,
                other => {
                    return Err(StepFailure::assertion(
                        "storyId",
                        "a non-empty story id",
                        describe(other),
                    ));
                }
            };
            expect_message(message, &envelope)?;
            context.record_created(story_id);
            Ok(())
        }
        BodyContract::NonEmptyList => {
            if decode_many(&response.body)?.is_empty() {
                return Err(StepFailure::assertion("list", "at least one story", "an empty list"));
            }
            Ok(())
        }
    }
}

/// Compares the envelope message with the expected literal.
fn expect_message(expected: &str, envelope: &ResponseEnvelope) -> Result<(), StepFailure> {
    if envelope.msg.as_deref() == Some(expected) {
        return Ok(());
    }
    Err(StepFailure::assertion("msg", format!("\"{expected}\""), describe(envelope.msg.as_deref())))
}

/// Renders an optional decoded field for diagnostics.
fn describe(value: Option<&str>) -> String {
    value.map_or_else(|| "<absent>".to_string(), |value| format!("\"{value}\""))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
