// crates/story-spoiler-core/src/harness.rs
// ============================================================================
// Module: Harness Orchestration
// Description: One-shot setup, sequence execution and teardown.
// Purpose: Resolve a credential, run every step, release the client once.
// Dependencies: thiserror, tracing
// ============================================================================

//! ## Overview
//! [`run_story_spoiler_suite`] is the single entry point used by the CLI and
//! the system tests. Credential resolution is the only fatal phase: once a
//! client exists, every step runs and the report carries per-step outcomes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;
use tracing::Instrument;
use tracing::info;
use tracing::info_span;

use crate::catalog::story_spoiler_sequence;
use crate::client::AuthenticatedClient;
use crate::client::TransportError;
use crate::credential::AuthError;
use crate::credential::CredentialResolver;
use crate::credential::CredentialSource;
use crate::report::RunReport;
use crate::scenario::ScenarioSequence;
use crate::scenario::SequenceError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Inputs for a harness run.
#[derive(Debug, Clone)]
pub struct HarnessSettings {
    /// Story API base URL.
    pub base_url: String,
    /// Where the bearer credential comes from.
    pub credential_source: CredentialSource,
    /// Optional per-request timeout; transport defaults apply when absent.
    pub timeout: Option<Duration>,
}

/// Failures that abort a run before any step executes.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Credential resolution failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// The authenticated client could not be built.
    #[error("client setup failed: {0}")]
    Client(#[from] TransportError),
    /// The step list is invalid.
    #[error("invalid scenario: {0}")]
    Sequence(#[from] SequenceError),
}

// ============================================================================
// SECTION: Entry Points
// ============================================================================

/// Runs the story spoiler sequence against the configured API.
///
/// # Errors
///
/// Returns [`HarnessError`] when setup fails. Step failures are reported in
/// the returned [`RunReport`].
pub async fn run_story_spoiler_suite(
    settings: &HarnessSettings,
) -> Result<RunReport, HarnessError> {
    let sequence = story_spoiler_sequence()?;
    run_sequence(settings, &sequence).await
}

/// Runs an arbitrary sequence with one resolved credential and one client.
///
/// # Errors
///
/// Returns [`HarnessError`] when the credential or client cannot be set up.
pub async fn run_sequence(
    settings: &HarnessSettings,
    sequence: &ScenarioSequence,
) -> Result<RunReport, HarnessError> {
    let span = info_span!("story_spoiler_run", base_url = %settings.base_url);
    async {
        let resolver = CredentialResolver::new(&settings.base_url, settings.timeout)?;
        let credential = resolver.resolve(&settings.credential_source).await?;
        let client = AuthenticatedClient::new(&settings.base_url, &credential, settings.timeout)?;
        let report = sequence.run(&client).await;
        client.close();
        info!(
            passed = report.passed_count(),
            failed = report.failed_count(),
            "story spoiler run finished"
        );
        Ok(report)
    }
    .instrument(span)
    .await
}

// ============================================================================
// SECTION: Tests
// ============================================================================
