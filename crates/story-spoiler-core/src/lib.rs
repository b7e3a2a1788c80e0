// crates/story-spoiler-core/src/lib.rs
// ============================================================================
// Module: Story Spoiler Core Library
// Description: Ordered, stateful integration harness for the Story Spoiler API.
// Purpose: Resolve credentials, drive dependent HTTP steps, verify contracts.
// Dependencies: reqwest, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! This crate drives an ordered sequence of dependent HTTP steps against the
//! remote Story Spoiler API. A bearer credential is resolved once, every step
//! runs through a single authenticated client, and the identifier produced by
//! the create step is threaded into later steps through an explicit
//! [`ScenarioContext`].
//!
//! ## Layer Responsibilities
//! - [`credential`]: static-or-login bearer token resolution (fatal on failure).
//! - [`client`]: authenticated request execution returning status + raw body.
//! - [`envelope`]: tolerant decoding of `{msg, storyId}` envelopes.
//! - [`scenario`]: step descriptors, ordering and the single driver loop.
//! - [`catalog`]: the story spoiler step list.
//! - [`report`]: per-step outcomes and summary artifacts.
//! - [`harness`]: one-shot setup, run and teardown.
//!
//! Security posture: server responses are untrusted; bodies are size-limited
//! and credentials are never logged or printed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod api;
pub mod catalog;
pub mod client;
pub mod context;
pub mod credential;
pub mod envelope;
pub mod harness;
pub mod report;
pub mod scenario;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use catalog::story_spoiler_sequence;
pub use catalog::story_spoiler_steps;
pub use client::ApiRequest;
pub use client::ApiTransport;
pub use client::AuthenticatedClient;
pub use client::HttpMethod;
pub use client::RawResponse;
pub use client::TransportError;
pub use context::ScenarioContext;
pub use credential::AuthError;
pub use credential::Credential;
pub use credential::CredentialResolver;
pub use credential::CredentialSource;
pub use credential::LoginCredentials;
pub use envelope::DecodeError;
pub use envelope::ResponseEnvelope;
pub use envelope::StoryPayload;
pub use harness::HarnessError;
pub use harness::HarnessSettings;
pub use harness::run_story_spoiler_suite;
pub use report::RunReport;
pub use report::StepOutcome;
pub use report::StepReport;
pub use scenario::BodyContract;
pub use scenario::ScenarioSequence;
pub use scenario::ScenarioStep;
pub use scenario::SequenceError;
pub use scenario::StepFailure;
