// crates/story-spoiler-core/src/context.rs
// ============================================================================
// Module: Scenario Context
// Description: Run-scoped state shared between ordered scenario steps.
// Purpose: Carry the id of the last created story into later steps.
// Dependencies: none
// ============================================================================

//! ## Overview
//! [`ScenarioContext`] is owned by a single sequence run and borrowed mutably
//! by the driver. The create step writes the server-assigned id; edit and
//! delete steps read it.
//!
//! ## Invariants
//! - The id is never cleared. After a successful delete it is stale, and the
//!   later not-found/bad-request steps target it on purpose.

/// Mutable state threaded through one scenario run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioContext {
    /// Id returned by the most recent successful create step.
    last_created_id: Option<String>,
}

impl ScenarioContext {
    /// Creates an empty context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_created_id: None,
        }
    }

    /// Returns the id of the most recently created story, if any.
    #[must_use]
    pub fn last_created_id(&self) -> Option<&str> {
        self.last_created_id.as_deref()
    }

    /// Records the id assigned by a successful create.
    pub fn record_created(&mut self, story_id: impl Into<String>) {
        self.last_created_id = Some(story_id.into());
    }

    /// Consumes the context and returns the last created id.
    #[must_use]
    pub fn into_last_created_id(self) -> Option<String> {
        self.last_created_id
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
