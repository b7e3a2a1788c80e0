// crates/story-spoiler-config/src/lib.rs
// ============================================================================
// Module: Story Spoiler Config Library
// Description: Harness configuration model, overrides and validation.
// Purpose: Keep endpoints and secrets out of the harness core.
// Dependencies: serde, story-spoiler-core, toml, url
// ============================================================================

//! ## Overview
//! `story-spoiler-config` loads the harness configuration from an optional
//! TOML file, applies `STORY_SPOILER_*` environment overrides and validates the
//! result fail-closed. The validated config converts into the
//! [`story_spoiler_core::HarnessSettings`] consumed by the harness.
//!
//! Security posture: tokens and passwords are never rendered by `Debug`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
mod env;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use config::*;
pub use env::HarnessEnv;
pub use env::read_env_nonempty;
