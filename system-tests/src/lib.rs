// system-tests/src/lib.rs
// ============================================================================
// Module: Story Spoiler System Tests Library
// Description: Shared configuration for system test scenarios.
// Purpose: Provide common settings for the story spoiler system-test binaries.
// Dependencies: story-spoiler-config
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the story spoiler
//! system-tests binaries in `system-tests/tests`. The suites drive the real
//! harness against an in-process stub of the Story API, plus an opt-in run
//! against a live deployment.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
