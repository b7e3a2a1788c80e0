// crates/story-spoiler-core/src/api.rs
// ============================================================================
// Module: Story API Contract
// Description: Endpoint paths and literal response messages of the Story API.
// Purpose: Keep the remote contract in one place for steps and test doubles.
// Dependencies: none
// ============================================================================

//! ## Overview
//! The remote Story Spoiler API exposes one authentication endpoint and four
//! story endpoints. Response message texts are part of the contract and are
//! compared verbatim.

// ============================================================================
// SECTION: Endpoint Paths
// ============================================================================

/// Login endpoint returning `{ "accessToken": ... }`.
pub const AUTHENTICATION_PATH: &str = "/api/User/Authentication";
/// Story creation endpoint.
pub const CREATE_PATH: &str = "/api/Story/Create";
/// Story listing endpoint.
pub const LIST_PATH: &str = "/api/Story/All";
/// Prefix for story edit requests; the story id is appended.
pub const EDIT_PATH_PREFIX: &str = "/api/Story/Edit/";
/// Prefix for story delete requests; the story id is appended.
pub const DELETE_PATH_PREFIX: &str = "/api/Story/Delete/";

// ============================================================================
// SECTION: Contract Messages
// ============================================================================

/// `msg` returned by a successful create.
pub const MSG_CREATED: &str = "Successfully created!";
/// `msg` returned by a successful edit.
pub const MSG_EDITED: &str = "Successfully edited";
/// `msg` returned by a successful delete.
pub const MSG_DELETED: &str = "Deleted successfully!";
/// `msg` returned when editing an id with no backing story.
pub const MSG_EDIT_NOT_FOUND: &str = "No spoilers...";
/// `msg` returned when deleting an id with no backing story.
pub const MSG_DELETE_FAILED: &str = "Unable to delete this story spoiler!";

// ============================================================================
// SECTION: Path Builders
// ============================================================================

/// Returns the edit path for a story id.
///
/// An absent id renders as an empty path segment; the request is still sent so
/// the step reports the server's answer.
#[must_use]
pub fn edit_path(story_id: Option<&str>) -> String {
    format!("{EDIT_PATH_PREFIX}{}", story_id.unwrap_or_default())
}

/// Returns the delete path for a story id.
#[must_use]
pub fn delete_path(story_id: Option<&str>) -> String {
    format!("{DELETE_PATH_PREFIX}{}", story_id.unwrap_or_default())
}
