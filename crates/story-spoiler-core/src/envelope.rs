// crates/story-spoiler-core/src/envelope.rs
// ============================================================================
// Module: Response Decoder
// Description: Story payloads and `{msg, storyId}` response envelopes.
// Purpose: Decode Story API bodies into typed values, tolerating absent fields.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Outbound bodies are [`StoryPayload`] values; inbound bodies are
//! [`ResponseEnvelope`] values (or arrays of them for the list endpoint).
//! Absent and unknown fields are tolerated, but an empty or malformed body is
//! a [`DecodeError`]: a step that asserts decoded fields must fail when the
//! server answers without a structured body.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of characters kept in body previews.
pub const MAX_BODY_PREVIEW_CHARS: usize = 256;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Story body used to create or edit a story spoiler.
///
/// # Invariants
/// - `url` is always serialized; `title` and `description` are omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StoryPayload {
    /// Story title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Story description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Story URL (may be blank).
    pub url: String,
}

impl StoryPayload {
    /// Builds a payload with every field populated.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            url: url.into(),
        }
    }

    /// Builds a payload carrying only a URL.
    #[must_use]
    pub fn url_only(url: impl Into<String>) -> Self {
        Self {
            title: None,
            description: None,
            url: url.into(),
        }
    }
}

/// Response envelope returned by single-story operations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Human-readable status message (compared verbatim).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Server-assigned story id, present on successful creation.
    #[serde(rename = "storyId", default, skip_serializing_if = "Option::is_none")]
    pub story_id: Option<String>,
}

impl ResponseEnvelope {
    /// Builds an envelope carrying only a message.
    #[must_use]
    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            msg: Some(msg.into()),
            story_id: None,
        }
    }

    /// Builds an envelope carrying a message and a story id.
    #[must_use]
    pub fn created(msg: impl Into<String>, story_id: impl Into<String>) -> Self {
        Self {
            msg: Some(msg.into()),
            story_id: Some(story_id.into()),
        }
    }
}

/// Body decoding failures.
///
/// # Invariants
/// - `preview` is bounded by [`MAX_BODY_PREVIEW_CHARS`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The body was empty or whitespace.
    #[error("response body is empty")]
    Empty,
    /// The body did not parse as the expected shape.
    #[error("response body is not a valid {shape}: {reason} (body: {preview})")]
    Invalid {
        /// Expected shape label.
        shape: &'static str,
        /// Parser error text.
        reason: String,
        /// Bounded body preview.
        preview: String,
    },
}

// ============================================================================
// SECTION: Decoding
// ============================================================================

/// Decodes a single response envelope.
///
/// # Errors
///
/// Returns [`DecodeError`] when the body is empty or not a JSON object.
pub fn decode(body: &[u8]) -> Result<ResponseEnvelope, DecodeError> {
    decode_shape(body, "envelope")
}

/// Decodes a list of response envelopes; an empty array is valid.
///
/// # Errors
///
/// Returns [`DecodeError`] when the body is empty or not a JSON array of objects.
pub fn decode_many(body: &[u8]) -> Result<Vec<ResponseEnvelope>, DecodeError> {
    decode_shape(body, "envelope list")
}

/// Decodes a body into the requested shape.
fn decode_shape<T: DeserializeOwned>(body: &[u8], shape: &'static str) -> Result<T, DecodeError> {
    if body.trim_ascii().is_empty() {
        return Err(DecodeError::Empty);
    }
    serde_json::from_slice(body).map_err(|err| DecodeError::Invalid {
        shape,
        reason: err.to_string(),
        preview: body_preview(body),
    })
}

/// Returns a bounded, lossy UTF-8 preview of a body for diagnostics.
#[must_use]
pub fn body_preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_BODY_PREVIEW_CHARS {
        return trimmed.to_string();
    }
    let mut preview: String = trimmed.chars().take(MAX_BODY_PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}

// ============================================================================
// SECTION: Tests
// ============================================================================
