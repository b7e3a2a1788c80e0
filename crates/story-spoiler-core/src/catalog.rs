// crates/story-spoiler-core/src/catalog.rs
// ============================================================================
// Module: Story Spoiler Catalog
// Description: The ordered story spoiler step list.
// Purpose: Declare the create/edit/list/delete scenario and its failure paths.
// Dependencies: story-spoiler-core
// ============================================================================

//! ## Overview
//! Seven steps exercise the Story API end to end. Steps 1 to 4 walk the happy
//! path; steps 5 to 7 probe the failure contracts, reusing the id deleted in
//! step 4 on purpose.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::api::CREATE_PATH;
use crate::api::LIST_PATH;
use crate::api::MSG_CREATED;
use crate::api::MSG_DELETE_FAILED;
use crate::api::MSG_DELETED;
use crate::api::MSG_EDIT_NOT_FOUND;
use crate::api::MSG_EDITED;
use crate::api::delete_path;
use crate::api::edit_path;
use crate::client::ApiRequest;
use crate::client::HttpMethod;
use crate::context::ScenarioContext;
use crate::envelope::StoryPayload;
use crate::scenario::BodyContract;
use crate::scenario::ScenarioSequence;
use crate::scenario::ScenarioStep;
use crate::scenario::SequenceError;

// ============================================================================
// SECTION: Payload Literals
// ============================================================================

/// Title sent by the create step.
pub const CREATE_TITLE: &str = "New Story Spoiler Created";
/// Description sent by the create step.
pub const CREATE_DESCRIPTION: &str = "Testing a new story spoiler creation.";
/// Title sent by the edit step.
pub const EDIT_TITLE: &str = "Edit the last created story spoiler";
/// Description sent by the edit step.
pub const EDIT_DESCRIPTION: &str = "Testing editing the last created story spoiler by ID.";
/// Title sent by the stale edit step.
pub const STALE_EDIT_TITLE: &str = "Edit a non-existing story spoiler";
/// Description sent by the stale edit step.
pub const STALE_EDIT_DESCRIPTION: &str = "Testing editing a non-existing story spoiler by ID.";

// ============================================================================
// SECTION: Request Builders
// ============================================================================

/// Step 1: create a fully populated story.
fn create_story(_: &ScenarioContext) -> ApiRequest {
    let payload = StoryPayload::new(CREATE_TITLE, CREATE_DESCRIPTION, "");
    ApiRequest::with_payload(HttpMethod::Post, CREATE_PATH, &payload)
}

/// Step 2: edit the story created in step 1.
fn edit_story(context: &ScenarioContext) -> ApiRequest {
    let payload = StoryPayload::new(EDIT_TITLE, EDIT_DESCRIPTION, "");
    ApiRequest::with_payload(HttpMethod::Put, edit_path(context.last_created_id()), &payload)
}

/// Step 3: list every story.
fn list_stories(_: &ScenarioContext) -> ApiRequest {
    ApiRequest::new(HttpMethod::Get, LIST_PATH)
}

/// Steps 4 and 7: delete the last created id.
fn delete_story(context: &ScenarioContext) -> ApiRequest {
    ApiRequest::new(HttpMethod::Delete, delete_path(context.last_created_id()))
}

/// Step 5: create with only a blank `url`.
fn create_story_missing_fields(_: &ScenarioContext) -> ApiRequest {
    // Sends `{"url":""}`; title and description are omitted, not sent as null.
    // The API rejects both forms with the same 400.
    ApiRequest::with_payload(HttpMethod::Post, CREATE_PATH, &StoryPayload::url_only(""))
}

/// Step 6: edit the id deleted in step 4.
fn edit_deleted_story(context: &ScenarioContext) -> ApiRequest {
    let payload = StoryPayload::new(STALE_EDIT_TITLE, STALE_EDIT_DESCRIPTION, "");
    ApiRequest::with_payload(HttpMethod::Put, edit_path(context.last_created_id()), &payload)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Returns the story spoiler steps in declared order.
#[must_use]
pub fn story_spoiler_steps() -> Vec<ScenarioStep> {
    vec![
        ScenarioStep {
            order: 1,
            name: "create_story",
            request: create_story,
            expected_status: 201,
            contract: BodyContract::Created {
                message: MSG_CREATED,
            },
        },
        ScenarioStep {
            order: 2,
            name: "edit_story",
            request: edit_story,
            expected_status: 200,
            contract: BodyContract::Message(MSG_EDITED),
        },
        ScenarioStep {
            order: 3,
            name: "list_stories",
            request: list_stories,
            expected_status: 200,
            contract: BodyContract::NonEmptyList,
        },
        ScenarioStep {
            order: 4,
            name: "delete_story",
            request: delete_story,
            expected_status: 200,
            contract: BodyContract::Message(MSG_DELETED),
        },
        ScenarioStep {
            order: 5,
            name: "create_story_missing_fields",
            request: create_story_missing_fields,
            expected_status: 400,
            contract: BodyContract::StatusOnly,
        },
        ScenarioStep {
            order: 6,
            name: "edit_deleted_story",
            request: edit_deleted_story,
            expected_status: 404,
            contract: BodyContract::Message(MSG_EDIT_NOT_FOUND),
        },
        ScenarioStep {
            order: 7,
            name: "delete_deleted_story",
            request: delete_story,
            expected_status: 400,
            contract: BodyContract::Message(MSG_DELETE_FAILED),
        },
    ]
}

/// Returns the validated story spoiler sequence.
///
/// # Errors
///
/// Returns [`SequenceError`] if the step list is ambiguous.
pub fn story_spoiler_sequence() -> Result<ScenarioSequence, SequenceError> {
    ScenarioSequence::new(story_spoiler_steps())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
