// system-tests/tests/suites/client.rs
// ============================================================================
// Module: Client Transport Tests
// Description: Authenticated client behavior over real HTTP.
// Purpose: Validate status passthrough, URL joining and body limits.
// Dependencies: system-tests helpers, story-spoiler-core, reqwest
// ============================================================================

//! Authenticated client system-tests against the Story API stub.

use axum::http::Method;
use helpers::artifacts::TestReporter;
use helpers::story_stub::RouteOverride;
use helpers::story_stub::StoryStubHandle;
use helpers::story_stub::StubConfig;
use helpers::story_stub::spawn_story_stub;
use helpers::story_stub::spawn_story_stub_with;
use helpers::timeouts::STUB_REQUEST_TIMEOUT;
use helpers::timeouts::resolve_timeout;
use story_spoiler_core::ApiRequest;
use story_spoiler_core::ApiTransport;
use story_spoiler_core::AuthenticatedClient;
use story_spoiler_core::Credential;
use story_spoiler_core::HttpMethod;
use story_spoiler_core::TransportError;
use story_spoiler_core::client::MAX_RESPONSE_BYTES;

use crate::helpers;

fn stub_client(
    stub: &StoryStubHandle,
    base_url: &str,
) -> Result<AuthenticatedClient, Box<dyn std::error::Error>> {
    let credential = Credential::from_static(stub.token()).ok_or("stub token is blank")?;
    let timeout = resolve_timeout(STUB_REQUEST_TIMEOUT);
    Ok(AuthenticatedClient::new(base_url, &credential, Some(timeout))?)
}

#[tokio::test(flavor = "multi_thread")]
async fn error_statuses_are_returned_as_responses() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("error_statuses_are_returned_as_responses")?;
    let stub = spawn_story_stub()?;
    let client = stub_client(&stub, stub.base_url())?;

    let response =
        client.execute(&ApiRequest::new(HttpMethod::Delete, "/api/Story/Delete/missing")).await?;
    if response.status != 400 {
        return Err(format!("expected 400, got {}", response.status).into());
    }
    if !response.body_text().contains("Unable to delete this story spoiler!") {
        return Err(format!("unexpected body: {}", response.body_text()).into());
    }
    let recorded = stub.requests();
    let bearer = format!("Bearer {}", stub.token());
    let authorization = recorded.first().and_then(|request| request.authorization.as_deref());
    if authorization != Some(bearer.as_str()) {
        return Err("client request did not carry the bearer header".into());
    }
    client.close();

    reporter.finish("pass", vec!["400 surfaced as a response".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn trailing_slash_base_url_joins_cleanly() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("trailing_slash_base_url_joins_cleanly")?;
    let stub = spawn_story_stub()?;
    let client = stub_client(&stub, &format!("{}/", stub.base_url()))?;

    let response = client.execute(&ApiRequest::new(HttpMethod::Get, "/api/Story/All")).await?;
    if response.status != 200 {
        return Err(format!("expected 200, got {}", response.status).into());
    }
    let path = stub.requests().first().map(|request| request.path.clone()).unwrap_or_default();
    if path != "/api/Story/All" {
        return Err(format!("unexpected request path: {path}").into());
    }

    reporter.finish("pass", vec!["single slash between base and path".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn oversized_response_body_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("oversized_response_body_is_rejected")?;
    let body = "x".repeat(MAX_RESPONSE_BYTES + 1);
    let config = StubConfig::default().with_override(RouteOverride::new(
        Method::GET,
        "/api/Story/All",
        200,
        &body,
    ));
    let stub = spawn_story_stub_with(config)?;
    let client = stub_client(&stub, stub.base_url())?;

    let result = client.execute(&ApiRequest::new(HttpMethod::Get, "/api/Story/All")).await;
    if !matches!(result, Err(TransportError::ResponseTooLarge { .. })) {
        return Err("expected the body limit to trip".into());
    }

    reporter.finish("pass", vec!["body limit enforced".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn story_routes_reject_requests_without_bearer() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("story_routes_reject_requests_without_bearer")?;
    let stub = spawn_story_stub()?;
    let client = reqwest::Client::builder().timeout(resolve_timeout(STUB_REQUEST_TIMEOUT)).build()?;

    let response = client.get(format!("{}/api/Story/All", stub.base_url())).send().await?;
    if response.status() != reqwest::StatusCode::UNAUTHORIZED {
        return Err(format!("expected 401, got {}", response.status()).into());
    }

    reporter.finish("pass", vec!["unauthenticated call rejected".to_string()], Vec::new())?;
    Ok(())
}
