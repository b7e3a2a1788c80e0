// system-tests/tests/suites/failure_isolation.rs
// ============================================================================
// Module: Failure Isolation Tests
// Description: Step and credential failures against a misbehaving stub.
// Purpose: Validate that step failures stay local and auth failures are fatal.
// Dependencies: system-tests helpers, story-spoiler-core
// ============================================================================

//! Failure isolation system-tests for the story spoiler harness.

use axum::http::Method;
use helpers::artifacts::TestReporter;
use helpers::story_stub::RouteOverride;
use helpers::story_stub::StoryStubHandle;
use helpers::story_stub::StubConfig;
use helpers::story_stub::spawn_story_stub_with;
use helpers::timeouts::STUB_REQUEST_TIMEOUT;
use helpers::timeouts::resolve_timeout;
use story_spoiler_core::AuthError;
use story_spoiler_core::Credential;
use story_spoiler_core::CredentialSource;
use story_spoiler_core::HarnessError;
use story_spoiler_core::HarnessSettings;
use story_spoiler_core::LoginCredentials;
use story_spoiler_core::RunReport;
use story_spoiler_core::StepFailure;
use story_spoiler_core::run_story_spoiler_suite;

use crate::helpers;

fn token_settings(stub: &StoryStubHandle, token: &str) -> Result<HarnessSettings, String> {
    let credential = Credential::from_static(token).ok_or("token is blank")?;
    Ok(HarnessSettings {
        base_url: stub.base_url().to_string(),
        credential_source: CredentialSource::Static(credential),
        timeout: Some(resolve_timeout(STUB_REQUEST_TIMEOUT)),
    })
}

fn login_settings(stub: &StoryStubHandle, password: &str) -> HarnessSettings {
    HarnessSettings {
        base_url: stub.base_url().to_string(),
        credential_source: CredentialSource::Login(LoginCredentials::new("reader", password)),
        timeout: Some(resolve_timeout(STUB_REQUEST_TIMEOUT)),
    }
}

fn failed_names(report: &RunReport) -> Vec<&'static str> {
    report.failures().map(|step| step.name).collect()
}

fn failure_kind(report: &RunReport, name: &str) -> Option<&'static str> {
    report.step(name).and_then(|step| step.outcome.failure()).map(StepFailure::kind)
}

#[tokio::test(flavor = "multi_thread")]
async fn edit_server_error_fails_only_edit_steps() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("edit_server_error_fails_only_edit_steps")?;
    let config = StubConfig::default().with_override(RouteOverride::new(
        Method::PUT,
        "/api/Story/Edit/",
        500,
        r#"{"msg":"boom"}"#,
    ));
    let stub = spawn_story_stub_with(config)?;

    let report = run_story_spoiler_suite(&token_settings(&stub, "stub-token")?).await?;
    let artifacts = reporter.artifacts().write_run_report(&report)?;

    if report.steps().len() != 7 {
        return Err(format!("expected 7 step reports, got {}", report.steps().len()).into());
    }
    if failed_names(&report) != ["edit_story", "edit_deleted_story"] {
        return Err(format!("unexpected failures: {}", failed_names(&report).join(", ")).into());
    }
    let edit = report.step("edit_story").ok_or("edit_story missing")?;
    if edit.status != Some(500) || failure_kind(&report, "edit_story") != Some("assertion") {
        return Err("edit_story should fail its status assertion with 500".into());
    }
    let delete_path = report.step("delete_story").map(|step| step.path.as_str());
    if delete_path != Some("/api/Story/Delete/story-1") {
        return Err("delete_story should still target the created story".into());
    }

    reporter.finish("pass", vec!["edit failures stayed local".to_string()], artifacts)?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn create_without_story_id_leaves_context_empty() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("create_without_story_id_leaves_context_empty")?;
    let config = StubConfig::default().with_override(RouteOverride::new(
        Method::POST,
        "/api/Story/Create",
        201,
        r#"{"msg":"Successfully created!"}"#,
    ));
    let stub = spawn_story_stub_with(config)?;

    let report = run_story_spoiler_suite(&token_settings(&stub, "stub-token")?).await?;
    let artifacts = reporter.artifacts().write_run_report(&report)?;

    if report.steps().len() != 7 {
        return Err(format!("expected 7 step reports, got {}", report.steps().len()).into());
    }
    if failure_kind(&report, "create_story") != Some("assertion") {
        return Err("create_story should fail the storyId assertion".into());
    }
    if report.last_created_id().is_some() {
        return Err("no id should be recorded when the create step fails".into());
    }
    let edit_paths: Vec<String> = stub
        .requests()
        .into_iter()
        .filter(|request| request.method == "PUT")
        .map(|request| request.path)
        .collect();
    if edit_paths != ["/api/Story/Edit/", "/api/Story/Edit/"] {
        return Err(format!("unexpected edit paths: {}", edit_paths.join(", ")).into());
    }

    reporter.finish(
        "pass",
        vec!["missing storyId produced empty id segments".to_string()],
        artifacts,
    )?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_token_fails_every_step_without_abort() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("rejected_token_fails_every_step_without_abort")?;
    let stub = spawn_story_stub_with(StubConfig::default())?;

    let report = run_story_spoiler_suite(&token_settings(&stub, "wrong-token")?).await?;
    let artifacts = reporter.artifacts().write_run_report(&report)?;

    if report.failed_count() != 7 {
        return Err(format!("expected 7 failures, got {}", report.failed_count()).into());
    }
    if report.steps().iter().any(|step| step.status != Some(401)) {
        return Err("every step should observe a 401".into());
    }
    if stub.requests().len() != 7 {
        return Err(format!("expected 7 requests, got {}", stub.requests().len()).into());
    }

    reporter.finish("pass", vec!["401 on every step, run completed".to_string()], artifacts)?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_login_aborts_before_first_step() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("rejected_login_aborts_before_first_step")?;
    let stub = spawn_story_stub_with(StubConfig::default())?;

    let result = run_story_spoiler_suite(&login_settings(&stub, "wrong")).await;
    match result {
        Err(HarnessError::Auth(AuthError::Failed {
            status: 401,
            body,
        })) => {
            if body != "invalid credentials" {
                return Err(format!("unexpected login failure body: {body}").into());
            }
        }
        Err(err) => return Err(format!("unexpected harness error: {err}").into()),
        Ok(_) => return Err("expected the login failure to abort the run".into()),
    }
    if stub.requests().len() != 1 {
        return Err(format!("expected only the login call, got {}", stub.requests().len()).into());
    }

    reporter.finish("pass", vec!["login rejection was fatal".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn login_without_access_token_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("login_without_access_token_is_fatal")?;
    let config = StubConfig::default().with_override(RouteOverride::new(
        Method::POST,
        "/api/User/Authentication",
        200,
        r#"{"tokenType":"Bearer"}"#,
    ));
    let stub = spawn_story_stub_with(config)?;

    let result = run_story_spoiler_suite(&login_settings(&stub, "secret")).await;
    if !matches!(result, Err(HarnessError::Auth(AuthError::Decode(_)))) {
        return Err("expected a decode failure for a token-less login response".into());
    }
    if stub.requests().len() != 1 {
        return Err(format!("expected only the login call, got {}", stub.requests().len()).into());
    }

    reporter.finish("pass", vec!["token-less login response was fatal".to_string()], Vec::new())?;
    Ok(())
}
