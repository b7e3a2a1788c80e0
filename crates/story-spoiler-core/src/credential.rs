// crates/story-spoiler-core/src/credential.rs
// ============================================================================
// Module: Credential Resolver
// Description: Static-or-login bearer token acquisition for the Story API.
// Purpose: Resolve exactly one credential per run and fail fast otherwise.
// Dependencies: reqwest, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! Credential resolution is a two-step decision procedure:
//! [`CredentialSource::select`] prefers a non-blank static token and falls
//! back to login credentials, then [`CredentialResolver::resolve`] turns the
//! chosen source into a [`Credential`]. A static source performs no network
//! call; a login source performs exactly one `POST` to the authentication
//! endpoint.
//!
//! Every [`AuthError`] is fatal to the run: no scenario step executes without
//! a credential.
//!
//! Security posture: tokens and passwords are redacted in `Debug` output and
//! never logged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::api::AUTHENTICATION_PATH;
use crate::client::MAX_RESPONSE_BYTES;
use crate::client::build_http_client;
use crate::client::join_url;
use crate::client::read_body_with_limit;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Opaque bearer token presented on every Story API request.
///
/// # Invariants
/// - The token is never blank.
/// - The token is immutable once created.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a pre-supplied token, returning `None` when it is blank.
    ///
    /// The token is kept unchanged; only the blank check trims whitespace.
    #[must_use]
    pub fn from_static(token: &str) -> Option<Self> {
        if token.trim().is_empty() { None } else { Some(Self(token.to_string())) }
    }

    /// Returns the raw token for header construction.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Username and password used for the login fallback.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    /// Account user name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl LoginCredentials {
    /// Creates login credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where the run credential comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Pre-supplied bearer token; no network call.
    Static(Credential),
    /// Login call with user name and password.
    Login(LoginCredentials),
}

impl CredentialSource {
    /// Chooses the credential source: a non-blank static token wins, otherwise
    /// login credentials are used.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unconfigured`] when the static token is absent or
    /// blank and no login credentials are supplied.
    pub fn select(
        static_token: Option<&str>,
        login: Option<LoginCredentials>,
    ) -> Result<Self, AuthError> {
        if let Some(credential) = static_token.and_then(Credential::from_static) {
            return Ok(Self::Static(credential));
        }
        login.map(Self::Login).ok_or(AuthError::Unconfigured)
    }

    /// Returns a stable label for logging.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Static(_) => "static",
            Self::Login(_) => "login",
        }
    }
}

/// Fatal credential acquisition failures.
///
/// # Invariants
/// - Any variant aborts the run before the first scenario step.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Neither a static token nor login credentials were supplied.
    #[error("no bearer token or login credentials configured")]
    Unconfigured,
    /// The login HTTP client could not be constructed.
    #[error("login client setup failed: {0}")]
    Client(String),
    /// The login call failed at the network level.
    #[error("login request failed: {0}")]
    Transport(String),
    /// The login call returned a non-200 status.
    #[error("failed to authenticate: status {status}, content: {body}")]
    Failed {
        /// HTTP status code returned by the login endpoint.
        status: u16,
        /// Raw response body for diagnostics.
        body: String,
    },
    /// The login response did not carry a usable `accessToken`.
    #[error("failed to retrieve access token from the login response: {0}")]
    Decode(String),
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Login request body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    /// Account user name.
    user_name: &'a str,
    /// Account password.
    password: &'a str,
}

/// Login response body.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    /// Issued bearer token.
    #[serde(default)]
    access_token: Option<String>,
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolves a [`CredentialSource`] into a [`Credential`].
///
/// # Invariants
/// - The login client carries no authorization header.
pub struct CredentialResolver {
    /// Unauthenticated client used for the login call.
    client: Client,
    /// Base URL of the Story API.
    base_url: String,
}

impl CredentialResolver {
    /// Creates a resolver for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Client`] when the login client cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, AuthError> {
        let client = build_http_client(timeout).map_err(|err| AuthError::Client(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Resolves the credential for this run.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when the login call fails or its response carries
    /// no usable token.
    pub async fn resolve(&self, source: &CredentialSource) -> Result<Credential, AuthError> {
        match source {
            CredentialSource::Static(credential) => {
                info!(source = source.label(), "using pre-supplied bearer token");
                Ok(credential.clone())
            }
            CredentialSource::Login(login) => {
                info!(
                    source = source.label(),
                    username = %login.username,
                    "requesting bearer token"
                );
                self.login(login).await
            }
        }
    }

    /// Performs the login call.
    async fn login(&self, login: &LoginCredentials) -> Result<Credential, AuthError> {
        let url = join_url(&self.base_url, AUTHENTICATION_PATH);
        let request = LoginRequest {
            user_name: &login.username,
            password: &login.password,
        };
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|err| AuthError::Transport(err.to_string()))?;
        let status = response.status();
        let body = read_body_with_limit(response, MAX_RESPONSE_BYTES)
            .await
            .map_err(|err| AuthError::Transport(err.to_string()))?;
        if status != StatusCode::OK {
            return Err(AuthError::Failed {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).trim().to_string(),
            });
        }
        parse_access_token(&body)
    }
}

/// Extracts the bearer token from a login response body.
///
/// # Errors
///
/// Returns [`AuthError::Decode`] when the body is not JSON, `accessToken` is
/// not a string, or the token is absent or blank.
pub fn parse_access_token(body: &[u8]) -> Result<Credential, AuthError> {
    let parsed: LoginResponse =
        serde_json::from_slice(body).map_err(|err| AuthError::Decode(err.to_string()))?;
    parsed
        .access_token
        .as_deref()
        .and_then(Credential::from_static)
        .ok_or_else(|| AuthError::Decode("accessToken is missing or blank".to_string()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
