// crates/story-spoiler-core/src/client.rs
// ============================================================================
// Module: Authenticated Client
// Description: Bearer-authenticated HTTP/JSON client for the Story API.
// Purpose: Execute verb-specific requests and return status plus raw body.
// Dependencies: async-trait, reqwest, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`AuthenticatedClient`] binds a base URL and a resolved [`Credential`] and
//! attaches `Authorization: Bearer <token>` to every request. HTTP error
//! statuses are ordinary returns; only network-level failures become
//! [`TransportError`]. There are no retries and no timeout unless one is
//! configured explicitly.
//!
//! The [`ApiTransport`] trait is the seam the scenario driver runs against,
//! so sequences can be exercised with scripted transports in tests.
//!
//! Security posture: response bodies are untrusted and read under a hard byte
//! limit; the bearer header is marked sensitive and never logged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use reqwest::header::HeaderValue;
use reqwest::redirect::Policy;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::credential::Credential;
use crate::envelope::StoryPayload;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum response body size accepted from the Story API.
pub const MAX_RESPONSE_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Types
// ============================================================================

/// HTTP verbs used by the Story API.
///
/// # Invariants
/// - Variants are stable for report labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// HTTP GET.
    Get,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP DELETE.
    Delete,
}

impl HttpMethod {
    /// Returns the canonical method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Maps the verb onto the reqwest method type.
    const fn to_reqwest(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request against the Story API.
///
/// # Invariants
/// - `path` is relative to the client base URL and starts with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Request path relative to the base URL.
    pub path: String,
    /// Optional story payload, sent as a JSON body.
    pub body: Option<StoryPayload>,
}

impl ApiRequest {
    /// Builds a request without a body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    /// Builds a request carrying a story payload as its JSON body.
    #[must_use]
    pub fn with_payload(
        method: HttpMethod,
        path: impl Into<String>,
        payload: &StoryPayload,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            body: Some(payload.clone()),
        }
    }
}

/// Status code and undecoded body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Returns the body as lossy UTF-8 text.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Network-level failures raised while talking to the Story API.
///
/// # Invariants
/// - HTTP error statuses are never mapped into this type.
/// - String payloads may include untrusted server or transport text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("http client build failed: {0}")]
    Build(String),
    /// A header value could not be encoded.
    #[error("invalid {0} header value")]
    InvalidHeader(&'static str),
    /// The request could not be sent or no response arrived.
    #[error("http request failed: {0}")]
    Send(String),
    /// The response body could not be read.
    #[error("http response body read failed: {0}")]
    Body(String),
    /// The response body exceeded the size limit.
    #[error("http response exceeds size limit ({actual} > {limit})")]
    ResponseTooLarge {
        /// Bytes read before the limit tripped.
        actual: usize,
        /// Maximum size in bytes.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Transport Seam
// ============================================================================

/// Executes Story API requests on behalf of the scenario driver.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Executes a request and returns the status code and raw body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on network-level failures only.
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, TransportError>;
}

// ============================================================================
// SECTION: Authenticated Client
// ============================================================================

/// HTTP client bound to a base URL and a bearer credential.
///
/// # Invariants
/// - Every request carries the bearer authorization header.
/// - The underlying connection pool is released once, when the client is
///   closed or dropped.
pub struct AuthenticatedClient {
    /// Reqwest client instance (connection pool).
    client: Client,
    /// Base URL without a trailing slash.
    base_url: String,
    /// Pre-encoded `Bearer` authorization header.
    authorization: HeaderValue,
}

impl AuthenticatedClient {
    /// Builds a client with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the HTTP client cannot be built or the
    /// credential cannot be encoded as a header.
    pub fn new(
        base_url: &str,
        credential: &Credential,
        timeout: Option<Duration>,
    ) -> Result<Self, TransportError> {
        let client = build_http_client(timeout)?;
        Self::with_client(client, base_url, credential)
    }

    /// Builds a client around an existing reqwest client.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the credential cannot be encoded as a header.
    pub fn with_client(
        client: Client,
        base_url: &str,
        credential: &Credential,
    ) -> Result<Self, TransportError> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", credential.expose()))
            .map_err(|_| TransportError::InvalidHeader("authorization"))?;
        authorization.set_sensitive(true);
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization,
        })
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Releases the connection pool.
    pub fn close(self) {
        let Self {
            client,
            base_url,
            ..
        } = self;
        drop(client);
        debug!(base_url = %base_url, "story api client closed");
    }
}

impl fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("base_url", &self.base_url)
            .field("authorization", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ApiTransport for AuthenticatedClient {
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let url = join_url(&self.base_url, &request.path);
        let mut builder = self
            .client
            .request(request.method.to_reqwest(), &url)
            .header(AUTHORIZATION, self.authorization.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response =
            builder.send().await.map_err(|err| TransportError::Send(err.to_string()))?;
        let status = response.status().as_u16();
        let body = read_body_with_limit(response, MAX_RESPONSE_BYTES).await?;
        debug!(
            method = request.method.as_str(),
            path = %request.path,
            status,
            bytes = body.len(),
            "story api response"
        );
        Ok(RawResponse {
            status,
            body,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a reqwest client that does not follow redirects.
///
/// # Errors
///
/// Returns [`TransportError::Build`] when the client cannot be constructed.
pub(crate) fn build_http_client(timeout: Option<Duration>) -> Result<Client, TransportError> {
    let mut builder = Client::builder().redirect(Policy::none());
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|err| TransportError::Build(err.to_string()))
}

/// Joins a base URL and a request path with exactly one `/` between them.
#[must_use]
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') { format!("{base}{path}") } else { format!("{base}/{path}") }
}

/// Reads a response body while enforcing a hard byte limit.
pub(crate) async fn read_body_with_limit(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, TransportError> {
    let mut body = Vec::new();
    let mut total: usize = 0;
    while let Some(chunk) =
        response.chunk().await.map_err(|err| TransportError::Body(err.to_string()))?
    {
        let next_total = total.checked_add(chunk.len()).ok_or(TransportError::ResponseTooLarge {
            actual: usize::MAX,
            limit,
        })?;
        if next_total > limit {
            return Err(TransportError::ResponseTooLarge {
                actual: next_total,
                limit,
            });
        }
        body.extend_from_slice(&chunk);
        total = next_total;
    }
    Ok(body)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
