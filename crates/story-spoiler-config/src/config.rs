// crates/story-spoiler-config/src/config.rs
// ============================================================================
// Module: Harness Configuration
// Description: Configuration loading and validation for the harness.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, story-spoiler-core, toml, url
// ============================================================================

//! ## Overview
//! Configuration is read from an optional TOML file, then overridden from the
//! environment, then validated. A missing default file is not an error: every
//! setting has a default or an environment source.
//!
//! Security posture: config inputs are untrusted. Secrets are only held here
//! until they are handed to the credential resolver.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use story_spoiler_core::CredentialSource;
use story_spoiler_core::HarnessSettings;
use story_spoiler_core::LoginCredentials;
use thiserror::Error;
use url::Url;

use crate::env::EnvOverrides;
use crate::env::HarnessEnv;
use crate::env::read_env_nonempty;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_NAME: &str = "story-spoiler.toml";
/// Default Story API deployment.
pub const DEFAULT_BASE_URL: &str = "https://d3s5nxhwblsjbi.cloudfront.net";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Upper bound for the per-request timeout.
pub(crate) const MAX_TIMEOUT_MS: u64 = 600_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Story spoiler harness configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Target API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Credential settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Report artifact settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Target API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the Story API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Optional per-request timeout in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: None,
        }
    }
}

/// Credential settings. A non-blank static token wins over login.
#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Pre-supplied bearer token.
    #[serde(default)]
    pub static_token: Option<String>,
    /// Login user name.
    #[serde(default)]
    pub username: Option<String>,
    /// Login password.
    #[serde(default)]
    pub password: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("static_token", &self.static_token.as_ref().map(|_| "<redacted>"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Report artifact settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Directory receiving `summary.json` and `summary.md`.
    #[serde(default)]
    pub output_dir: Option<String>,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl HarnessConfig {
    /// Loads configuration using the default resolution rules: explicit path,
    /// then `STORY_SPOILER_CONFIG`, then `story-spoiler.toml` when it exists,
    /// then defaults. Environment overrides apply last.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overriding or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match resolve_path(path)? {
            Some(resolved) => Self::load_file(&resolved)?,
            None => Self::default(),
        };
        EnvOverrides::load()?.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a config file without overrides or validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the path, size, encoding or TOML is invalid.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::parse(content)
    }

    /// Parses TOML text without overrides or validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or unknown fields.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when any section is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.auth.validate()?;
        self.report.validate()
    }

    /// Builds harness settings from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when no credential source is usable.
    pub fn harness_settings(&self) -> Result<HarnessSettings, ConfigError> {
        let credential_source =
            CredentialSource::select(self.auth.static_token.as_deref(), self.auth.login())
                .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        Ok(HarnessSettings {
            base_url: self.api.base_url.trim().to_string(),
            credential_source,
            timeout: self.api.timeout(),
        })
    }

    /// Returns the report directory, if configured.
    #[must_use]
    pub fn report_dir(&self) -> Option<PathBuf> {
        self.report.output_dir.as_deref().map(|dir| PathBuf::from(dir.trim()))
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

impl ApiConfig {
    /// Returns the per-request timeout, if configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Validates the base URL and timeout.
    fn validate(&self) -> Result<(), ConfigError> {
        let trimmed = self.base_url.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Invalid("api.base_url must be non-empty".to_string()));
        }
        let url = Url::parse(trimmed).map_err(|err| {
            ConfigError::Invalid(format!("api.base_url is not a valid url: {err}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid("api.base_url must use http or https".to_string()));
        }
        if url.host_str().is_none() {
            return Err(ConfigError::Invalid("api.base_url must include a host".to_string()));
        }
        match self.timeout_ms {
            Some(0) => {
                Err(ConfigError::Invalid("api.timeout_ms must be greater than zero".to_string()))
            }
            Some(millis) if millis > MAX_TIMEOUT_MS => Err(ConfigError::Invalid(format!(
                "api.timeout_ms must be at most {MAX_TIMEOUT_MS}"
            ))),
            _ => Ok(()),
        }
    }
}

impl AuthConfig {
    /// Returns login credentials when both fields are non-blank.
    #[must_use]
    pub fn login(&self) -> Option<LoginCredentials> {
        match (non_blank(self.username.as_deref()), non_blank(self.password.as_deref())) {
            (Some(username), Some(password)) => Some(LoginCredentials::new(username, password)),
            _ => None,
        }
    }

    /// Requires a usable credential path and complete login pairs.
    fn validate(&self) -> Result<(), ConfigError> {
        let username = non_blank(self.username.as_deref());
        let password = non_blank(self.password.as_deref());
        if username.is_some() != password.is_some() {
            return Err(ConfigError::Invalid(
                "auth.username and auth.password must be set together".to_string(),
            ));
        }
        if non_blank(self.static_token.as_deref()).is_none() && username.is_none() {
            return Err(ConfigError::Invalid(
                "auth requires static_token or username and password".to_string(),
            ));
        }
        Ok(())
    }
}

impl ReportConfig {
    /// Validates the output directory when set.
    fn validate(&self) -> Result<(), ConfigError> {
        self.output_dir
            .as_deref()
            .map_or(Ok(()), |dir| validate_path_string("report.output_dir", dir))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid environment override.
    #[error("config env error: {0}")]
    Env(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default for [`ApiConfig::base_url`].
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Returns the trimmed value when it is not blank.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Resolves the config path from the argument, the environment or the default
/// file name.
fn resolve_path(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    if let Some(env_path) = read_env_nonempty(HarnessEnv::Config.as_str())? {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_NAME);
    Ok(default.is_file().then_some(default))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}
