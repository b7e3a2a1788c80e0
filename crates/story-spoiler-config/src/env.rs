// crates/story-spoiler-config/src/env.rs
// ============================================================================
// Module: Harness Environment
// Description: Environment-backed overrides for harness configuration.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Set-but-empty values and invalid UTF-8 fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::config::ConfigError;
use crate::config::HarnessConfig;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys read by the harness configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessEnv {
    /// Config file path.
    Config,
    /// Story API base URL override.
    BaseUrl,
    /// Pre-supplied bearer token.
    Token,
    /// Login user name.
    Username,
    /// Login password.
    Password,
    /// Per-request timeout in milliseconds (positive integer).
    TimeoutMs,
    /// Report artifact directory.
    ReportDir,
}

impl HarnessEnv {
    /// Every override key applied after the config file.
    pub const OVERRIDES: [Self; 6] = [
        Self::BaseUrl,
        Self::Token,
        Self::Username,
        Self::Password,
        Self::TimeoutMs,
        Self::ReportDir,
    ];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "STORY_SPOILER_CONFIG",
            Self::BaseUrl => "STORY_SPOILER_BASE_URL",
            Self::Token => "STORY_SPOILER_TOKEN",
            Self::Username => "STORY_SPOILER_USERNAME",
            Self::Password => "STORY_SPOILER_PASSWORD",
            Self::TimeoutMs => "STORY_SPOILER_TIMEOUT_MS",
            Self::ReportDir => "STORY_SPOILER_REPORT_DIR",
        }
    }
}

// ============================================================================
// SECTION: Overrides
// ============================================================================

/// Override values read from the process environment.
pub(crate) struct EnvOverrides {
    /// Base URL override.
    base_url: Option<String>,
    /// Static token override.
    static_token: Option<String>,
    /// Login user name override.
    username: Option<String>,
    /// Login password override.
    password: Option<String>,
    /// Timeout override in milliseconds.
    timeout_ms: Option<u64>,
    /// Report directory override.
    report_dir: Option<String>,
}

impl EnvOverrides {
    /// Reads every override key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] when a value is not valid UTF-8, is empty,
    /// or the timeout is not a positive integer.
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let timeout_ms = read_env_nonempty(HarnessEnv::TimeoutMs.as_str())?
            .map(|value| parse_timeout_ms(HarnessEnv::TimeoutMs.as_str(), &value))
            .transpose()?;
        Ok(Self {
            base_url: read_env_nonempty(HarnessEnv::BaseUrl.as_str())?,
            static_token: read_env_nonempty(HarnessEnv::Token.as_str())?,
            username: read_env_nonempty(HarnessEnv::Username.as_str())?,
            password: read_env_nonempty(HarnessEnv::Password.as_str())?,
            timeout_ms,
            report_dir: read_env_nonempty(HarnessEnv::ReportDir.as_str())?,
        })
    }

    /// Overwrites config values with every override that is set.
    pub(crate) fn apply(self, config: &mut HarnessConfig) {
        if let Some(base_url) = self.base_url {
            config.api.base_url = base_url;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.api.timeout_ms = Some(timeout_ms);
        }
        if self.static_token.is_some() {
            config.auth.static_token = self.static_token;
        }
        if self.username.is_some() {
            config.auth.username = self.username;
        }
        if self.password.is_some() {
            config.auth.password = self.password;
        }
        if self.report_dir.is_some() {
            config.report.output_dir = self.report_dir;
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns [`ConfigError::Env`] when the variable contains invalid UTF-8.
pub(crate) fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| ConfigError::Env(format!("{name} must be valid UTF-8")))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns [`ConfigError::Env`] when the variable is set but empty or whitespace.
pub fn read_env_nonempty(name: &str) -> Result<Option<String>, ConfigError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Env(format!("{name} must not be empty")))
        }
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive millisecond timeout.
///
/// # Errors
///
/// Returns [`ConfigError::Env`] when the value is non-numeric or zero.
fn parse_timeout_ms(name: &str, raw: &str) -> Result<u64, ConfigError> {
    let millis: u64 = raw.trim().parse().map_err(|_| {
        ConfigError::Env(format!("{name} must be a positive integer number of milliseconds"))
    })?;
    if millis == 0 {
        return Err(ConfigError::Env(format!("{name} must be greater than zero")));
    }
    Ok(millis)
}
