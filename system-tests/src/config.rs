// system-tests/src/config.rs
// ============================================================================
// Module: System Test Configuration
// Description: Environment settings shared by the story spoiler system-tests.
// Purpose: Resolve artifact root, live target and timeout floor once per test.
// Dependencies: story-spoiler-config
// ============================================================================

//! ## Overview
//! Three optional variables steer the system-tests. Values go through the same
//! strict reader as the harness configuration, so non-UTF-8 or blank values
//! fail the suite instead of being ignored.

use std::path::PathBuf;
use std::time::Duration;

use story_spoiler_config::read_env_nonempty;

// ============================================================================
// SECTION: Keys
// ============================================================================

/// Artifact root override; each test writes under `<root>/<test name>`.
pub const RUN_ROOT_ENV: &str = "STORY_SPOILER_SYSTEM_TEST_RUN_ROOT";
/// Base URL of a real deployment; enables the live suite.
pub const LIVE_URL_ENV: &str = "STORY_SPOILER_SYSTEM_TEST_LIVE_URL";
/// Minimum request timeout in whole seconds.
pub const TIMEOUT_SEC_ENV: &str = "STORY_SPOILER_SYSTEM_TEST_TIMEOUT_SEC";

// ============================================================================
// SECTION: Config
// ============================================================================

/// Settings read from the system-test environment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemTestConfig {
    /// Artifact root override.
    pub run_root: Option<PathBuf>,
    /// Live deployment URL.
    pub live_url: Option<String>,
    /// Timeout floor for stub and live requests.
    pub timeout: Option<Duration>,
}

impl SystemTestConfig {
    /// Reads the system-test environment.
    ///
    /// # Errors
    ///
    /// Returns a message naming the variable when a value is not UTF-8, is
    /// blank, or (for the timeout) is not a positive whole number.
    pub fn load() -> Result<Self, String> {
        let read = |name: &str| read_env_nonempty(name).map_err(|err| err.to_string());
        let timeout = match read(TIMEOUT_SEC_ENV)? {
            Some(raw) => Some(seconds(&raw)?),
            None => None,
        };
        Ok(Self {
            run_root: read(RUN_ROOT_ENV)?.map(PathBuf::from),
            live_url: read(LIVE_URL_ENV)?.map(|url| url.trim().to_string()),
            timeout,
        })
    }
}

/// Parses a positive number of seconds.
fn seconds(raw: &str) -> Result<Duration, String> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => {
            Err(format!("{TIMEOUT_SEC_ENV} must be a positive whole number of seconds"))
        }
        Ok(secs) => Ok(Duration::from_secs(secs)),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
