// system-tests/tests/helpers/timeouts.rs
// ============================================================================
// Module: System Test Timeouts
// Description: Centralized request timeout with env overrides.
// Purpose: Keep harness timeouts consistent and configurable across suites.
// ============================================================================

use std::time::Duration;

use system_tests::config::SystemTestConfig;

/// Request timeout used against the in-process stub.
pub const STUB_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Returns the effective timeout, honoring `STORY_SPOILER_SYSTEM_TEST_TIMEOUT_SEC`
/// when set. The override acts as a minimum to avoid shortening explicitly
/// longer timeouts.
#[must_use]
#[allow(clippy::panic, reason = "Misconfigured test env should abort the suite.")]
pub fn resolve_timeout(requested: Duration) -> Duration {
    match SystemTestConfig::load() {
        Ok(config) => config.timeout.map_or(requested, |timeout| requested.max(timeout)),
        Err(err) => panic!("{err}"),
    }
}
