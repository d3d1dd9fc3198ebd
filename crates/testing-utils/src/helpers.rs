//! Test helpers for assignment runs

use hostgate_core::AssignmentConfig;
use std::time::Duration;

/// Upper bound for any single assignment run in tests
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Assignment config with no settle delay and a short backoff
pub fn fast_assignment_config() -> AssignmentConfig {
    AssignmentConfig {
        backoff_interval_millis: 10,
        settle_delay_millis: 0,
        max_pairs_per_cycle: None,
    }
}

/// Assignment config whose backoff would outlast any test
pub fn long_backoff_config() -> AssignmentConfig {
    AssignmentConfig {
        backoff_interval_millis: 60_000,
        settle_delay_millis: 0,
        max_pairs_per_cycle: None,
    }
}
