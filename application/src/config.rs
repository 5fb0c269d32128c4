use std::time::Duration as StdDuration;

use time::Duration;

/// Settings for the match-result cache, derived from the loaded
/// configuration at bootstrap.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub ttl: Duration,
    pub max_entries_per_user: usize,
}

/// Settings for retrying the external matching call.
#[derive(Debug, Clone)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub backoff: StdDuration,
    pub jitter_min_percent: u8,
    pub jitter_max_percent: u8,
}

/// Settings for the stale-hold sweeper.
#[derive(Debug, Clone)]
pub struct SweepSettings {
    pub hold_ttl: Duration,
}
