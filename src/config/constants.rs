use std::time::Duration;

pub const DEFAULT_BUDGET: f64 = 2000.0;
pub const PERCENTILE_STEP: f64 = 1.0;
pub const DEFAULT_SERVER_PORT_RANGE_START: u16 = 8080;
pub const DEFAULT_SERVER_PORT_RANGE_END: u16 = 8200;
pub const MAX_SESSION_ID_LENGTH: usize = 64;
pub const SESSION_IDLE_TTL_MINUTES: i64 = 60;
pub const SERVER_SHUTDOWN_GRACE_PERIOD_MS: u64 = 100;
pub const MIN_UNLOCKED_FOR_EDIT: usize = 2;
pub const SPLIT_SUM_TOLERANCE: f64 = 0.01;

pub const DEFAULT_SPLIT: &[(&str, f64)] = &[
    ("protein", 30.0),
    ("carbs", 40.0),
    ("fat", 30.0),
];

pub fn sleep_duration_millis(milliseconds: u64) -> Duration {
    Duration::from_millis(milliseconds)
}
