use std::time::Duration;

use reqwest::StatusCode;

const DEFAULT_MAX_RETRIES: u32 = 4;
const DEFAULT_WAIT_MIN: Duration = Duration::from_secs(1);
const DEFAULT_WAIT_MAX: Duration = Duration::from_secs(30);

/// Exponential backoff for notification delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Wait before the first retry.
    pub wait_min: Duration,
    /// Upper bound on any single wait.
    pub wait_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            wait_min: DEFAULT_WAIT_MIN,
            wait_max: DEFAULT_WAIT_MAX,
        }
    }
}

impl RetryPolicy {
    /// Wait before retry number `attempt + 1`: `wait_min * 2^attempt`, capped.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.wait_min
            .checked_mul(factor)
            .map_or(self.wait_max, |wait| wait.min(self.wait_max))
    }

    /// Whether a response with `status` is worth retrying.
    pub fn should_retry(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS
            || (status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED)
    }
}
