use room_recorder_core::{CoordinatorEndpoint, RetryPolicy};

use serde::{Deserialize, Serialize};

/// Upstream coordinator credentials and delivery settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Base URL of the coordinator.
    #[serde(default)]
    pub host: String,
    /// Key sent in the `API-KEY` header and expected on incoming tasks.
    #[serde(default)]
    pub api_key: String,
    /// Shared secret for request signatures.
    #[serde(default)]
    pub api_secret: String,
    /// Overrides the default number of notification retries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_max: Option<u32>,
}

impl CoordinatorConfig {
    /// Endpoint handed to the notifier.
    pub fn endpoint(&self) -> CoordinatorEndpoint {
        CoordinatorEndpoint {
            host: self.host.clone(),
            api_key: self.api_key.clone(),
            api_secret: self.api_secret.clone(),
        }
    }

    /// Retry policy with `retry_max` applied.
    pub fn retry_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy {
            max_retries: self.retry_max.unwrap_or(defaults.max_retries),
            ..defaults
        }
    }
}
