//! Authenticated status reporting to the upstream coordinator.

mod http_notifier;
mod retry_policy;
mod signature;

pub use {
    http_notifier::{CoordinatorEndpoint, HttpNotifier, NOTIFY_PATH},
    retry_policy::RetryPolicy,
    signature::{sign, verify},
};

use crate::{CoreResult, protocol::TaskResponse};

use async_trait::async_trait;

/// Destination for job status reports.
#[async_trait]
pub trait StatusReporter: Send + Sync {
    /// Deliver `response`, returning the HTTP status code received.
    async fn report(&self, response: &TaskResponse) -> CoreResult<u16>;
}
