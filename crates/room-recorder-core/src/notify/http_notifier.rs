use crate::{
    CoreResult,
    notify::{RetryPolicy, StatusReporter, sign},
    protocol::TaskResponse,
};

use async_trait::async_trait;
use prost::Message;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument, warn};

/// Path of the coordinator's notification endpoint.
pub const NOTIFY_PATH: &str = "/auth/recorder/notify";

const API_KEY_HEADER: &str = "API-KEY";
const SIGNATURE_HEADER: &str = "HASH-SIGNATURE";
const PROTOBUF_CONTENT_TYPE: &str = "application/protobuf";

/// Where and as whom reports are sent.
#[derive(Debug, Clone)]
pub struct CoordinatorEndpoint {
    /// Base URL, e.g. `https://coordinator.example`.
    pub host: String,
    /// Value of the `API-KEY` header.
    pub api_key: String,
    /// Shared secret used to sign request bodies.
    pub api_secret: String,
}

/// Signs and posts [`TaskResponse`]s to the coordinator, retrying with backoff.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
    endpoint: CoordinatorEndpoint,
    retry: RetryPolicy,
}

impl HttpNotifier {
    /// Notifier for `endpoint` using `retry` unless a call overrides it.
    #[track_caller]
    pub fn new(endpoint: CoordinatorEndpoint, retry: RetryPolicy) -> CoreResult<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            endpoint,
            retry,
        })
    }

    /// Deliver `response`, retrying at most `retry_limit` times when given.
    ///
    /// Returns the status code of the last response received. Errors only
    /// when every attempt failed before a response arrived.
    #[instrument(
        skip(self, response),
        fields(task = %response.task(), recording_id = %response.recording_id)
    )]
    pub async fn notify(
        &self,
        response: &TaskResponse,
        retry_limit: Option<u32>,
    ) -> CoreResult<u16> {
        let body = response.encode_to_vec();
        let signature = sign(&self.endpoint.api_secret, &body)?;
        let url = format!("{}{}", self.endpoint.host.trim_end_matches('/'), NOTIFY_PATH);
        let max_retries = retry_limit.unwrap_or(self.retry.max_retries);

        let mut attempt = 0;
        loop {
            let result = self
                .client
                .post(&url)
                .header(API_KEY_HEADER, &self.endpoint.api_key)
                .header(SIGNATURE_HEADER, &signature)
                .header(CONTENT_TYPE, PROTOBUF_CONTENT_TYPE)
                .body(body.clone())
                .send()
                .await;

            match result {
                Ok(resp) => {
                    let status = resp.status();
                    if !RetryPolicy::should_retry(status) || attempt >= max_retries {
                        debug!(status = status.as_u16(), attempt, "Notification delivered");
                        return Ok(status.as_u16());
                    }
                    warn!(
                        status = status.as_u16(),
                        attempt,
                        "Coordinator rejected notification, retrying"
                    );
                }
                Err(e) => {
                    if attempt >= max_retries {
                        return Err(e.into());
                    }
                    warn!(error = %e, attempt, "Notification request failed, retrying");
                }
            }

            tokio::time::sleep(self.retry.backoff(attempt)).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl StatusReporter for HttpNotifier {
    async fn report(&self, response: &TaskResponse) -> CoreResult<u16> {
        self.notify(response, None).await
    }
}
