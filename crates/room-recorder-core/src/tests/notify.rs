use crate::{
    CoordinatorEndpoint, HttpNotifier, JobKind, RecorderError, RetryPolicy, TaskResponse, sign,
    tests::support::{request, spawn_coordinator},
    verify,
};

use std::time::Duration;

use prost::Message;
use reqwest::StatusCode;

const SECRET: &str = "secret";

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 4,
        wait_min: Duration::from_millis(10),
        wait_max: Duration::from_millis(40),
    }
}

#[allow(clippy::unwrap_used)]
fn notifier(host: String) -> HttpNotifier {
    HttpNotifier::new(
        CoordinatorEndpoint {
            host,
            api_key: "key-1".to_string(),
            api_secret: SECRET.to_string(),
        },
        fast_retry(),
    )
    .unwrap()
}

/// WHAT: Signatures match the published HMAC-SHA256 test vector
/// WHY: The coordinator recomputes the digest independently
#[test]
#[allow(clippy::unwrap_used)]
fn given_known_key_and_message_when_signing_then_lowercase_hex_digest() {
    // When
    let signature = sign("key", b"The quick brown fox jumps over the lazy dog").unwrap();

    // Then
    assert_eq!(
        signature,
        "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
    );
}

/// WHAT: verify accepts only the matching secret and body
/// WHY: Ingest relies on it to reject forged tasks
#[test]
#[allow(clippy::unwrap_used)]
fn given_signed_body_when_verifying_then_only_exact_match_accepted() {
    let signature = sign(SECRET, b"payload").unwrap();

    assert!(verify(SECRET, b"payload", &signature));
    assert!(verify(SECRET, b"payload", &signature.to_uppercase()));
    assert!(!verify(SECRET, b"payload2", &signature));
    assert!(!verify("other", b"payload", &signature));
    assert!(!verify(SECRET, b"payload", "not-hex"));
}

/// WHAT: A report carries credentials, signature and the encoded body
/// WHY: The coordinator authenticates every notification
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_response_when_notifying_then_signed_protobuf_posted() {
    // Given
    let stub = spawn_coordinator(vec![]).await;
    let notifier = notifier(stub.host());
    let response = TaskResponse::started(&request(42, JobKind::StartRecording));

    // When
    let status = notifier.notify(&response, None).await.unwrap();

    // Then
    assert_eq!(status, 200);
    assert_eq!(stub.hits(), 1);
    let received = stub.received.lock()[0].clone();
    assert_eq!(received.headers["API-KEY"], "key-1");
    assert_eq!(received.headers["content-type"], "application/protobuf");
    let signature = received.headers["HASH-SIGNATURE"].to_str().unwrap();
    assert!(verify(SECRET, &received.body, signature));
    let decoded = TaskResponse::decode(received.body.as_ref()).unwrap();
    assert_eq!(decoded, response);
}

/// WHAT: Server errors are retried until one succeeds
/// WHY: Coordinator restarts must not lose status reports
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_transient_server_errors_when_notifying_then_retried_until_success() {
    let stub = spawn_coordinator(vec![500, 500]).await;
    let notifier = notifier(stub.host());
    let response = TaskResponse::started(&request(42, JobKind::StartRecording));

    let status = notifier.notify(&response, None).await.unwrap();

    assert_eq!(status, 200);
    assert_eq!(stub.hits(), 3);
}

/// WHAT: An explicit retry limit of zero sends exactly once
/// WHY: Callers can bound delivery latency per call
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_zero_retry_limit_when_unavailable_then_last_status_returned() {
    let stub = spawn_coordinator(vec![503]).await;
    let notifier = notifier(stub.host());
    let response = TaskResponse::started(&request(42, JobKind::StartRecording));

    let status = notifier.notify(&response, Some(0)).await.unwrap();

    assert_eq!(status, 503);
    assert_eq!(stub.hits(), 1);
}

/// WHAT: Retries stop after the configured budget
/// WHY: A dead coordinator must not stall the close path forever
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_persistent_server_error_when_notifying_then_gives_up_after_budget() {
    let stub = spawn_coordinator(vec![502; 10]).await;
    let notifier = notifier(stub.host());
    let response = TaskResponse::started(&request(42, JobKind::StartRecording));

    let status = notifier.notify(&response, Some(2)).await.unwrap();

    assert_eq!(status, 502);
    assert_eq!(stub.hits(), 3);
}

/// WHAT: Client errors are returned without retrying
/// WHY: Resending a rejected body cannot succeed
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_client_error_when_notifying_then_not_retried() {
    let stub = spawn_coordinator(vec![400]).await;
    let notifier = notifier(stub.host());
    let response = TaskResponse::started(&request(42, JobKind::StartRecording));

    let status = notifier.notify(&response, None).await.unwrap();

    assert_eq!(status, 400);
    assert_eq!(stub.hits(), 1);
}

/// WHAT: Connection failures surface as notification errors
/// WHY: The caller logs them instead of assuming delivery
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_unreachable_coordinator_when_notifying_then_notification_error() {
    // Given: A port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let notifier = notifier(format!("http://{}", addr));
    let response = TaskResponse::started(&request(42, JobKind::StartRecording));

    // When
    let result = notifier.notify(&response, Some(1)).await;

    // Then
    assert!(matches!(result, Err(RecorderError::Notification { .. })));
}

/// WHAT: Backoff doubles from the minimum and is capped
/// WHY: Bounded waits keep shutdown predictable
#[test]
fn given_policy_when_computing_backoff_then_exponential_and_capped() {
    let policy = RetryPolicy::default();

    assert_eq!(policy.backoff(0), Duration::from_secs(1));
    assert_eq!(policy.backoff(1), Duration::from_secs(2));
    assert_eq!(policy.backoff(3), Duration::from_secs(8));
    assert_eq!(policy.backoff(5), Duration::from_secs(30));
    assert_eq!(policy.backoff(40), Duration::from_secs(30));
}

/// WHAT: Only throttling and transient server errors are retried
/// WHY: Everything else is a final answer
#[test]
fn given_status_codes_when_classifying_then_only_transient_retried() {
    assert!(RetryPolicy::should_retry(StatusCode::TOO_MANY_REQUESTS));
    assert!(RetryPolicy::should_retry(StatusCode::INTERNAL_SERVER_ERROR));
    assert!(RetryPolicy::should_retry(StatusCode::SERVICE_UNAVAILABLE));
    assert!(!RetryPolicy::should_retry(StatusCode::NOT_IMPLEMENTED));
    assert!(!RetryPolicy::should_retry(StatusCode::BAD_REQUEST));
    assert!(!RetryPolicy::should_retry(StatusCode::UNAUTHORIZED));
    assert!(!RetryPolicy::should_retry(StatusCode::OK));
}
