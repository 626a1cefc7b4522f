//! HTTP surface through which the coordinator submits tasks.

use room_recorder_core::{
    RecorderError, SUCCESS_MESSAGE, SessionController, TaskOutcome, TaskRequest, TaskResponse,
    verify,
};

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use prost::Message;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

/// Route receiving protobuf [`TaskRequest`]s.
pub(crate) const TASK_PATH: &str = "/recorder/task";
/// Route reporting registry state.
pub(crate) const STATUS_PATH: &str = "/status";

pub(crate) const API_KEY_HEADER: &str = "API-KEY";
pub(crate) const SIGNATURE_HEADER: &str = "HASH-SIGNATURE";
const PROTOBUF_CONTENT_TYPE: &str = "application/protobuf";

const NOT_FOUND_MESSAGE: &str = "no active job for this room";

/// Shared state of the ingest handlers.
#[derive(Clone)]
pub(crate) struct IngestState {
    pub(crate) controller: SessionController,
    pub(crate) api_key: Arc<str>,
    pub(crate) api_secret: Arc<str>,
}

/// Body of `GET /status`.
#[derive(Debug, Serialize)]
pub(crate) struct StatusBody {
    pub(crate) active_jobs: usize,
    pub(crate) in_progress: u64,
}

pub(crate) fn router(state: IngestState) -> Router {
    Router::new()
        .route(TASK_PATH, post(submit_task))
        .route(STATUS_PATH, get(status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[instrument(skip_all)]
async fn submit_task(
    State(state): State<IngestState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !state.authenticated(&headers, &body) {
        warn!("Rejected task with invalid credentials");
        return protobuf(
            StatusCode::UNAUTHORIZED,
            rejection("invalid credentials"),
        );
    }

    let req = match TaskRequest::decode(body) {
        Ok(req) => req,
        Err(e) => {
            warn!(error = %e, "Rejected undecodable task");
            return protobuf(
                StatusCode::BAD_REQUEST,
                rejection(format!("invalid task body: {}", e)),
            );
        }
    };

    info!(room_table_id = req.room_table_id, task = req.task, "Task received");

    let (status, ok, msg) = match state.controller.handle_task(req.clone()).await {
        Ok(TaskOutcome::Started) | Ok(TaskOutcome::Stopped { found: true }) => {
            (StatusCode::OK, true, SUCCESS_MESSAGE.to_string())
        }
        Ok(TaskOutcome::Stopped { found: false }) => {
            (StatusCode::NOT_FOUND, false, NOT_FOUND_MESSAGE.to_string())
        }
        Err(e) => {
            let status = match &e {
                RecorderError::DuplicateInProgress { .. } => StatusCode::CONFLICT,
                RecorderError::UnsupportedTask { .. } => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            warn!(error = %e, status = status.as_u16(), "Task failed");
            (status, false, e.to_string())
        }
    };

    let response = TaskResponse {
        task: req.task,
        ..TaskResponse::reply(&req, ok, msg)
    };
    protobuf(status, response)
}

async fn status(State(state): State<IngestState>) -> Json<StatusBody> {
    Json(StatusBody {
        active_jobs: state.controller.active_jobs(),
        in_progress: state.controller.in_progress(),
    })
}

impl IngestState {
    fn authenticated(&self, headers: &HeaderMap, body: &[u8]) -> bool {
        let api_key = headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok());

        match (api_key, signature) {
            (Some(key), Some(signature)) => {
                key == self.api_key.as_ref() && verify(&self.api_secret, body, signature)
            }
            _ => false,
        }
    }
}

fn rejection(msg: impl Into<String>) -> TaskResponse {
    TaskResponse::reply(&TaskRequest::default(), false, msg)
}

fn protobuf(status: StatusCode, response: TaskResponse) -> Response {
    (
        status,
        [(CONTENT_TYPE, PROTOBUF_CONTENT_TYPE)],
        response.encode_to_vec(),
    )
        .into_response()
}
