//! Wire messages exchanged with the upstream coordinator.
//!
//! Both messages are protobuf encoded with `prost`; field tags are part of the
//! contract and must not be renumbered.

mod job_kind;
mod task_request;
mod task_response;

pub use {job_kind::JobKind, task_request::TaskRequest, task_response::TaskResponse};

/// Origin tag carried by every response this service sends.
pub const RESPONSE_ORIGIN: &str = "recorder";

/// Message used for successful state transitions.
pub const SUCCESS_MESSAGE: &str = "success";
