use crate::protocol::{JobKind, RESPONSE_ORIGIN, SUCCESS_MESSAGE, TaskRequest};

/// Status report sent to the upstream coordinator.
#[derive(Clone, PartialEq, prost::Message)]
pub struct TaskResponse {
    /// Origin tag, always [`RESPONSE_ORIGIN`] for this service.
    #[prost(string, tag = "1")]
    pub from: String,
    /// Whether the reported transition succeeded.
    #[prost(bool, tag = "2")]
    pub status: bool,
    /// Human-readable detail; the error text on failure.
    #[prost(string, tag = "3")]
    pub msg: String,
    /// Reported [`JobKind`], as its wire value.
    #[prost(enumeration = "JobKind", tag = "4")]
    pub task: i32,
    /// Recording identifier copied from the request.
    #[prost(string, tag = "5")]
    pub recording_id: String,
    /// Recorder identifier copied from the request.
    #[prost(string, tag = "6")]
    pub recorder_id: String,
    /// Room table identifier copied from the request.
    #[prost(int64, tag = "7")]
    pub room_table_id: i64,
    /// Final artifact path relative to the storage root.
    #[prost(string, tag = "8")]
    pub file_path: String,
    /// Final artifact size in megabytes, two decimals.
    #[prost(float, tag = "9")]
    pub file_size: f32,
}

impl TaskResponse {
    fn for_request(req: &TaskRequest, task: JobKind, status: bool, msg: String) -> Self {
        Self {
            from: RESPONSE_ORIGIN.to_string(),
            status,
            msg,
            task: task as i32,
            recording_id: req.recording_id.clone(),
            recorder_id: req.recorder_id.clone(),
            room_table_id: req.room_table_id,
            file_path: String::new(),
            file_size: 0.0,
        }
    }

    /// Report that the capture for `req` is running; kind unchanged.
    pub fn started(req: &TaskRequest) -> Self {
        Self::for_request(req, req.task(), true, SUCCESS_MESSAGE.to_string())
    }

    /// Report that the job for `req` terminated, with its error if any.
    pub fn ended(req: &TaskRequest, error: Option<&str>) -> Self {
        let end_kind = req.task().end_kind();
        match error {
            Some(reason) => Self::for_request(req, end_kind, false, reason.to_string()),
            None => Self::for_request(req, end_kind, true, SUCCESS_MESSAGE.to_string()),
        }
    }

    /// Report a finalized recording artifact.
    pub fn proceeded(req: &TaskRequest, file_path: String, file_size: f32) -> Self {
        Self {
            file_path,
            file_size,
            ..Self::for_request(
                req,
                JobKind::RecordingProceeded,
                true,
                SUCCESS_MESSAGE.to_string(),
            )
        }
    }

    /// Synchronous reply to a command, echoing the request's kind.
    pub fn reply(req: &TaskRequest, status: bool, msg: impl Into<String>) -> Self {
        Self::for_request(req, req.task(), status, msg.into())
    }
}
