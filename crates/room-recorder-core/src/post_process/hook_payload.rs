use crate::protocol::TaskRequest;

use serde::Serialize;

/// JSON argument passed to post-processing hook scripts.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HookPayload {
    /// Recording identifier.
    pub recording_id: String,
    /// Room table identifier.
    pub room_table_id: i64,
    /// Room identifier.
    pub room_id: String,
    /// Room session identifier.
    pub room_sid: String,
    /// Final file name.
    pub file_name: String,
    /// Full path of the final file.
    pub file_path: String,
    /// Size in megabytes, not truncated.
    pub file_size: f32,
    /// Recorder identifier.
    pub recorder_id: String,
}

impl HookPayload {
    /// Payload describing `file_name` at `file_path` for `req`.
    pub fn new(req: &TaskRequest, file_name: &str, file_path: String, file_size: f32) -> Self {
        Self {
            recording_id: req.recording_id.clone(),
            room_table_id: req.room_table_id,
            room_id: req.room_id.clone(),
            room_sid: req.room_sid.clone(),
            file_name: file_name.to_string(),
            file_path,
            file_size,
            recorder_id: req.recorder_id.clone(),
        }
    }
}
