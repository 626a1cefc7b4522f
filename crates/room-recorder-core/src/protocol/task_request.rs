use crate::protocol::JobKind;

/// Command received for one logical job instance.
#[derive(Clone, PartialEq, prost::Message)]
pub struct TaskRequest {
    /// Numeric room identifier; half of the registry key.
    #[prost(int64, tag = "1")]
    pub room_table_id: i64,
    /// Public room identifier.
    #[prost(string, tag = "2")]
    pub room_id: String,
    /// Identifier of the room's current session.
    #[prost(string, tag = "3")]
    pub room_sid: String,
    /// Requested [`JobKind`], as its wire value.
    #[prost(enumeration = "JobKind", tag = "4")]
    pub task: i32,
    /// Recording identifier; names the final artifact.
    #[prost(string, tag = "5")]
    pub recording_id: String,
    /// Identifier of the recorder instance handling the job.
    #[prost(string, tag = "6")]
    pub recorder_id: String,
}
