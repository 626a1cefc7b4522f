use crate::protocol::{JobKind, TaskRequest};

use std::fmt;

/// Addresses one active job: a room and the kind that started the job.
///
/// Two requests collide iff both fields match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistryKey {
    /// Room table identifier.
    pub room_table_id: i64,
    /// Start kind of the addressed job.
    pub kind: JobKind,
}

impl RegistryKey {
    /// Key for a room and job kind.
    pub fn new(room_table_id: i64, kind: JobKind) -> Self {
        Self {
            room_table_id,
            kind,
        }
    }

    /// Key of the job a start request would create.
    pub fn for_request(req: &TaskRequest) -> Self {
        Self::new(req.room_table_id, req.task())
    }
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.room_table_id, self.kind as i32)
    }
}
