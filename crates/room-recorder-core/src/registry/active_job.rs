use crate::{capture::CaptureProcess, protocol::TaskRequest};

use std::{fmt, sync::Arc};

use uuid::Uuid;

/// Registry value: the supervising handle of one running job.
///
/// Cloning is cheap; all clones refer to the same capture.
#[derive(Clone)]
pub struct ActiveJob {
    /// Unique id of this job instance. Distinguishes jobs that reuse a key.
    pub id: Uuid,
    /// Request that created the job.
    pub request: Arc<TaskRequest>,
    /// The capture process driving the job.
    pub capture: Arc<dyn CaptureProcess>,
}

impl fmt::Debug for ActiveJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveJob")
            .field("id", &self.id)
            .field("room_table_id", &self.request.room_table_id)
            .field("task", &self.request.task())
            .finish_non_exhaustive()
    }
}
