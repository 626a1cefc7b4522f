//! Orchestrates start and stop requests against the task registry.
//!
//! The controller owns its registry; several controllers in one process never
//! share job state.

use crate::{
    CoreResult, RecorderError,
    capture::CaptureFactory,
    notify::StatusReporter,
    post_process::PostProcessor,
    progress::ProgressCounter,
    protocol::{JobKind, TaskRequest},
    registry::TaskRegistry,
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use parking_lot::Mutex;
use tokio::task::JoinSet;

/// Result of a successfully dispatched command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// A capture was launched.
    Started,
    /// A stop was processed; `found` is false when nothing was running.
    Stopped {
        /// Whether any targeted job was active.
        found: bool,
    },
}

/// Recording session controller. Cheap to clone.
#[derive(Clone)]
pub struct SessionController {
    pub(crate) inner: Arc<ControllerInner>,
}

pub(crate) struct ControllerInner {
    pub(crate) registry: TaskRegistry,
    pub(crate) factory: Arc<dyn CaptureFactory>,
    pub(crate) progress: Arc<dyn ProgressCounter>,
    pub(crate) reporter: Arc<dyn StatusReporter>,
    pub(crate) post_processor: PostProcessor,
    /// Closes started by stop requests; their jobs are no longer registered.
    pub(crate) closing: Mutex<JoinSet<()>>,
}

impl SessionController {
    /// Controller with an empty registry.
    pub fn new(
        factory: Arc<dyn CaptureFactory>,
        progress: Arc<dyn ProgressCounter>,
        reporter: Arc<dyn StatusReporter>,
        post_processor: PostProcessor,
    ) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                registry: TaskRegistry::new(),
                factory,
                progress,
                reporter,
                post_processor,
                closing: Mutex::new(JoinSet::new()),
            }),
        }
    }

    /// Route a command to the start or stop protocol.
    ///
    /// Kinds that are reports rather than commands, and unknown wire values,
    /// are rejected with [`RecorderError::UnsupportedTask`].
    pub async fn handle_task(&self, req: TaskRequest) -> CoreResult<TaskOutcome> {
        let kind = JobKind::try_from(req.task).map_err(|_| RecorderError::UnsupportedTask {
            task: req.task.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if kind.is_start() {
            self.handle_start_task(req).await?;
            Ok(TaskOutcome::Started)
        } else if !kind.stop_targets().is_empty() {
            Ok(TaskOutcome::Stopped {
                found: self.handle_stop_task(&req).await,
            })
        } else {
            Err(RecorderError::UnsupportedTask {
                task: kind.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }

    /// The registry of active jobs.
    pub fn registry(&self) -> &TaskRegistry {
        &self.inner.registry
    }

    /// Number of jobs in the registry.
    pub fn active_jobs(&self) -> usize {
        self.inner.registry.len()
    }

    /// Current value of the progress counter.
    pub fn in_progress(&self) -> u64 {
        self.inner.progress.current()
    }
}
