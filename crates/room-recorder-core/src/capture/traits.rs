use crate::{CoreResult, protocol::TaskRequest};

use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;

/// Location of the raw file a recording capture writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Directory holding the file.
    pub dir: PathBuf,
    /// File name inside `dir`.
    pub file_name: String,
}

impl OutputFile {
    /// Full path of the file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// What a capture reports when it terminates.
#[derive(Debug, Clone, Default)]
pub struct CaptureClosed {
    /// Raw output written by the capture; `None` for relays.
    pub output: Option<OutputFile>,
    /// Error text when the capture failed or was closed with an error.
    pub error: Option<String>,
}

/// A running (or about to run) capture engine for one job.
#[async_trait]
pub trait CaptureProcess: Send + Sync {
    /// Launch the capture. Returns once the engine accepted the launch.
    async fn start(&self) -> CoreResult<()>;

    /// Stop the capture, optionally recording why.
    ///
    /// Idempotent. Returns after the close hook has run.
    async fn close(&self, error: Option<String>);
}

/// Callbacks a capture invokes on the job that owns it.
#[async_trait]
pub trait CaptureHooks: Send + Sync {
    /// The capture confirmed it is producing output. Fired at most once.
    async fn on_started(&self);

    /// The capture terminated, for any reason. Fired exactly once.
    async fn on_closed(&self, closed: CaptureClosed);
}

/// Builds captures for incoming start requests.
pub trait CaptureFactory: Send + Sync {
    /// Create, without launching, the capture for `request`.
    fn create(
        &self,
        request: Arc<TaskRequest>,
        hooks: Arc<dyn CaptureHooks>,
    ) -> CoreResult<Arc<dyn CaptureProcess>>;
}
