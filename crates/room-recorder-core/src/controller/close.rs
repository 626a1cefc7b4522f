//! Completion handling for a single job.

use crate::{
    capture::{CaptureClosed, CaptureHooks},
    controller::session_controller::ControllerInner,
    protocol::{JobKind, TaskRequest, TaskResponse},
    registry::RegistryKey,
};

use std::{
    io::ErrorKind,
    sync::{Arc, Weak},
};

use async_trait::async_trait;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Hooks handed to one job's capture. Holds the controller weakly.
pub(crate) struct JobHooks {
    pub(crate) controller: Weak<ControllerInner>,
    pub(crate) job_id: Uuid,
    pub(crate) request: Arc<TaskRequest>,
}

#[async_trait]
impl CaptureHooks for JobHooks {
    async fn on_started(&self) {
        if let Some(controller) = self.controller.upgrade() {
            controller.on_started(&self.request).await;
        }
    }

    async fn on_closed(&self, closed: CaptureClosed) {
        match self.controller.upgrade() {
            Some(controller) => controller.on_closed(self.job_id, &self.request, closed).await,
            None => debug!(job_id = %self.job_id, "Controller dropped before capture closed"),
        }
    }
}

impl ControllerInner {
    #[instrument(skip(self, req), fields(room_table_id = req.room_table_id, task = %req.task()))]
    async fn on_started(&self, req: &TaskRequest) {
        info!(room_id = %req.room_id, "Capture started");

        let response = TaskResponse::started(req);
        if let Err(e) = self.reporter.report(&response).await {
            error!(error = %e, "Failed to report started job");
        }
    }

    #[instrument(
        skip(self, req, closed),
        fields(room_table_id = req.room_table_id, task = %req.task())
    )]
    async fn on_closed(&self, job_id: Uuid, req: &Arc<TaskRequest>, closed: CaptureClosed) {
        info!(room_id = %req.room_id, error = ?closed.error, "Capture closed");

        // Covers crashes; a stop request has usually removed the entry already.
        self.registry.delete_job(&RegistryKey::for_request(req), job_id);

        if let Err(e) = self.progress.update(false).await {
            error!(error = %e, "Failed to decrement progress counter");
        }

        let response = TaskResponse::ended(req, closed.error.as_deref());
        if let Err(e) = self.reporter.report(&response).await {
            error!(error = %e, "Failed to report ended job");
        }

        if req.task() != JobKind::StartRecording {
            return;
        }
        let Some(output) = closed.output else {
            return;
        };

        let path = output.path();
        match tokio::fs::metadata(&path).await {
            Err(e) => {
                // A failed capture usually never wrote its file.
                if !(e.kind() == ErrorKind::NotFound && closed.error.is_some()) {
                    error!(path = ?path, error = %e, "Failed to inspect recording output");
                }
            }
            Ok(metadata) if metadata.len() == 0 => {
                error!(path = ?path, "Skipping post-processing of empty recording");
            }
            Ok(_) => {
                let post_processor = self.post_processor.clone();
                let req = Arc::clone(req);
                tokio::spawn(async move {
                    post_processor
                        .run(&req, &output.dir, &output.file_name)
                        .await;
                });
            }
        }
    }
}
