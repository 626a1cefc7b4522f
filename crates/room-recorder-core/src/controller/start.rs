use crate::{
    CoreResult, RecorderError,
    controller::{SessionController, close::JobHooks},
    protocol::TaskRequest,
    registry::{ActiveJob, RegistryKey},
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tracing::{error, info, instrument};
use uuid::Uuid;

impl SessionController {
    /// Launch the capture for a start request.
    ///
    /// The job is stored and counted before the capture is launched so that a
    /// capture failing immediately still finds its entry to clean up, and its
    /// close balances the counter.
    ///
    /// # Errors
    ///
    /// * [`RecorderError::DuplicateInProgress`] if the key is already active.
    /// * [`RecorderError::CaptureLaunch`] if the capture failed to start; the
    ///   close path has already run.
    /// * [`RecorderError::Progress`] if the counter update failed; the job
    ///   keeps running.
    #[instrument(
        skip(self, req),
        fields(room_table_id = req.room_table_id, room_id = %req.room_id, task = %req.task())
    )]
    pub async fn handle_start_task(&self, req: TaskRequest) -> CoreResult<()> {
        let key = RegistryKey::for_request(&req);
        if !key.kind.is_start() {
            return Err(RecorderError::UnsupportedTask {
                task: key.kind.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.inner.registry.load(&key).is_some() {
            return Err(RecorderError::DuplicateInProgress {
                key,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!(room_sid = %req.room_sid, "Received new start task");

        let request = Arc::new(req);
        let job_id = Uuid::new_v4();
        let hooks = Arc::new(JobHooks {
            controller: Arc::downgrade(&self.inner),
            job_id,
            request: Arc::clone(&request),
        });
        let capture = self.inner.factory.create(Arc::clone(&request), hooks)?;

        let job = ActiveJob {
            id: job_id,
            request,
            capture: Arc::clone(&capture),
        };
        if !self.inner.registry.store_if_vacant(key, job) {
            return Err(RecorderError::DuplicateInProgress {
                key,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let counted = self.inner.progress.update(true).await;

        if let Err(e) = capture.start().await {
            error!(error = %e, "Capture failed to start");
            if let Err(progress) = &counted {
                error!(error = %progress, "Failed to increment progress counter");
            }
            let reason = match &e {
                RecorderError::CaptureLaunch { reason, .. } => reason.clone(),
                other => other.to_string(),
            };
            capture.close(Some(reason)).await;
            return Err(e);
        }

        counted
    }
}
