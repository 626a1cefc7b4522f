use crate::{controller::SessionController, protocol::TaskRequest, registry::RegistryKey};

use tracing::{error, info, instrument};

impl SessionController {
    /// Stop every job a stop request targets.
    ///
    /// Each found job is removed from the registry and closed on its own task,
    /// which is not awaited here but is tracked so that
    /// [`close_all`](SessionController::close_all) waits for it. Returns
    /// whether any job was found; a `Stop` request does not say which kinds
    /// were running.
    #[instrument(
        skip(self, req),
        fields(room_table_id = req.room_table_id, room_id = %req.room_id, task = %req.task())
    )]
    pub async fn handle_stop_task(&self, req: &TaskRequest) -> bool {
        info!(room_sid = %req.room_sid, "Received new stop task");

        let mut found = false;
        let mut closing = self.inner.closing.lock();
        while let Some(result) = closing.try_join_next() {
            if let Err(e) = result {
                error!(error = ?e, "Close task failed");
            }
        }

        for target in req.task().stop_targets() {
            let key = RegistryKey::new(req.room_table_id, *target);
            if let Some(job) = self.inner.registry.load_and_delete(&key) {
                // Closing flushes the encoder; the caller must not wait for it.
                closing.spawn(async move { job.capture.close(None).await });
                found = true;
            }
        }

        found
    }
}
