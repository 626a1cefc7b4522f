use crate::controller::SessionController;

use tokio::task::JoinSet;
use tracing::{error, info, instrument};

impl SessionController {
    /// Close every active job and wait until each close has finished.
    ///
    /// Closes already started by stop requests are awaited too. Called once on
    /// termination, before the process exits, so recordings are finalized
    /// instead of truncated.
    #[instrument(skip(self))]
    pub async fn close_all(&self) {
        let jobs = self.inner.registry.snapshot();
        info!(count = jobs.len(), "Closing all active jobs");

        let mut closing = JoinSet::new();
        for job in jobs {
            closing.spawn(async move { job.capture.close(None).await });
        }
        drain(&mut closing).await;

        loop {
            let mut stopping = std::mem::take(&mut *self.inner.closing.lock());
            if stopping.is_empty() {
                break;
            }
            info!(count = stopping.len(), "Waiting for stopped jobs to finish closing");
            drain(&mut stopping).await;
        }

        info!("All active jobs closed");
    }
}

async fn drain(closing: &mut JoinSet<()>) {
    while let Some(result) = closing.join_next().await {
        if let Err(e) = result {
            error!(error = ?e, "Close task failed");
        }
    }
}
