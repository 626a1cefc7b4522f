use crate::{
    AppError, AppResult,
    config::Config,
    ingest::{IngestState, router},
};

use room_recorder_core::{
    AtomicProgress, HttpNotifier, PostProcessor, ProcessCaptureFactory, SessionController,
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

/// The wired recorder: controller plus ingest server.
pub struct App {
    /// Validated configuration.
    pub config: Config,
}

impl App {
    /// Build the controller from the configuration.
    #[track_caller]
    pub fn controller(&self) -> AppResult<SessionController> {
        let config = &self.config;

        let notifier = Arc::new(HttpNotifier::new(
            config.coordinator.endpoint(),
            config.coordinator.retry_policy(),
        )?);
        let post_processor = PostProcessor::new(config.post_process_settings(), notifier.clone());
        let factory = ProcessCaptureFactory::new(
            config.capture.settings(&config.recorder.storage_root),
        );

        Ok(SessionController::new(
            Arc::new(factory),
            Arc::new(AtomicProgress::new()),
            notifier,
            post_processor,
        ))
    }

    /// Serve tasks until SIGINT/SIGTERM, then close every active job.
    #[instrument(skip(self))]
    pub async fn run(self) -> AppResult<()> {
        let controller = self.controller()?;
        let state = IngestState {
            controller: controller.clone(),
            api_key: Arc::from(self.config.coordinator.api_key.as_str()),
            api_secret: Arc::from(self.config.coordinator.api_secret.as_str()),
        };

        let addr = self.config.server.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::ServerError {
                reason: format!("Failed to bind {}: {}", addr, e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        info!(
            addr = %addr,
            storage_root = ?self.config.recorder.storage_root,
            "Recorder listening"
        );

        let closing = controller.clone();
        axum::serve(listener, router(state))
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                info!(active_jobs = closing.active_jobs(), "Shutting down, closing active jobs");
                closing.close_all().await;
            })
            .await
            .map_err(|e| AppError::ServerError {
                reason: format!("Server failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        // Jobs started while the first pass ran.
        controller.close_all().await;
        info!("Shutdown complete");

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
