//! Capture engine backed by an external program.
//!
//! The child is supervised by one task per job. That task reports
//! `on_started` once the raw file has content, and `on_closed` exactly once
//! when the child exits, whether it was asked to stop or not.

use crate::{
    CoreResult, RecorderError,
    capture::{
        CaptureClosed, CaptureFactory, CaptureHooks, CaptureProcess, CaptureSettings, OutputFile,
        expand_template, path_component,
    },
    protocol::{JobKind, TaskRequest},
};

use std::{
    panic::Location,
    process::Stdio,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use error_location::ErrorLocation;
use parking_lot::Mutex;
use tokio::{
    io::AsyncWriteExt,
    process::{Child, Command},
    sync::{Notify, watch},
};
use tracing::{debug, info, instrument, warn};

/// Creates a [`ProcessCapture`] per start request.
#[derive(Debug, Clone)]
pub struct ProcessCaptureFactory {
    settings: Arc<CaptureSettings>,
}

impl ProcessCaptureFactory {
    /// Factory launching `settings.program` for every job.
    pub fn new(settings: CaptureSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }
}

impl CaptureFactory for ProcessCaptureFactory {
    #[track_caller]
    fn create(
        &self,
        request: Arc<TaskRequest>,
        hooks: Arc<dyn CaptureHooks>,
    ) -> CoreResult<Arc<dyn CaptureProcess>> {
        let (templates, output) = match request.task() {
            JobKind::StartRecording => {
                let output = OutputFile {
                    dir: self
                        .settings
                        .storage_root
                        .join(path_component(&request.room_id)),
                    file_name: format!(
                        "{}_raw.{}",
                        path_component(&request.recording_id),
                        self.settings.raw_extension
                    ),
                };
                (&self.settings.recording_args, Some(output))
            }
            JobKind::StartRtmp => (&self.settings.rtmp_args, None),
            other => {
                return Err(RecorderError::UnsupportedTask {
                    task: other.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let output_arg = output
            .as_ref()
            .map(|o| o.path().to_string_lossy().into_owned())
            .unwrap_or_default();
        let args = templates
            .iter()
            .map(|t| expand_template(t, &request, &output_arg))
            .collect();

        Ok(Arc::new(ProcessCapture {
            inner: Arc::new(CaptureInner {
                request,
                program: self.settings.program.clone(),
                args,
                stop_input: self.settings.stop_input.clone(),
                startup_poll: self.settings.startup_poll,
                output,
                hooks,
                running: AtomicBool::new(false),
                close_requested: AtomicBool::new(false),
                finished: AtomicBool::new(false),
                close_error: Mutex::new(None),
                stop: Notify::new(),
                done: watch::Sender::new(false),
            }),
        }))
    }
}

/// One external capture program and its supervisor.
pub struct ProcessCapture {
    inner: Arc<CaptureInner>,
}

struct CaptureInner {
    request: Arc<TaskRequest>,
    program: String,
    args: Vec<String>,
    stop_input: Option<String>,
    startup_poll: Duration,
    output: Option<OutputFile>,
    hooks: Arc<dyn CaptureHooks>,
    running: AtomicBool,
    close_requested: AtomicBool,
    finished: AtomicBool,
    close_error: Mutex<Option<String>>,
    stop: Notify,
    done: watch::Sender<bool>,
}

#[async_trait]
impl CaptureProcess for ProcessCapture {
    #[instrument(
        skip(self),
        fields(
            room_table_id = self.inner.request.room_table_id,
            task = %self.inner.request.task()
        )
    )]
    async fn start(&self) -> CoreResult<()> {
        let inner = &self.inner;

        if let Some(output) = &inner.output {
            tokio::fs::create_dir_all(&output.dir)
                .await
                .map_err(|e| RecorderError::CaptureLaunch {
                    reason: format!("Failed to create {:?}: {}", output.dir, e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        }

        let stdin = if inner.stop_input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        };

        let child = Command::new(&inner.program)
            .args(&inner.args)
            .stdin(stdin)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RecorderError::CaptureLaunch {
                reason: format!("Failed to spawn {}: {}", inner.program, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        inner.running.store(true, Ordering::SeqCst);
        info!(pid = ?child.id(), program = %inner.program, "Capture process launched");

        let supervisor = Arc::clone(inner);
        tokio::spawn(async move { supervisor.supervise(child).await });

        Ok(())
    }

    #[instrument(
        skip(self),
        fields(
            room_table_id = self.inner.request.room_table_id,
            task = %self.inner.request.task()
        )
    )]
    async fn close(&self, error: Option<String>) {
        let inner = &self.inner;

        if !inner.close_requested.swap(true, Ordering::SeqCst) {
            if let Some(reason) = error {
                *inner.close_error.lock() = Some(reason);
            }
            inner.stop.notify_one();

            if !inner.running.load(Ordering::SeqCst) {
                let error = inner.close_error.lock().take();
                inner.finish(error).await;
            }
        }

        let mut done = inner.done.subscribe();
        let _ = done.wait_for(|finished| *finished).await;
    }
}

impl CaptureInner {
    async fn supervise(self: Arc<Self>, mut child: Child) {
        let mut ticker = tokio::time::interval(self.startup_poll);
        let mut started = false;

        let exit_error = loop {
            tokio::select! {
                status = child.wait() => {
                    break match status {
                        Ok(status) if status.success() => None,
                        Ok(status) => Some(format!("capture process exited with {}", status)),
                        Err(e) => Some(format!("failed to wait for capture process: {}", e)),
                    };
                }
                _ = self.stop.notified() => {
                    self.stop_child(&mut child).await;
                    break None;
                }
                _ = ticker.tick(), if !started => {
                    if self.output_ready().await {
                        started = true;
                        let hooks = Arc::clone(&self.hooks);
                        tokio::spawn(async move { hooks.on_started().await });
                    }
                }
            }
        };

        if let Some(reason) = &exit_error {
            warn!(reason = %reason, "Capture process terminated unexpectedly");
        }

        let requested = self.close_error.lock().take();
        self.finish(requested.or(exit_error)).await;
    }

    async fn stop_child(&self, child: &mut Child) {
        match (&self.stop_input, child.stdin.take()) {
            (Some(input), Some(mut stdin)) => {
                if let Err(e) = stdin.write_all(input.as_bytes()).await {
                    warn!(error = %e, "Failed to send stop input, killing capture process");
                    let _ = child.start_kill();
                }
            }
            _ => {
                if let Err(e) = child.start_kill() {
                    warn!(error = %e, "Failed to kill capture process");
                }
            }
        }

        match child.wait().await {
            Ok(status) => debug!(%status, "Capture process stopped"),
            Err(e) => warn!(error = %e, "Failed to wait for capture process"),
        }
    }

    async fn output_ready(&self) -> bool {
        match &self.output {
            None => true,
            Some(output) => tokio::fs::metadata(output.path())
                .await
                .map(|meta| meta.len() > 0)
                .unwrap_or(false),
        }
    }

    async fn finish(&self, error: Option<String>) {
        if self.finished.swap(true, Ordering::SeqCst) {
            return;
        }

        self.hooks
            .on_closed(CaptureClosed {
                output: self.output.clone(),
                error,
            })
            .await;

        self.done.send_replace(true);
    }
}
