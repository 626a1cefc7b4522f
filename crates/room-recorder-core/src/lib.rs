//! Room Recorder Core Library
//!
//! Control plane for per-room recording and RTMP relay jobs: a concurrent
//! task registry with its start/stop/close state machine, a post-processing
//! pipeline for finished recordings, and signed status reporting to the
//! upstream coordinator.
//!
//! # Example
//!
//! ```no_run
//! use room_recorder_core::{
//!     AtomicProgress, CaptureSettings, CoordinatorEndpoint, CoreResult, HttpNotifier, JobKind,
//!     PostProcessSettings, PostProcessor, ProcessCaptureFactory, RetryPolicy, SessionController,
//!     TaskRequest,
//! };
//!
//! use std::{path::PathBuf, sync::Arc, time::Duration};
//!
//! async fn run() -> CoreResult<()> {
//!     let notifier = Arc::new(HttpNotifier::new(
//!         CoordinatorEndpoint {
//!             host: "http://localhost:8080".to_string(),
//!             api_key: "key".to_string(),
//!             api_secret: "secret".to_string(),
//!         },
//!         RetryPolicy::default(),
//!     )?);
//!     let storage_root = PathBuf::from("recordings");
//!     let post_processor = PostProcessor::new(
//!         PostProcessSettings {
//!             storage_root: storage_root.clone(),
//!             convert_to_mp4: false,
//!             encoder_program: "ffmpeg".to_string(),
//!             pre_input: String::new(),
//!             post_input: String::new(),
//!             hook_scripts: Vec::new(),
//!         },
//!         notifier.clone(),
//!     );
//!     let factory = ProcessCaptureFactory::new(CaptureSettings {
//!         program: "ffmpeg".to_string(),
//!         recording_args: vec!["-i".into(), "rtmp://media/{room_id}".into(), "{output}".into()],
//!         rtmp_args: Vec::new(),
//!         raw_extension: "mkv".to_string(),
//!         stop_input: Some("q".to_string()),
//!         storage_root,
//!         startup_poll: Duration::from_millis(500),
//!     });
//!     let controller = SessionController::new(
//!         Arc::new(factory),
//!         Arc::new(AtomicProgress::new()),
//!         notifier,
//!         post_processor,
//!     );
//!
//!     let mut request = TaskRequest {
//!         room_table_id: 42,
//!         room_id: "room1".to_string(),
//!         recording_id: "rec-1".to_string(),
//!         ..Default::default()
//!     };
//!     request.set_task(JobKind::StartRecording);
//!     controller.handle_task(request).await?;
//!
//!     controller.close_all().await;
//!     Ok(())
//! }
//! ```

mod capture;
mod controller;
mod error;
mod notify;
mod post_process;
mod progress;
mod protocol;
mod registry;

pub use {
    capture::{
        CaptureClosed, CaptureFactory, CaptureHooks, CaptureProcess, CaptureSettings, OutputFile,
        ProcessCapture, ProcessCaptureFactory, expand_template,
    },
    controller::{SessionController, TaskOutcome},
    error::{RecorderError, Result as CoreResult},
    notify::{
        CoordinatorEndpoint, HttpNotifier, NOTIFY_PATH, RetryPolicy, StatusReporter, sign, verify,
    },
    post_process::{
        BYTES_PER_MB, FinalArtifact, HookPayload, PostProcessSettings, PostProcessor,
        relative_to_root, strip_literal_prefix, truncate_two_decimals,
    },
    progress::{AtomicProgress, ProgressCounter},
    protocol::{JobKind, RESPONSE_ORIGIN, SUCCESS_MESSAGE, TaskRequest, TaskResponse},
    registry::{ActiveJob, RegistryKey, TaskRegistry},
};

#[cfg(test)]
mod tests;
