//! Fakes and helpers shared by the core tests.

use crate::{
    CaptureClosed, CaptureFactory, CaptureHooks, CaptureProcess, CoreResult, JobKind,
    OutputFile, PostProcessSettings, PostProcessor, ProgressCounter, RecorderError,
    SessionController, StatusReporter, TaskRequest, TaskResponse,
};

use std::{
    net::SocketAddr,
    panic::Location,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use error_location::ErrorLocation;
use parking_lot::Mutex;

pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(10);
pub(crate) const POLL_ATTEMPTS: usize = 300;

/// Poll `condition` until it holds or roughly three seconds pass.
pub(crate) async fn eventually<F: Fn() -> bool>(condition: F) -> bool {
    for _ in 0..POLL_ATTEMPTS {
        if condition() {
            return true;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
    condition()
}

pub(crate) fn request(room_table_id: i64, kind: JobKind) -> TaskRequest {
    let mut req = TaskRequest {
        room_table_id,
        room_id: "room1".to_string(),
        room_sid: "sid-1".to_string(),
        task: 0,
        recording_id: "rec-1".to_string(),
        recorder_id: "recorder-a".to_string(),
    };
    req.set_task(kind);
    req
}

/// Collects every report instead of sending it.
#[derive(Default)]
pub(crate) struct RecordingReporter {
    pub(crate) responses: Mutex<Vec<TaskResponse>>,
}

impl RecordingReporter {
    pub(crate) fn of_kind(&self, kind: JobKind) -> Vec<TaskResponse> {
        self.responses
            .lock()
            .iter()
            .filter(|r| r.task() == kind)
            .cloned()
            .collect()
    }

    pub(crate) fn all(&self) -> Vec<TaskResponse> {
        self.responses.lock().clone()
    }
}

#[async_trait]
impl StatusReporter for RecordingReporter {
    async fn report(&self, response: &TaskResponse) -> CoreResult<u16> {
        self.responses.lock().push(response.clone());
        Ok(200)
    }
}

/// Hooks that ignore every callback.
pub(crate) struct NoHooks;

#[async_trait]
impl CaptureHooks for NoHooks {
    async fn on_started(&self) {}

    async fn on_closed(&self, _closed: CaptureClosed) {}
}

/// Capture that does nothing but honor the hook contract.
pub(crate) struct FakeCapture {
    pub(crate) request: Arc<TaskRequest>,
    hooks: Arc<dyn CaptureHooks>,
    output: Option<OutputFile>,
    fail_start: bool,
    crash_on_start: bool,
    closed: AtomicBool,
    pub(crate) close_calls: AtomicUsize,
}

impl FakeCapture {
    pub(crate) async fn trigger_started(&self) {
        self.hooks.on_started().await;
    }

    /// Simulate the engine dying on its own.
    pub(crate) async fn crash(&self, reason: &str) {
        self.finish(Some(reason.to_string())).await;
    }

    async fn finish(&self, error: Option<String>) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.hooks
            .on_closed(CaptureClosed {
                output: self.output.clone(),
                error,
            })
            .await;
    }
}

#[async_trait]
impl CaptureProcess for FakeCapture {
    async fn start(&self) -> CoreResult<()> {
        if self.fail_start {
            return Err(RecorderError::CaptureLaunch {
                reason: "engine unavailable".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        if self.crash_on_start {
            self.finish(Some("engine exited during startup".to_string()))
                .await;
        }
        Ok(())
    }

    async fn close(&self, error: Option<String>) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.finish(error).await;
    }
}

/// Builds [`FakeCapture`]s and remembers them.
#[derive(Default)]
pub(crate) struct FakeFactory {
    pub(crate) fail_start: bool,
    /// Captures report their close from inside `start`, then return success.
    pub(crate) crash_on_start: bool,
    /// Directory recordings claim to write into; `None` means no output.
    pub(crate) output_dir: Option<PathBuf>,
    pub(crate) created: Mutex<Vec<Arc<FakeCapture>>>,
}

impl FakeFactory {
    pub(crate) fn capture(&self, index: usize) -> Option<Arc<FakeCapture>> {
        self.created.lock().get(index).cloned()
    }

    pub(crate) fn created_count(&self) -> usize {
        self.created.lock().len()
    }

    pub(crate) fn total_close_calls(&self) -> usize {
        self.created
            .lock()
            .iter()
            .map(|c| c.close_calls.load(Ordering::SeqCst))
            .sum()
    }
}

impl CaptureFactory for FakeFactory {
    fn create(
        &self,
        request: Arc<TaskRequest>,
        hooks: Arc<dyn CaptureHooks>,
    ) -> CoreResult<Arc<dyn CaptureProcess>> {
        let output = match (request.task(), &self.output_dir) {
            (JobKind::StartRecording, Some(dir)) => Some(OutputFile {
                dir: dir.clone(),
                file_name: format!("{}_raw.mkv", request.recording_id),
            }),
            _ => None,
        };
        let capture = Arc::new(FakeCapture {
            request,
            hooks,
            output,
            fail_start: self.fail_start,
            crash_on_start: self.crash_on_start,
            closed: AtomicBool::new(false),
            close_calls: AtomicUsize::new(0),
        });
        self.created.lock().push(Arc::clone(&capture));
        Ok(capture)
    }
}

/// Counter whose increments always fail.
#[derive(Default)]
pub(crate) struct FailingProgress;

#[async_trait]
impl ProgressCounter for FailingProgress {
    async fn update(&self, increment: bool) -> CoreResult<()> {
        if increment {
            return Err(RecorderError::Progress {
                reason: "message bus unavailable".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    fn current(&self) -> u64 {
        0
    }
}

pub(crate) fn post_settings(storage_root: &Path) -> PostProcessSettings {
    PostProcessSettings {
        storage_root: storage_root.to_path_buf(),
        convert_to_mp4: false,
        encoder_program: "ffmpeg".to_string(),
        pre_input: String::new(),
        post_input: String::new(),
        hook_scripts: Vec::new(),
    }
}

pub(crate) fn controller(
    factory: Arc<dyn CaptureFactory>,
    progress: Arc<dyn ProgressCounter>,
    reporter: Arc<RecordingReporter>,
    storage_root: &Path,
) -> SessionController {
    let post_processor = PostProcessor::new(post_settings(storage_root), reporter.clone());
    SessionController::new(factory, progress, reporter, post_processor)
}

/// One notification as seen by [`CoordinatorStub`].
#[derive(Debug, Clone)]
pub(crate) struct ReceivedNotification {
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
}

#[derive(Clone)]
struct StubState {
    statuses: Arc<Vec<u16>>,
    received: Arc<Mutex<Vec<ReceivedNotification>>>,
}

/// In-process coordinator answering with a scripted sequence of statuses,
/// then 200 for every later request.
pub(crate) struct CoordinatorStub {
    pub(crate) addr: SocketAddr,
    pub(crate) received: Arc<Mutex<Vec<ReceivedNotification>>>,
}

impl CoordinatorStub {
    pub(crate) fn host(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub(crate) fn hits(&self) -> usize {
        self.received.lock().len()
    }
}

#[allow(clippy::unwrap_used)]
pub(crate) async fn spawn_coordinator(statuses: Vec<u16>) -> CoordinatorStub {
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        statuses: Arc::new(statuses),
        received: Arc::clone(&received),
    };
    let app = Router::new()
        .route(crate::NOTIFY_PATH, post(stub_notify))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    CoordinatorStub { addr, received }
}

async fn stub_notify(
    State(state): State<StubState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let index = {
        let mut received = state.received.lock();
        received.push(ReceivedNotification { headers, body });
        received.len() - 1
    };
    let code = state.statuses.get(index).copied().unwrap_or(200);
    StatusCode::from_u16(code).unwrap_or(StatusCode::OK)
}
