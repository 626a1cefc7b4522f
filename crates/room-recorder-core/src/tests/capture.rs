use crate::{
    CaptureClosed, CaptureFactory, CaptureHooks, CaptureSettings, JobKind, ProcessCaptureFactory,
    RecorderError, expand_template,
    tests::support::{eventually, request},
};

use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use parking_lot::Mutex;

/// Hooks that remember what the capture reported.
#[derive(Default)]
struct RecordedHooks {
    started: AtomicUsize,
    closed: Mutex<Vec<CaptureClosed>>,
}

impl RecordedHooks {
    fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    fn closed(&self) -> Vec<CaptureClosed> {
        self.closed.lock().clone()
    }
}

#[async_trait]
impl CaptureHooks for RecordedHooks {
    async fn on_started(&self) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    async fn on_closed(&self, closed: CaptureClosed) {
        self.closed.lock().push(closed);
    }
}

fn shell_settings(storage_root: &Path, script: &str, stop_input: Option<&str>) -> CaptureSettings {
    let args = vec![
        "-c".to_string(),
        script.to_string(),
        "sh".to_string(),
        "{output}".to_string(),
    ];
    CaptureSettings {
        program: "sh".to_string(),
        recording_args: args.clone(),
        rtmp_args: args,
        raw_extension: "mkv".to_string(),
        stop_input: stop_input.map(str::to_string),
        storage_root: storage_root.to_path_buf(),
        startup_poll: Duration::from_millis(10),
    }
}

/// WHAT: Placeholders are replaced with request fields
/// WHY: Capture arguments are configured as templates
#[test]
fn given_template_when_expanding_then_request_fields_substituted() {
    let req = request(42, JobKind::StartRecording);

    let expanded = expand_template(
        "rtmp://media/{room_id}/{room_sid}?t={room_table_id}&r={recording_id}&by={recorder_id} -> {output}",
        &req,
        "/data/out.mkv",
    );

    assert_eq!(
        expanded,
        "rtmp://media/room1/sid-1?t=42&r=rec-1&by=recorder-a -> /data/out.mkv"
    );
}

/// WHAT: Only start kinds produce captures
/// WHY: Stops and reports never launch an engine
#[test]
#[allow(clippy::unwrap_used)]
fn given_stop_request_when_creating_capture_then_unsupported_task() {
    let root = tempfile::tempdir().unwrap();
    let factory = ProcessCaptureFactory::new(shell_settings(root.path(), "true", None));

    let result = factory.create(
        Arc::new(request(42, JobKind::StopRecording)),
        Arc::new(RecordedHooks::default()),
    );

    assert!(matches!(result, Err(RecorderError::UnsupportedTask { .. })));
}

/// WHAT: A recording writes to the room directory, reports started, and closes cleanly
/// WHY: The close hook must see where the raw file is
#[cfg(unix)]
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_running_recording_when_closed_then_output_kept_and_closed_once() {
    // Given: A capture that writes its output and keeps running
    let root = tempfile::tempdir().unwrap();
    let factory = ProcessCaptureFactory::new(shell_settings(
        root.path(),
        "echo data > \"$1\"; sleep 30",
        None,
    ));
    let hooks = Arc::new(RecordedHooks::default());
    let capture = factory
        .create(Arc::new(request(42, JobKind::StartRecording)), hooks.clone())
        .unwrap();

    // When: Started and, once producing output, closed
    capture.start().await.unwrap();
    assert!(eventually(|| hooks.started() == 1).await);
    capture.close(None).await;

    // Then: Exactly one clean close naming the raw file
    let closed = hooks.closed();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].error, None);
    let output = closed[0].output.clone().unwrap();
    assert_eq!(output.dir, root.path().join("room1"));
    assert_eq!(output.file_name, "rec-1_raw.mkv");
    assert!(std::fs::metadata(output.path()).unwrap().len() > 0);

    // And closing again is a no-op
    capture.close(Some("late".to_string())).await;
    assert_eq!(hooks.closed().len(), 1);
    assert_eq!(hooks.started(), 1);
}

/// WHAT: A capture exiting on its own reports the failure
/// WHY: Unsolicited exits are how crashes reach the controller
#[cfg(unix)]
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_engine_exiting_with_error_when_supervised_then_closed_with_error() {
    let root = tempfile::tempdir().unwrap();
    let factory = ProcessCaptureFactory::new(shell_settings(root.path(), "exit 3", None));
    let hooks = Arc::new(RecordedHooks::default());
    let capture = factory
        .create(Arc::new(request(42, JobKind::StartRtmp)), hooks.clone())
        .unwrap();

    capture.start().await.unwrap();

    assert!(eventually(|| hooks.closed().len() == 1).await);
    let closed = hooks.closed();
    assert!(closed[0].output.is_none());
    assert!(closed[0].error.as_deref().unwrap().contains('3'));
}

/// WHAT: A program that cannot be spawned fails the launch
/// WHY: The controller must learn about it synchronously
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_missing_program_when_starting_then_launch_error_and_close_still_fires() {
    // Given
    let root = tempfile::tempdir().unwrap();
    let mut settings = shell_settings(root.path(), "true", None);
    settings.program = "/nonexistent/capture-engine".to_string();
    let factory = ProcessCaptureFactory::new(settings);
    let hooks = Arc::new(RecordedHooks::default());
    let capture = factory
        .create(Arc::new(request(42, JobKind::StartRecording)), hooks.clone())
        .unwrap();

    // When
    let result = capture.start().await;

    // Then
    assert!(matches!(result, Err(RecorderError::CaptureLaunch { .. })));
    capture.close(Some("spawn failed".to_string())).await;
    let closed = hooks.closed();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].error.as_deref(), Some("spawn failed"));
    assert_eq!(hooks.started(), 0);
}

/// WHAT: A configured stop input is written to the engine's stdin
/// WHY: Encoders finalize their container on a graceful quit
#[cfg(unix)]
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_stop_input_when_closing_then_engine_receives_it() {
    // Given: An engine that records the line it reads before exiting
    let root = tempfile::tempdir().unwrap();
    let factory = ProcessCaptureFactory::new(shell_settings(
        root.path(),
        "echo data > \"$1\"; read line; echo \"$line\" > \"$1.stop\"",
        Some("q\n"),
    ));
    let hooks = Arc::new(RecordedHooks::default());
    let capture = factory
        .create(Arc::new(request(42, JobKind::StartRecording)), hooks.clone())
        .unwrap();
    capture.start().await.unwrap();
    assert!(eventually(|| hooks.started() == 1).await);

    // When
    capture.close(None).await;

    // Then
    let marker = root.path().join("room1").join("rec-1_raw.mkv.stop");
    assert_eq!(std::fs::read_to_string(marker).unwrap().trim(), "q");
    assert_eq!(hooks.closed()[0].error, None);
}

/// WHAT: Identifiers cannot escape the storage root
/// WHY: Room and recording ids arrive from the network
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_hostile_identifiers_when_creating_then_output_stays_under_root() {
    // Given: Identifiers trying to climb out of the storage root
    let root = tempfile::tempdir().unwrap();
    let factory = ProcessCaptureFactory::new(shell_settings(root.path(), "true", None));
    let hooks = Arc::new(RecordedHooks::default());
    let mut req = request(42, JobKind::StartRecording);
    req.room_id = "../../etc".to_string();
    req.recording_id = "..".to_string();

    // When: Created and closed without launching
    let capture = factory.create(Arc::new(req), hooks.clone()).unwrap();
    capture.close(None).await;

    // Then: Each identifier became a single path component
    let output = hooks.closed()[0].output.clone().unwrap();
    assert_eq!(output.dir, root.path().join(".._.._etc"));
    assert_eq!(output.file_name, "__raw.mkv");
}
