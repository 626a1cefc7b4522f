use crate::config::{
    default_capture_program, default_raw_extension, default_recording_args, default_rtmp_args,
    default_startup_poll_ms, default_stop_input,
};

use room_recorder_core::CaptureSettings;

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

/// External capture program launched for every job.
///
/// Argument templates may use `{room_id}`, `{room_sid}`, `{room_table_id}`,
/// `{recording_id}`, `{recorder_id}` and `{output}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Capture program.
    #[serde(default = "default_capture_program")]
    pub program: String,
    /// Argument templates for recordings.
    #[serde(default = "default_recording_args")]
    pub recording_args: Vec<String>,
    /// Argument templates for RTMP relays.
    #[serde(default = "default_rtmp_args")]
    pub rtmp_args: Vec<String>,
    /// Extension of raw recording files.
    #[serde(default = "default_raw_extension")]
    pub raw_extension: String,
    /// Line written to the program's stdin to stop it. The program is
    /// killed instead when this is empty.
    #[serde(default = "default_stop_input")]
    pub stop_input: Option<String>,
    /// How often the raw file is checked before reporting a start.
    #[serde(default = "default_startup_poll_ms")]
    pub startup_poll_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            program: default_capture_program(),
            recording_args: default_recording_args(),
            rtmp_args: default_rtmp_args(),
            raw_extension: default_raw_extension(),
            stop_input: default_stop_input(),
            startup_poll_ms: default_startup_poll_ms(),
        }
    }
}

impl CaptureConfig {
    /// Engine settings writing recordings under `storage_root`.
    pub fn settings(&self, storage_root: &Path) -> CaptureSettings {
        CaptureSettings {
            program: self.program.clone(),
            recording_args: self.recording_args.clone(),
            rtmp_args: self.rtmp_args.clone(),
            raw_extension: self.raw_extension.clone(),
            stop_input: self
                .stop_input
                .as_deref()
                .filter(|input| !input.is_empty())
                .map(|input| format!("{}\n", input)),
            storage_root: storage_root.to_path_buf(),
            startup_poll: Duration::from_millis(self.startup_poll_ms),
        }
    }
}
