use crate::protocol::TaskRequest;

use std::{path::PathBuf, time::Duration};

/// How the process capture engine is launched.
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    /// Program to run for every capture.
    pub program: String,
    /// Argument templates for recording jobs.
    pub recording_args: Vec<String>,
    /// Argument templates for RTMP relay jobs.
    pub rtmp_args: Vec<String>,
    /// Extension of the raw recording file.
    pub raw_extension: String,
    /// Written to the child's stdin to request a graceful stop.
    /// When `None` the child is killed.
    pub stop_input: Option<String>,
    /// Root under which per-room recording directories are created.
    pub storage_root: PathBuf,
    /// Interval at which the raw file is checked before reporting started.
    pub startup_poll: Duration,
}

/// Replace `{placeholder}` tokens in `template` with request fields.
///
/// Known placeholders: `{room_id}`, `{room_sid}`, `{room_table_id}`,
/// `{recording_id}`, `{recorder_id}`, `{output}`.
pub fn expand_template(template: &str, req: &TaskRequest, output: &str) -> String {
    template
        .replace("{room_table_id}", &req.room_table_id.to_string())
        .replace("{room_id}", &req.room_id)
        .replace("{room_sid}", &req.room_sid)
        .replace("{recording_id}", &req.recording_id)
        .replace("{recorder_id}", &req.recorder_id)
        .replace("{output}", output)
}

/// Make an identifier safe to use as a single path component.
pub(crate) fn path_component(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => cleaned,
    }
}
