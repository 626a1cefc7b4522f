mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod coordinator_config;
mod encoder_config;
mod logging_config;
mod recorder_config;
mod server_config;

pub(crate) use {
    capture_config::CaptureConfig, config::Config, coordinator_config::CoordinatorConfig,
    encoder_config::EncoderConfig, logging_config::LoggingConfig, recorder_config::RecorderConfig,
    server_config::ServerConfig,
};

use std::path::PathBuf;

pub(crate) const DEFAULT_HOST: &str = "127.0.0.1";
pub(crate) const DEFAULT_PORT: u16 = 7878;
pub(crate) const DEFAULT_STORAGE_ROOT: &str = "./recordings";
pub(crate) const DEFAULT_POST_MP4_CONVERT: bool = true;
pub(crate) const DEFAULT_ENCODER_PROGRAM: &str = "ffmpeg";
pub(crate) const DEFAULT_PRE_INPUT: &str = "-hide_banner -loglevel error";
pub(crate) const DEFAULT_POST_INPUT: &str = "-c copy -movflags faststart";
pub(crate) const DEFAULT_CAPTURE_PROGRAM: &str = "ffmpeg";
pub(crate) const DEFAULT_RAW_EXTENSION: &str = "mkv";
pub(crate) const DEFAULT_STOP_INPUT: &str = "q";
pub(crate) const DEFAULT_STARTUP_POLL_MS: u64 = 500;
pub(crate) const DEFAULT_LOG_LEVEL: &str = "info";

pub(crate) fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

pub(crate) fn default_port() -> u16 {
    DEFAULT_PORT
}

pub(crate) fn default_storage_root() -> PathBuf {
    PathBuf::from(DEFAULT_STORAGE_ROOT)
}

pub(crate) fn default_post_mp4_convert() -> bool {
    DEFAULT_POST_MP4_CONVERT
}

pub(crate) fn default_encoder_program() -> String {
    DEFAULT_ENCODER_PROGRAM.to_string()
}

pub(crate) fn default_pre_input() -> String {
    DEFAULT_PRE_INPUT.to_string()
}

pub(crate) fn default_post_input() -> String {
    DEFAULT_POST_INPUT.to_string()
}

pub(crate) fn default_capture_program() -> String {
    DEFAULT_CAPTURE_PROGRAM.to_string()
}

pub(crate) fn default_recording_args() -> Vec<String> {
    [
        "-hide_banner",
        "-loglevel",
        "error",
        "-i",
        "rtmp://127.0.0.1/live/{room_id}",
        "-c",
        "copy",
        "{output}",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

pub(crate) fn default_rtmp_args() -> Vec<String> {
    [
        "-hide_banner",
        "-loglevel",
        "error",
        "-i",
        "rtmp://127.0.0.1/live/{room_id}",
        "-c",
        "copy",
        "-f",
        "flv",
        "rtmp://127.0.0.1/relay/{room_id}",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

pub(crate) fn default_raw_extension() -> String {
    DEFAULT_RAW_EXTENSION.to_string()
}

pub(crate) fn default_stop_input() -> Option<String> {
    Some(DEFAULT_STOP_INPUT.to_string())
}

pub(crate) fn default_startup_poll_ms() -> u64 {
    DEFAULT_STARTUP_POLL_MS
}

pub(crate) fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
