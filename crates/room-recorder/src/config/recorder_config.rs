use crate::config::{default_post_mp4_convert, default_storage_root};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where recordings go and what happens to them afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Root directory for per-room recording directories.
    #[serde(default = "default_storage_root")]
    pub storage_root: PathBuf,
    /// Re-encode finished recordings to mp4.
    #[serde(default = "default_post_mp4_convert")]
    pub post_mp4_convert: bool,
    /// Scripts run after each recording is finalized.
    #[serde(default)]
    pub post_processing_scripts: Vec<PathBuf>,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            storage_root: default_storage_root(),
            post_mp4_convert: default_post_mp4_convert(),
            post_processing_scripts: Vec::new(),
        }
    }
}
