//! Turns a finished raw capture into the durable artifact.
//!
//! A recording is never discarded because of a tooling failure: when the
//! encoder or the rename fails, the raw file itself becomes the artifact.

use crate::{
    capture::path_component,
    notify::StatusReporter,
    post_process::{
        BYTES_PER_MB, HookPayload, PostProcessSettings, relative_to_root, truncate_two_decimals,
    },
    protocol::{TaskRequest, TaskResponse},
};

use std::{
    path::{Path, PathBuf},
    process::Stdio,
    sync::Arc,
};

use tokio::process::Command;
use tracing::{error, info, instrument};

/// The file a pipeline run settled on.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalArtifact {
    /// File name inside the recording directory.
    pub file_name: String,
    /// Full path of the file.
    pub path: PathBuf,
    /// Path reported upstream, relative to the storage root.
    pub relative_path: String,
    /// Reported size in megabytes, truncated to two decimals.
    pub size_mb: f32,
}

/// Post-processing pipeline shared by every finished recording.
#[derive(Clone)]
pub struct PostProcessor {
    settings: Arc<PostProcessSettings>,
    reporter: Arc<dyn StatusReporter>,
}

impl PostProcessor {
    /// Pipeline reporting finalized files through `reporter`.
    pub fn new(settings: PostProcessSettings, reporter: Arc<dyn StatusReporter>) -> Self {
        Self {
            settings: Arc::new(settings),
            reporter,
        }
    }

    /// Finalize `dir/file_name` for `req`, report it and run hook scripts.
    ///
    /// Returns `None` when the final file cannot be inspected; nothing is
    /// reported in that case.
    #[instrument(
        skip(self, req),
        fields(recording_id = %req.recording_id, room_table_id = req.room_table_id)
    )]
    pub async fn run(
        &self,
        req: &TaskRequest,
        dir: &Path,
        file_name: &str,
    ) -> Option<FinalArtifact> {
        let raw_path = dir.join(file_name);
        let mut final_name = format!("{}.mp4", path_component(&req.recording_id));
        let mut final_path = dir.join(&final_name);

        if self.settings.convert_to_mp4 {
            match self.convert(&raw_path, &final_path).await {
                Ok(()) => {
                    if let Err(e) = tokio::fs::remove_file(&raw_path).await {
                        error!(
                            path = ?raw_path,
                            error = %e,
                            "Failed to remove raw file after conversion"
                        );
                    }
                }
                Err(reason) => {
                    error!(
                        raw_file = %file_name,
                        reason = %reason,
                        "Keeping the raw file as output because conversion failed"
                    );
                    let _ = tokio::fs::remove_file(&final_path).await;
                    final_name = file_name.to_string();
                    final_path = raw_path;
                }
            }
        } else if let Err(e) = tokio::fs::rename(&raw_path, &final_path).await {
            error!(
                raw_file = %file_name,
                error = %e,
                "Keeping the raw file as output because rename failed"
            );
            final_name = file_name.to_string();
            final_path = raw_path;
        }

        let metadata = match tokio::fs::metadata(&final_path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                error!(path = ?final_path, error = %e, "Failed to inspect final recording");
                return None;
            }
        };

        let size_mb = metadata.len() as f32 / BYTES_PER_MB;
        let artifact = FinalArtifact {
            relative_path: relative_to_root(&self.settings.storage_root, &final_path),
            size_mb: truncate_two_decimals(size_mb),
            file_name: final_name,
            path: final_path,
        };

        let response =
            TaskResponse::proceeded(req, artifact.relative_path.clone(), artifact.size_mb);
        info!(
            file_path = %response.file_path,
            file_size = response.file_size,
            "Reporting processed recording"
        );
        if let Err(e) = self.reporter.report(&response).await {
            error!(error = %e, "Failed to report processed recording");
        }

        self.run_hooks(req, &artifact, size_mb).await;

        Some(artifact)
    }

    async fn convert(&self, raw: &Path, target: &Path) -> Result<(), String> {
        let settings = &self.settings;
        let mut command = Command::new(&settings.encoder_program);
        command
            .args(settings.pre_input.split_whitespace())
            .arg("-i")
            .arg(raw)
            .args(settings.post_input.split_whitespace())
            .arg(target)
            .stdin(Stdio::null());

        info!(
            program = %settings.encoder_program,
            input = ?raw,
            output = ?target,
            "Starting post recording conversion"
        );

        let output = command
            .output()
            .await
            .map_err(|e| format!("failed to run {}: {}", settings.encoder_program, e))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(format!(
                "{} exited with {}: {}",
                settings.encoder_program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ))
        }
    }

    async fn run_hooks(&self, req: &TaskRequest, artifact: &FinalArtifact, size_mb: f32) {
        if self.settings.hook_scripts.is_empty() {
            return;
        }

        let payload = HookPayload::new(
            req,
            &artifact.file_name,
            artifact.path.to_string_lossy().into_owned(),
            size_mb,
        );
        let json = match serde_json::to_string(&payload) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to encode hook payload");
                return;
            }
        };

        for script in &self.settings.hook_scripts {
            match Command::new("sh")
                .arg(script)
                .arg(&json)
                .stdin(Stdio::null())
                .output()
                .await
            {
                Ok(output) if output.status.success() => {
                    info!(script = ?script, "Post-processing script finished");
                }
                Ok(output) => {
                    error!(
                        script = ?script,
                        status = %output.status,
                        stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                        "Post-processing script failed"
                    );
                }
                Err(e) => {
                    error!(script = ?script, error = %e, "Failed to run post-processing script");
                }
            }
        }
    }
}
