use crate::registry::RegistryKey;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Recorder control-plane errors with source location tracking.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// A job with the same registry key is already running.
    #[error("This request is already in progress: {key} {location}")]
    DuplicateInProgress {
        /// Key of the job that is already active.
        key: RegistryKey,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The capture process could not be started.
    #[error("Capture launch failed: {reason} {location}")]
    CaptureLaunch {
        /// Description of the launch failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The job kind is not a start or stop command.
    #[error("Unsupported task kind: {task} {location}")]
    UnsupportedTask {
        /// Name of the rejected job kind.
        task: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The coordinator could not be reached.
    #[error("Notification failed: {source} {location}")]
    Notification {
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The request body could not be signed.
    #[error("Signature error: {reason} {location}")]
    Signature {
        /// Description of the signing failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The progress counter could not be updated.
    #[error("Progress update failed: {reason} {location}")]
    Progress {
        /// Description of the counter failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Filesystem or process IO failure.
    #[error("IO error: {source} {location}")]
    Io {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl From<std::io::Error> for RecorderError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        RecorderError::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for RecorderError {
    #[track_caller]
    fn from(source: reqwest::Error) -> Self {
        RecorderError::Notification {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
