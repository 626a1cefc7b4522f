//! Finalization of raw recording files.

mod hook_payload;
mod pipeline;
mod relative_path;
mod settings;

pub use {
    hook_payload::HookPayload,
    pipeline::{FinalArtifact, PostProcessor},
    relative_path::{relative_to_root, strip_literal_prefix},
    settings::PostProcessSettings,
};

/// Bytes per reported megabyte.
pub const BYTES_PER_MB: f32 = 1_000_000.0;

/// Truncate (not round) to two decimal places.
pub fn truncate_two_decimals(value: f32) -> f32 {
    (value * 100.0).trunc() / 100.0
}
