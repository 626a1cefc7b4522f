//! Seam between the controller and the engine that performs the capture.
//!
//! The controller only sees [`CaptureProcess`]; the engine reports back through
//! the per-job [`CaptureHooks`] it received at construction.

mod command;
mod process_capture;
mod traits;

pub(crate) use command::path_component;

pub use {
    command::{CaptureSettings, expand_template},
    process_capture::{ProcessCapture, ProcessCaptureFactory},
    traits::{CaptureClosed, CaptureFactory, CaptureHooks, CaptureProcess, OutputFile},
};
