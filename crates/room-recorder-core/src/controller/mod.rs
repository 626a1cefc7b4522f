mod close;
mod session_controller;
mod shutdown;
mod start;
mod stop;

pub use session_controller::{SessionController, TaskOutcome};
