use crate::CoreResult;

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::debug;

/// Process-wide count of jobs in progress, owned outside the controller.
#[async_trait]
pub trait ProgressCounter: Send + Sync {
    /// Increment on `true`, decrement on `false`.
    async fn update(&self, increment: bool) -> CoreResult<()>;

    /// Current value.
    fn current(&self) -> u64;
}

/// In-process counter. Decrements saturate at zero.
#[derive(Debug, Default)]
pub struct AtomicProgress {
    value: AtomicU64,
}

impl AtomicProgress {
    /// Counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressCounter for AtomicProgress {
    async fn update(&self, increment: bool) -> CoreResult<()> {
        let previous = if increment {
            self.value.fetch_add(1, Ordering::SeqCst)
        } else {
            self.value
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| Some(v.saturating_sub(1)))
                .unwrap_or_default()
        };
        debug!(previous, increment, "Progress counter updated");
        Ok(())
    }

    fn current(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }
}
