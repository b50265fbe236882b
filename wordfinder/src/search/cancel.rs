use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Anything a scanner can poll to learn it should stop early.
pub trait StopSignal: Sync {
    fn should_stop(&self) -> bool;
}

/// Cooperative cancellation signal shared between a caller and a search.
///
/// Cloning yields another handle to the same flag. Cancelling is idempotent
/// and cannot be undone.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that any search observing this token stop.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

impl StopSignal for CancellationToken {
    #[inline]
    fn should_stop(&self) -> bool {
        self.is_cancelled()
    }
}
