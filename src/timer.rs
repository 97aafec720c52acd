use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::task::JoinHandle;

/// Holds at most one pending timer. Scheduling replaces whatever was pending.
#[derive(Debug, Clone, Default)]
pub struct TimerSlot {
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl TimerSlot {
    /// Runs `fire` after `delay`, replacing any pending timer.
    ///
    /// Spawns onto the current tokio runtime and panics outside of one.
    pub fn schedule<F>(&self, delay: Duration, fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire();
        });
        if let Some(previous) = self.lock().replace(handle) {
            previous.abort();
        }
    }

    pub fn cancel(&self) {
        if let Some(previous) = self.lock().take() {
            previous.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
