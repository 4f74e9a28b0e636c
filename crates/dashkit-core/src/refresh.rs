use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// At most one repeating background task. Arming replaces the previous task.
#[derive(Debug, Default)]
pub struct RefreshTimer {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any armed task, then runs `task` every `period`, first after one
    /// full period. Must be called inside a tokio runtime.
    pub fn arm<F, Fut>(&self, period: Duration, mut task: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut slot = self.handle.lock().expect("refresh timer lock poisoned");
        if let Some(previous) = slot.take() {
            previous.abort();
        }

        let period = period.max(Duration::from_millis(1));
        debug!(period_ms = period.as_millis() as u64, "refresh timer armed");
        *slot = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                task().await;
            }
        }));
    }

    pub fn cancel(&self) {
        if let Some(handle) = self.handle.lock().expect("refresh timer lock poisoned").take() {
            handle.abort();
            debug!("refresh timer cancelled");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle
            .lock()
            .expect("refresh timer lock poisoned")
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        if let Ok(slot) = self.handle.get_mut() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }
}
