// src/watchdog.rs
// Inactivity watchdog: one deferred stop armed when a session starts. It is
// armed once per start and deliberately not re-armed on results; an explicit
// stop must always cancel it so it cannot fire after navigation.

use std::sync::Mutex;
use std::time::Duration;
use tauri::async_runtime::JoinHandle;

#[derive(Default)]
pub struct Watchdog {
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Watchdog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the watchdog; a previously armed task is aborted first.
    pub fn arm<F>(&self, delay: Duration, on_fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tauri::async_runtime::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::info!("inactivity watchdog fired after {:?}", delay);
            on_fire();
        });

        if let Ok(mut guard) = self.task.lock() {
            if let Some(existing) = guard.take() {
                existing.abort();
            }
            *guard = Some(handle);
        }
    }

    pub fn cancel(&self) {
        if let Ok(mut guard) = self.task.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
                tracing::debug!("inactivity watchdog cancelled");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread::sleep;

    #[test]
    fn fires_after_delay() {
        let watchdog = Watchdog::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let flag = fired.clone();

        watchdog.arm(Duration::from_millis(20), move || {
            flag.fetch_add(1, Ordering::SeqCst);
        });
        sleep(Duration::from_millis(200));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancel_prevents_fire() {
        let watchdog = Watchdog::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let flag = fired.clone();

        watchdog.arm(Duration::from_millis(30), move || {
            flag.fetch_add(1, Ordering::SeqCst);
        });
        watchdog.cancel();
        sleep(Duration::from_millis(150));
        assert_eq!(
            fired.load(Ordering::SeqCst),
            0,
            "watchdog must not fire after an explicit stop"
        );
    }

    #[test]
    fn rearming_aborts_previous_task() {
        let watchdog = Watchdog::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let first = fired.clone();
        watchdog.arm(Duration::from_millis(30), move || {
            first.fetch_add(10, Ordering::SeqCst);
        });
        let second = fired.clone();
        watchdog.arm(Duration::from_millis(30), move || {
            second.fetch_add(1, Ordering::SeqCst);
        });
        sleep(Duration::from_millis(200));
        assert_eq!(fired.load(Ordering::SeqCst), 1, "only the latest arm may fire");
    }

    #[test]
    fn double_cancel_is_safe() {
        let watchdog = Watchdog::new();
        watchdog.cancel();
        watchdog.cancel();
    }
}
