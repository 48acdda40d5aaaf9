use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

use crate::app::SessionConfig;
use crate::services::SessionTimeoutService;

struct MonitorState {
    timeout: Duration,
    check_interval: Duration,
    last_activity: Mutex<Option<Instant>>,
    /// Subscribers are woken only when the value flips
    expired: watch::Sender<bool>,
    monitoring: AtomicBool,
}

impl MonitorState {
    fn touch(&self) {
        *self.last_activity.lock() = Some(Instant::now());
        self.set_expired(false);
    }

    fn set_expired(&self, expired: bool) {
        self.expired.send_if_modified(|current| {
            let flipped = *current != expired;
            *current = expired;
            flipped
        });
    }

    /// Returns true when this call flipped the session to expired
    fn check_expiry(&self) -> bool {
        if !self.monitoring.load(Ordering::SeqCst) {
            return false;
        }
        let Some(last) = *self.last_activity.lock() else {
            return false;
        };
        if last.elapsed() < self.timeout {
            return false;
        }

        self.monitoring.store(false, Ordering::SeqCst);
        self.set_expired(true);
        info!("session expired after {}s of inactivity", self.timeout.as_secs());
        true
    }
}

/// Idle-timeout tracker for HIPAA session expiry
pub struct InactivityMonitor {
    state: Arc<MonitorState>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl InactivityMonitor {
    pub fn new(timeout: Duration, check_interval: Duration) -> Self {
        Self {
            state: Arc::new(MonitorState {
                timeout,
                check_interval,
                last_activity: Mutex::new(None),
                expired: watch::Sender::new(false),
                monitoring: AtomicBool::new(false),
            }),
            ticker: Mutex::new(None),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(config.check_interval_secs.max(1)),
        )
    }

    pub fn timeout(&self) -> Duration {
        self.state.timeout
    }

    pub fn is_monitoring(&self) -> bool {
        self.state.monitoring.load(Ordering::SeqCst)
    }

    /// Follow the expired flag as it flips
    pub fn subscribe_expiry(&self) -> watch::Receiver<bool> {
        self.state.expired.subscribe()
    }

    /// User interaction: push the expiry out by a full timeout
    pub fn record_activity(&self) {
        self.state.touch();
    }

    /// Run one expiry check now instead of waiting for the next tick
    pub fn check_expiry(&self) -> bool {
        self.state.check_expiry()
    }

    /// Time spent in background counts as idle, so check before stamping activity
    pub fn on_foreground(&self) {
        if !self.state.check_expiry() && self.is_monitoring() {
            self.state.touch();
        }
    }

    fn spawn_ticker(&self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime; inactivity checks only run on foreground");
            return;
        };

        let state = Arc::clone(&self.state);
        let task = handle.spawn(async move {
            let mut ticks = interval_at(Instant::now() + state.check_interval, state.check_interval);
            loop {
                ticks.tick().await;
                if state.check_expiry() || !state.monitoring.load(Ordering::SeqCst) {
                    break;
                }
            }
            debug!("inactivity ticker stopped");
        });

        if let Some(previous) = self.ticker.lock().replace(task) {
            previous.abort();
        }
    }
}

impl SessionTimeoutService for InactivityMonitor {
    fn is_session_expired(&self) -> bool {
        *self.state.expired.borrow()
    }

    fn start_monitoring(&self) {
        self.state.monitoring.store(true, Ordering::SeqCst);
        self.state.touch();
        self.spawn_ticker();
    }

    fn stop_monitoring(&self) {
        self.state.monitoring.store(false, Ordering::SeqCst);
        if let Some(task) = self.ticker.lock().take() {
            task.abort();
        }
    }
}

impl Drop for InactivityMonitor {
    fn drop(&mut self) {
        if let Some(task) = self.ticker.get_mut().take() {
            task.abort();
        }
    }
}
