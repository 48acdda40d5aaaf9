//! In-memory collaborators backing the simulator and the test suites.

use anyhow::{bail, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::debug;

use super::traits::{AuthService, BiometricService, SessionTimeoutService};
use super::types::{AuthSnapshot, BiometricType};

/// Biometric service whose challenge results are queued up front
pub struct ScriptedBiometrics {
    enabled: AtomicBool,
    sensor: BiometricType,
    biometric_results: Mutex<VecDeque<bool>>,
    passcode_results: Mutex<VecDeque<bool>>,
    /// When set, challenges wait on this before answering
    hold: Mutex<Option<Arc<Notify>>>,
    challenges: AtomicUsize,
}

impl ScriptedBiometrics {
    pub fn new(enabled: bool, sensor: BiometricType) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            sensor,
            biometric_results: Mutex::new(VecDeque::new()),
            passcode_results: Mutex::new(VecDeque::new()),
            hold: Mutex::new(None),
            challenges: AtomicUsize::new(0),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Queue the result of the next biometric challenge
    pub fn push_biometric_result(&self, success: bool) {
        self.biometric_results.lock().push_back(success);
    }

    /// Queue the result of the next passcode challenge
    pub fn push_passcode_result(&self, success: bool) {
        self.passcode_results.lock().push_back(success);
    }

    /// Drop queued results that no challenge consumed
    pub fn clear_queued(&self) {
        self.biometric_results.lock().clear();
        self.passcode_results.lock().clear();
    }

    /// Make challenges block until the returned notifier fires
    pub fn hold_challenges(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.hold.lock() = Some(Arc::clone(&notify));
        notify
    }

    /// Number of challenges started, either kind
    pub fn challenge_count(&self) -> usize {
        self.challenges.load(Ordering::SeqCst)
    }

    async fn answer(&self, results: &Mutex<VecDeque<bool>>) -> bool {
        self.challenges.fetch_add(1, Ordering::SeqCst);
        let hold = self.hold.lock().clone();
        if let Some(notify) = hold {
            notify.notified().await;
        }
        // an empty queue behaves like the user dismissing the prompt
        let result = results.lock().pop_front().unwrap_or(false);
        debug!("scripted challenge answered {}", result);
        result
    }
}

#[async_trait]
impl BiometricService for ScriptedBiometrics {
    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn is_hardware_available(&self) -> bool {
        self.sensor.is_available()
    }

    fn biometric_type(&self) -> BiometricType {
        self.sensor
    }

    async fn challenge(&self) -> bool {
        if !self.is_hardware_available() {
            return false;
        }
        self.answer(&self.biometric_results).await
    }

    async fn challenge_with_fallback_passcode(&self) -> bool {
        self.answer(&self.passcode_results).await
    }
}

/// Auth service holding a mutable snapshot
#[derive(Default)]
pub struct InMemoryAuth {
    snapshot: Mutex<AuthSnapshot>,
    refreshed_users: Mutex<Vec<String>>,
    fail_refresh: AtomicBool,
    refreshed: Notify,
}

impl InMemoryAuth {
    pub fn new(snapshot: AuthSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            ..Self::default()
        }
    }

    pub fn set_snapshot(&self, snapshot: AuthSnapshot) {
        *self.snapshot.lock() = snapshot;
    }

    /// Apply an in-place edit to the current snapshot
    pub fn update(&self, edit: impl FnOnce(&mut AuthSnapshot)) {
        edit(&mut *self.snapshot.lock());
    }

    pub fn login(&self, user_id: &str) {
        self.set_snapshot(AuthSnapshot::signed_in(user_id));
    }

    pub fn login_as_guest(&self, user_id: &str) {
        self.set_snapshot(AuthSnapshot::guest(user_id));
    }

    pub fn logout(&self) {
        self.set_snapshot(AuthSnapshot::default());
    }

    pub fn set_fail_refresh(&self, fail: bool) {
        self.fail_refresh.store(fail, Ordering::SeqCst);
    }

    pub fn refreshed_users(&self) -> Vec<String> {
        self.refreshed_users.lock().clone()
    }

    /// Resolves once a refresh has completed (successfully or not)
    pub async fn wait_for_refresh(&self) {
        self.refreshed.notified().await;
    }
}

#[async_trait]
impl AuthService for InMemoryAuth {
    fn snapshot(&self) -> AuthSnapshot {
        self.snapshot.lock().clone()
    }

    async fn refresh_profile(&self, user_id: &str) -> Result<()> {
        self.refreshed_users.lock().push(user_id.to_string());
        self.refreshed.notify_one();
        if self.fail_refresh.load(Ordering::SeqCst) {
            bail!("account service unreachable");
        }
        Ok(())
    }
}

/// Session-timeout collaborator toggled by hand instead of by a timer
#[derive(Default)]
pub struct ManualSessionTimeout {
    expired: AtomicBool,
    monitoring: AtomicBool,
    starts: AtomicUsize,
}

impl ManualSessionTimeout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_expired(&self, expired: bool) {
        self.expired.store(expired, Ordering::SeqCst);
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitoring.load(Ordering::SeqCst)
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }
}

impl SessionTimeoutService for ManualSessionTimeout {
    fn is_session_expired(&self) -> bool {
        self.expired.load(Ordering::SeqCst)
    }

    fn start_monitoring(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.expired.store(false, Ordering::SeqCst);
        self.monitoring.store(true, Ordering::SeqCst);
    }

    fn stop_monitoring(&self) {
        self.monitoring.store(false, Ordering::SeqCst);
    }
}
