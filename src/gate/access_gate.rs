use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::flags::SessionFlags;
use super::screen::{resolve_screen, GateInputs, GateView, Screen};
use crate::constants::{
    APP_DISPLAY_NAME, BIOMETRIC_FAILURE_MESSAGE, BIOMETRIC_PROMPT_REASON, BIOMETRIC_PROMPT_TITLE,
    PASSCODE_FALLBACK_TITLE,
};
use crate::services::{
    AuthService, AuthSnapshot, BiometricService, ChallengeMethod, ConsentService,
    SessionTimeoutService,
};
use crate::session::{AuditTrail, HipaaEventType};
use crate::utils::GateError;

/// Collaborators the gate reads from
#[derive(Clone)]
pub struct GateServices {
    pub biometric: Arc<dyn BiometricService>,
    pub auth: Arc<dyn AuthService>,
    pub consent: Arc<dyn ConsentService>,
    pub session_timeout: Arc<dyn SessionTimeoutService>,
}

/// Result of one biometric or passcode attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeOutcome {
    Passed,
    Failed,
    /// A challenge was already pending; this request joined it
    Coalesced,
    /// The gate was not active when the challenge was requested
    NotRequired,
    /// The session ended while the challenge was pending; result dropped
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeReport {
    pub outcome: ChallengeOutcome,
    pub view: GateView,
}

/// Copy for the biometric gate screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiometricPrompt {
    pub title: String,
    pub subtitle: String,
    /// Reason passed to the platform prompt
    pub reason: String,
    pub icon: String,
    pub fallback_title: String,
    pub failure_message: String,
}

#[derive(Debug, Default)]
struct GateState {
    flags: SessionFlags,
    /// Auth state seen by the previous trigger; None before launch
    was_authenticated: Option<bool>,
    /// Last signed-in user, kept so logout can be attributed
    current_user: Option<String>,
    /// Bumped whenever a session starts or ends
    session_epoch: u64,
    challenge_in_flight: bool,
    last_failure: Option<String>,
    last_screen: Option<Screen>,
    timeout_audited: bool,
}

/// Decides which top-level screen is active on launch, auth change and foreground.
///
/// All trigger handling runs under one lock, so a foreground event arriving
/// during login processing waits its turn instead of interleaving flag writes.
/// The lock is released while a biometric challenge is pending.
pub struct AppAccessGate {
    services: GateServices,
    state: Mutex<GateState>,
    audit: Option<Arc<AuditTrail>>,
}

impl AppAccessGate {
    pub fn new(services: GateServices) -> Self {
        Self {
            services,
            state: Mutex::new(GateState::default()),
            audit: None,
        }
    }

    /// Record login, logout and session-timeout events to `trail`
    pub fn with_audit(mut self, trail: Arc<AuditTrail>) -> Self {
        self.audit = Some(trail);
        self
    }

    /// Current flags, read-only
    pub async fn flags(&self) -> SessionFlags {
        self.state.lock().await.flags
    }

    pub fn biometric_prompt(&self) -> BiometricPrompt {
        let sensor = self.services.biometric.biometric_type();
        BiometricPrompt {
            title: BIOMETRIC_PROMPT_TITLE.to_string(),
            subtitle: format!("Use {} to unlock {}", sensor.display_name(), APP_DISPLAY_NAME),
            reason: BIOMETRIC_PROMPT_REASON.to_string(),
            icon: sensor.icon().to_string(),
            fallback_title: PASSCODE_FALLBACK_TITLE.to_string(),
            failure_message: BIOMETRIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Process start
    pub async fn on_launch(&self) -> GateView {
        let mut state = self.state.lock().await;
        let auth = self.services.auth.snapshot();

        self.recompute(&mut state, &auth);
        if auth.is_authenticated {
            // restored session
            self.begin_session(&mut state, &auth);
        }
        state.was_authenticated = Some(auth.is_authenticated);

        let view = self.view(&mut state, &auth);
        info!("launch resolved to {}", view.screen);
        view
    }

    /// The auth service published a new snapshot
    pub async fn on_auth_changed(&self) -> GateView {
        let mut state = self.state.lock().await;
        let auth = self.services.auth.snapshot();
        let was_authenticated = state.was_authenticated.unwrap_or(false);

        match (was_authenticated, auth.is_authenticated) {
            (false, true) => {
                self.recompute(&mut state, &auth);
                self.begin_session(&mut state, &auth);
                if let Some(user_id) = &auth.current_user_id {
                    self.audit(HipaaEventType::UserLogin, user_id);
                }
            }
            (true, false) => {
                state.session_epoch += 1;
                state.flags.reset();
                state.last_failure = None;
                self.services.session_timeout.stop_monitoring();
                if let Some(user_id) = state.current_user.take() {
                    self.audit(HipaaEventType::UserLogout, &user_id);
                }
                info!("signed out; biometric flags cleared");
            }
            _ => {
                if auth.is_authenticated {
                    state.current_user = auth.current_user_id.clone();
                }
            }
        }
        state.was_authenticated = Some(auth.is_authenticated);

        let view = self.view(&mut state, &auth);
        debug!("auth change resolved to {}", view.screen);
        view
    }

    /// App returned from background
    pub async fn on_foreground(&self) -> GateView {
        let mut state = self.state.lock().await;
        let auth = self.services.auth.snapshot();

        if auth.is_authenticated && !auth.is_guest_mode {
            self.recompute(&mut state, &auth);
            if let Some(user_id) = auth.current_user_id.clone() {
                self.spawn_profile_refresh(user_id);
            }
        }

        let view = self.view(&mut state, &auth);
        debug!("foreground resolved to {}", view.screen);
        view
    }

    /// Re-resolve with fresh snapshots but without touching the flags,
    /// e.g. after consent is signed or onboarding finishes
    pub async fn current_view(&self) -> GateView {
        let mut state = self.state.lock().await;
        let auth = self.services.auth.snapshot();
        self.view(&mut state, &auth)
    }

    /// Run a biometric or passcode challenge while the gate is showing
    pub async fn authenticate(&self, method: ChallengeMethod) -> ChallengeReport {
        let epoch = {
            let mut state = self.state.lock().await;
            let auth = self.services.auth.snapshot();
            let mut view = self.view(&mut state, &auth);

            if view.screen != Screen::BiometricGate {
                return ChallengeReport {
                    outcome: ChallengeOutcome::NotRequired,
                    view,
                };
            }
            if state.challenge_in_flight {
                debug!("challenge already pending; coalescing");
                view.prompt_biometric = false;
                return ChallengeReport {
                    outcome: ChallengeOutcome::Coalesced,
                    view,
                };
            }

            state.challenge_in_flight = true;
            state.session_epoch
        };

        let success = match method {
            ChallengeMethod::Biometric => self.services.biometric.challenge().await,
            ChallengeMethod::Passcode => {
                self.services
                    .biometric
                    .challenge_with_fallback_passcode()
                    .await
            }
        };

        let mut state = self.state.lock().await;
        state.challenge_in_flight = false;

        let outcome = if state.session_epoch != epoch {
            debug!("dropping {:?} result from an ended session", method);
            // let the next resolution prompt again if the gate still applies
            state.last_screen = None;
            ChallengeOutcome::Stale
        } else if success {
            state.flags.mark_passed();
            state.last_failure = None;
            info!("{:?} challenge passed", method);
            ChallengeOutcome::Passed
        } else {
            let err = GateError::BiometricChallengeFailed(format!("{:?} challenge rejected", method));
            warn!("{}", err);
            state.last_failure = Some(BIOMETRIC_FAILURE_MESSAGE.to_string());
            ChallengeOutcome::Failed
        };

        let auth = self.services.auth.snapshot();
        let view = self.view(&mut state, &auth);
        ChallengeReport { outcome, view }
    }

    fn recompute(&self, state: &mut GateState, auth: &AuthSnapshot) {
        let enabled = self.services.biometric.is_enabled();
        let hardware = self.services.biometric.is_hardware_available();
        let required =
            state
                .flags
                .recompute_biometric_requirement(enabled, hardware, auth.is_guest_mode);
        debug!(
            enabled,
            hardware,
            guest = auth.is_guest_mode,
            required,
            "biometric requirement recomputed"
        );
    }

    fn begin_session(&self, state: &mut GateState, auth: &AuthSnapshot) {
        state.session_epoch += 1;
        state.last_failure = None;
        state.timeout_audited = false;
        state.current_user = auth.current_user_id.clone();
        self.services.session_timeout.start_monitoring();
    }

    fn view(&self, state: &mut GateState, auth: &AuthSnapshot) -> GateView {
        let inputs = GateInputs {
            is_loading: auth.is_loading,
            is_authenticated: auth.is_authenticated,
            requires_biometric_auth: state.flags.requires_biometric_auth(),
            biometric_auth_passed: state.flags.biometric_auth_passed(),
            has_user_consented: self.services.consent.has_user_consented(),
            needs_profile_completion: auth.needs_profile_completion,
            needs_company_setup: auth.needs_company_setup,
        };
        let screen = resolve_screen(&inputs);

        let session_expired = self.services.session_timeout.is_session_expired();
        if session_expired && !state.timeout_audited {
            state.timeout_audited = true;
            if let Some(user_id) = state.current_user.clone() {
                self.audit(HipaaEventType::SessionTimeout, &user_id);
            }
        }

        let entered_gate =
            screen == Screen::BiometricGate && state.last_screen != Some(Screen::BiometricGate);
        if entered_gate {
            state.last_failure = None;
        }
        state.last_screen = Some(screen);

        GateView {
            screen,
            session_expired,
            biometric_error: match screen {
                Screen::BiometricGate => state.last_failure.clone(),
                _ => None,
            },
            prompt_biometric: entered_gate && !state.challenge_in_flight,
        }
    }

    fn spawn_profile_refresh(&self, user_id: String) {
        let auth = Arc::clone(&self.services.auth);
        tokio::spawn(async move {
            match auth.refresh_profile(&user_id).await {
                Ok(()) => debug!("profile refreshed for {}", user_id),
                Err(e) => {
                    let err = GateError::ProfileRefreshFailed {
                        user_id,
                        reason: e.to_string(),
                    };
                    warn!("{}", err);
                }
            }
        });
    }

    fn audit(&self, event_type: HipaaEventType, user_id: &str) {
        if let Some(trail) = &self.audit {
            trail.record(event_type, user_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consent::ConsentStore;
    use crate::services::{
        BiometricType, InMemoryAuth, ManualSessionTimeout, MockAuthService, MockConsentService,
        ScriptedBiometrics,
    };
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    struct Harness {
        gate: Arc<AppAccessGate>,
        bio: Arc<ScriptedBiometrics>,
        auth: Arc<InMemoryAuth>,
        consent: Arc<ConsentStore>,
        timeout: Arc<ManualSessionTimeout>,
        audit: Arc<AuditTrail>,
    }

    fn harness(snapshot: AuthSnapshot, biometric_enabled: bool, consented: bool) -> Harness {
        let bio = Arc::new(ScriptedBiometrics::new(biometric_enabled, BiometricType::FaceId));
        let auth = Arc::new(InMemoryAuth::new(snapshot));
        let consent = Arc::new(ConsentStore::default());
        if consented {
            consent.record_consent("Dr. Vega", Utc::now() - Duration::days(1));
        }
        let timeout = Arc::new(ManualSessionTimeout::new());
        let audit = Arc::new(AuditTrail::new());

        let gate = AppAccessGate::new(GateServices {
            biometric: bio.clone(),
            auth: auth.clone(),
            consent: consent.clone(),
            session_timeout: timeout.clone(),
        })
        .with_audit(audit.clone());

        Harness {
            gate: Arc::new(gate),
            bio,
            auth,
            consent,
            timeout,
            audit,
        }
    }

    #[tokio::test]
    async fn test_launch_with_biometrics_required_shows_gate() {
        let h = harness(AuthSnapshot::signed_in("u1"), true, true);

        let view = h.gate.on_launch().await;
        let flags = h.gate.flags().await;

        assert!(flags.requires_biometric_auth());
        assert!(!flags.biometric_auth_passed());
        assert_eq!(view.screen, Screen::BiometricGate);
        assert!(view.prompt_biometric);
        assert!(h.timeout.is_monitoring());
    }

    #[tokio::test]
    async fn test_guest_skips_biometrics_but_not_consent() {
        let h = harness(AuthSnapshot::guest("g1"), true, false);

        let view = h.gate.on_launch().await;

        assert!(!h.gate.flags().await.requires_biometric_auth());
        assert_eq!(view.screen, Screen::ConsentRequired);
    }

    #[tokio::test]
    async fn test_timeout_overlay_leaves_screen_alone() {
        let h = harness(AuthSnapshot::signed_in("u1"), false, true);
        assert_eq!(h.gate.on_launch().await.screen, Screen::MainApplication);

        h.timeout.set_expired(true);
        let view = h.gate.current_view().await;

        assert_eq!(view.screen, Screen::MainApplication);
        assert!(view.session_expired);
        assert_eq!(h.audit.events_of(HipaaEventType::SessionTimeout).len(), 1);

        // audited once per session
        h.gate.current_view().await;
        assert_eq!(h.audit.events_of(HipaaEventType::SessionTimeout).len(), 1);
    }

    #[tokio::test]
    async fn test_logout_resets_flags_and_stops_monitoring() {
        let h = harness(AuthSnapshot::signed_in("u1"), true, true);
        h.gate.on_launch().await;
        h.bio.push_biometric_result(true);
        let report = h.gate.authenticate(ChallengeMethod::Biometric).await;
        assert_eq!(report.outcome, ChallengeOutcome::Passed);
        assert!(h.gate.flags().await.biometric_auth_passed());

        h.auth.logout();
        let view = h.gate.on_auth_changed().await;

        assert_eq!(view.screen, Screen::Unauthenticated);
        assert_eq!(h.gate.flags().await, SessionFlags::default());
        assert!(!h.timeout.is_monitoring());
        assert_eq!(h.audit.events_of(HipaaEventType::UserLogout)[0].user_id, "u1");
    }

    #[tokio::test]
    async fn test_foreground_relocks_after_pass() {
        let h = harness(AuthSnapshot::signed_in("u1"), true, true);
        h.gate.on_launch().await;
        h.bio.push_biometric_result(true);
        let report = h.gate.authenticate(ChallengeMethod::Biometric).await;
        assert_eq!(report.view.screen, Screen::MainApplication);

        let view = h.gate.on_foreground().await;

        assert_eq!(view.screen, Screen::BiometricGate);
        assert!(view.prompt_biometric);
        assert!(!h.gate.flags().await.biometric_auth_passed());

        h.auth.wait_for_refresh().await;
        assert_eq!(h.auth.refreshed_users(), vec!["u1".to_string()]);
    }

    #[tokio::test]
    async fn test_foreground_as_guest_does_nothing() {
        let h = harness(AuthSnapshot::guest("g1"), true, true);
        h.gate.on_launch().await;

        let view = h.gate.on_foreground().await;
        tokio::task::yield_now().await;

        assert_eq!(view.screen, Screen::MainApplication);
        assert!(h.auth.refreshed_users().is_empty());
    }

    #[tokio::test]
    async fn test_login_forces_fresh_challenge() {
        let h = harness(AuthSnapshot::default(), true, true);
        assert_eq!(h.gate.on_launch().await.screen, Screen::Unauthenticated);
        assert!(!h.timeout.is_monitoring());

        h.auth.login("u2");
        let view = h.gate.on_auth_changed().await;

        assert_eq!(view.screen, Screen::BiometricGate);
        assert!(view.prompt_biometric);
        assert!(h.timeout.is_monitoring());
        assert_eq!(h.audit.events_of(HipaaEventType::UserLogin)[0].user_id, "u2");
    }

    #[tokio::test]
    async fn test_loading_then_restored_session() {
        let h = harness(AuthSnapshot::loading(), true, true);
        assert_eq!(h.gate.on_launch().await.screen, Screen::Loading);

        h.auth.login("u1");
        assert_eq!(h.gate.on_auth_changed().await.screen, Screen::BiometricGate);
    }

    #[tokio::test]
    async fn test_unchanged_auth_does_not_relock() {
        let h = harness(AuthSnapshot::signed_in("u1"), true, true);
        h.gate.on_launch().await;
        h.bio.push_biometric_result(true);
        h.gate.authenticate(ChallengeMethod::Biometric).await;

        h.auth.update(|s| s.needs_company_setup = true);
        let view = h.gate.on_auth_changed().await;

        assert_eq!(view.screen, Screen::CompanySetup);
        assert_eq!(h.timeout.start_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_then_passcode_exits_gate() {
        let h = harness(AuthSnapshot::signed_in("u1"), true, true);
        h.auth.update(|s| s.needs_profile_completion = true);
        h.gate.on_launch().await;

        h.bio.push_biometric_result(false);
        let failed = h.gate.authenticate(ChallengeMethod::Biometric).await;
        assert_eq!(failed.outcome, ChallengeOutcome::Failed);
        assert_eq!(failed.view.screen, Screen::BiometricGate);
        assert_eq!(failed.view.biometric_error.as_deref(), Some(BIOMETRIC_FAILURE_MESSAGE));
        // retry is user-driven
        assert!(!failed.view.prompt_biometric);

        h.bio.push_passcode_result(true);
        let passed = h.gate.authenticate(ChallengeMethod::Passcode).await;
        assert_eq!(passed.outcome, ChallengeOutcome::Passed);
        assert_eq!(passed.view.screen, Screen::ProfileCompletion);
        assert_eq!(passed.view.biometric_error, None);
    }

    #[tokio::test]
    async fn test_repeated_failures_never_lock_out() {
        let h = harness(AuthSnapshot::signed_in("u1"), true, true);
        h.gate.on_launch().await;

        for _ in 0..10 {
            h.bio.push_biometric_result(false);
            let report = h.gate.authenticate(ChallengeMethod::Biometric).await;
            assert_eq!(report.outcome, ChallengeOutcome::Failed);
        }
        h.bio.push_biometric_result(true);
        let report = h.gate.authenticate(ChallengeMethod::Biometric).await;
        assert_eq!(report.outcome, ChallengeOutcome::Passed);
    }

    #[tokio::test]
    async fn test_challenge_outside_gate_is_not_required() {
        let h = harness(AuthSnapshot::signed_in("u1"), false, true);
        h.gate.on_launch().await;

        let report = h.gate.authenticate(ChallengeMethod::Biometric).await;

        assert_eq!(report.outcome, ChallengeOutcome::NotRequired);
        assert_eq!(h.bio.challenge_count(), 0);
    }

    #[tokio::test]
    async fn test_second_challenge_coalesces_into_pending_one() {
        let h = harness(AuthSnapshot::signed_in("u1"), true, true);
        h.gate.on_launch().await;
        let release = h.bio.hold_challenges();
        h.bio.push_biometric_result(true);

        let gate = Arc::clone(&h.gate);
        let pending = tokio::spawn(async move { gate.authenticate(ChallengeMethod::Biometric).await });
        while h.bio.challenge_count() == 0 {
            tokio::task::yield_now().await;
        }

        let second = h.gate.authenticate(ChallengeMethod::Biometric).await;
        assert_eq!(second.outcome, ChallengeOutcome::Coalesced);

        release.notify_one();
        let first = pending.await.unwrap();
        assert_eq!(first.outcome, ChallengeOutcome::Passed);
        assert_eq!(h.bio.challenge_count(), 1);
    }

    #[tokio::test]
    async fn test_result_from_ended_session_is_dropped() {
        let h = harness(AuthSnapshot::signed_in("u1"), true, true);
        h.gate.on_launch().await;
        let release = h.bio.hold_challenges();
        h.bio.push_biometric_result(true);

        let gate = Arc::clone(&h.gate);
        let pending = tokio::spawn(async move { gate.authenticate(ChallengeMethod::Biometric).await });
        while h.bio.challenge_count() == 0 {
            tokio::task::yield_now().await;
        }

        // sign out and back in while the prompt is up
        h.auth.logout();
        h.gate.on_auth_changed().await;
        h.auth.login("u1");
        let relogin = h.gate.on_auth_changed().await;
        assert!(!relogin.prompt_biometric);

        release.notify_one();
        let report = pending.await.unwrap();
        assert_eq!(report.outcome, ChallengeOutcome::Stale);
        assert_eq!(report.view.screen, Screen::BiometricGate);
        assert!(report.view.prompt_biometric);
        assert!(!h.gate.flags().await.biometric_auth_passed());
    }

    #[tokio::test]
    async fn test_consent_signed_mid_session() {
        let h = harness(AuthSnapshot::signed_in("u1"), false, false);
        assert_eq!(h.gate.on_launch().await.screen, Screen::ConsentRequired);

        h.consent.record_consent("Dr. Vega", Utc::now());
        assert_eq!(h.gate.current_view().await.screen, Screen::MainApplication);
    }

    #[tokio::test]
    async fn test_refresh_failure_does_not_change_resolution() {
        let mut auth = MockAuthService::new();
        auth.expect_snapshot()
            .returning(|| AuthSnapshot::signed_in("u9"));
        let (tx, rx) = tokio::sync::oneshot::channel();
        let tx = std::sync::Mutex::new(Some(tx));
        auth.expect_refresh_profile().times(1).returning(move |user_id| {
            assert_eq!(user_id, "u9");
            if let Some(tx) = tx.lock().unwrap().take() {
                let _ = tx.send(());
            }
            Err(anyhow::anyhow!("503 from account service"))
        });
        let mut consent = MockConsentService::new();
        consent.expect_has_user_consented().return_const(true);

        let gate = AppAccessGate::new(GateServices {
            biometric: Arc::new(ScriptedBiometrics::new(false, BiometricType::TouchId)),
            auth: Arc::new(auth),
            consent: Arc::new(consent),
            session_timeout: Arc::new(ManualSessionTimeout::new()),
        });
        gate.on_launch().await;

        let view = gate.on_foreground().await;
        rx.await.unwrap();

        assert_eq!(view.screen, Screen::MainApplication);
        assert_eq!(gate.current_view().await.screen, Screen::MainApplication);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_foreground_during_login_serializes() {
        for _ in 0..32 {
            let h = harness(AuthSnapshot::default(), true, true);
            h.gate.on_launch().await;
            h.auth.login("u1");

            let login = tokio::spawn({
                let gate = h.gate.clone();
                async move { gate.on_auth_changed().await }
            });
            let foreground = tokio::spawn({
                let gate = h.gate.clone();
                async move { gate.on_foreground().await }
            });
            login.await.unwrap();
            foreground.await.unwrap();

            let flags = h.gate.flags().await;
            assert!(flags.requires_biometric_auth());
            assert!(!flags.biometric_auth_passed());
            assert_eq!(h.timeout.start_count(), 1);
            assert_eq!(h.audit.events_of(HipaaEventType::UserLogin).len(), 1);
            assert_eq!(h.gate.current_view().await.screen, Screen::BiometricGate);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_foreground_during_logout_serializes() {
        for _ in 0..32 {
            let h = harness(AuthSnapshot::signed_in("u1"), true, true);
            h.gate.on_launch().await;
            h.bio.push_biometric_result(true);
            assert_eq!(
                h.gate.authenticate(ChallengeMethod::Biometric).await.outcome,
                ChallengeOutcome::Passed
            );
            h.auth.logout();

            let (logout, foreground) = tokio::join!(
                tokio::spawn({
                    let gate = h.gate.clone();
                    async move { gate.on_auth_changed().await }
                }),
                tokio::spawn({
                    let gate = h.gate.clone();
                    async move { gate.on_foreground().await }
                }),
            );
            logout.unwrap();
            foreground.unwrap();

            assert_eq!(h.gate.flags().await, SessionFlags::default());
            assert!(!h.timeout.is_monitoring());
            assert_eq!(h.audit.events_of(HipaaEventType::UserLogout).len(), 1);
            assert_eq!(h.gate.current_view().await.screen, Screen::Unauthenticated);
        }
    }

    #[test]
    fn test_prompt_copy_names_sensor() {
        let h = harness(AuthSnapshot::default(), true, false);
        let prompt = h.gate.biometric_prompt();
        assert_eq!(prompt.title, "Authentication Required");
        assert_eq!(prompt.subtitle, "Use Face ID to unlock SkinInsight Pro");
        assert_eq!(prompt.icon, "faceid");
    }
}
