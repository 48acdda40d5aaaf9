use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::{
    cli::OutputFormat,
    consent::ConsentStore,
    gate::{AppAccessGate, ChallengeOutcome, GateServices, GateView, Screen, SessionFlags},
    services::{
        AuthSnapshot, BiometricType, ChallengeMethod, InMemoryAuth, ManualSessionTimeout,
        ScriptedBiometrics,
    },
    session::{AuditEvent, AuditTrail},
    utils::GateError,
};

/// A scripted sequence of app events replayed against the gate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationScript {
    #[serde(default)]
    pub setup: SimulationSetup,
    #[serde(default)]
    pub steps: Vec<SimStep>,
}

/// Device and account state before the first step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSetup {
    pub biometric_enabled: bool,
    pub sensor: BiometricType,
    /// Restored session at launch, if any
    pub signed_in_as: Option<String>,
    pub guest: bool,
    pub consent_signed: bool,
    pub needs_profile_completion: bool,
    pub needs_company_setup: bool,
}

impl Default for SimulationSetup {
    fn default() -> Self {
        Self {
            biometric_enabled: true,
            sensor: BiometricType::FaceId,
            signed_in_as: None,
            guest: false,
            consent_signed: false,
            needs_profile_completion: false,
            needs_company_setup: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SimStep {
    Launch,
    Login { user_id: String },
    LoginGuest { user_id: String },
    Logout,
    Foreground,
    Biometric { success: bool },
    Passcode { success: bool },
    SignConsent {
        #[serde(default = "default_signature")]
        signature: String,
    },
    RevokeConsent,
    CompleteProfile,
    CompleteCompanySetup,
    SetBiometricEnabled { enabled: bool },
    ExpireSession,
}

fn default_signature() -> String {
    "signed".to_string()
}

impl SimStep {
    fn label(&self) -> String {
        match self {
            Self::Launch => "launch".to_string(),
            Self::Login { user_id } => format!("login {}", user_id),
            Self::LoginGuest { user_id } => format!("login guest {}", user_id),
            Self::Logout => "logout".to_string(),
            Self::Foreground => "foreground".to_string(),
            Self::Biometric { success } => format!("biometric ({})", pass_fail(*success)),
            Self::Passcode { success } => format!("passcode ({})", pass_fail(*success)),
            Self::SignConsent { .. } => "sign consent".to_string(),
            Self::RevokeConsent => "revoke consent".to_string(),
            Self::CompleteProfile => "complete profile".to_string(),
            Self::CompleteCompanySetup => "complete company setup".to_string(),
            Self::SetBiometricEnabled { enabled } => format!("biometrics {}", if *enabled { "on" } else { "off" }),
            Self::ExpireSession => "session idle timeout".to_string(),
        }
    }
}

fn pass_fail(success: bool) -> &'static str {
    if success {
        "pass"
    } else {
        "fail"
    }
}

impl SimulationScript {
    pub fn from_toml(source: &str) -> Result<Self, GateError> {
        toml::from_str(source).map_err(|e| GateError::ScriptError(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, GateError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }
}

/// One row of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub index: usize,
    pub step: String,
    pub screen: Screen,
    pub session_expired: bool,
    pub biometric_error: Option<String>,
    pub challenge: Option<ChallengeOutcome>,
    pub flags: SessionFlags,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub steps: Vec<StepRecord>,
    pub final_screen: Screen,
    pub audit: Vec<AuditEvent>,
}

/// Replays a script through a gate wired to in-memory collaborators
pub struct Simulation {
    gate: AppAccessGate,
    biometrics: Arc<ScriptedBiometrics>,
    auth: Arc<InMemoryAuth>,
    consent: Arc<ConsentStore>,
    session_timeout: Arc<ManualSessionTimeout>,
    audit: Arc<AuditTrail>,
}

impl Simulation {
    pub fn new(setup: &SimulationSetup) -> Self {
        let biometrics = Arc::new(ScriptedBiometrics::new(setup.biometric_enabled, setup.sensor));

        let mut snapshot = match (&setup.signed_in_as, setup.guest) {
            (Some(user_id), true) => AuthSnapshot::guest(user_id.as_str()),
            (Some(user_id), false) => AuthSnapshot::signed_in(user_id.as_str()),
            (None, _) => AuthSnapshot::default(),
        };
        snapshot.needs_profile_completion = setup.needs_profile_completion;
        snapshot.needs_company_setup = setup.needs_company_setup;
        let auth = Arc::new(InMemoryAuth::new(snapshot));

        let consent = Arc::new(ConsentStore::default());
        if setup.consent_signed {
            consent.record_consent("signed", Utc::now());
        }

        let session_timeout = Arc::new(ManualSessionTimeout::new());
        let audit = Arc::new(AuditTrail::new());

        let gate = AppAccessGate::new(GateServices {
            biometric: biometrics.clone(),
            auth: auth.clone(),
            consent: consent.clone(),
            session_timeout: session_timeout.clone(),
        })
        .with_audit(audit.clone());

        Self {
            gate,
            biometrics,
            auth,
            consent,
            session_timeout,
            audit,
        }
    }

    pub async fn run(script: &SimulationScript) -> SimulationReport {
        let simulation = Self::new(&script.setup);
        let mut steps = Vec::with_capacity(script.steps.len());
        let mut final_screen = Screen::Loading;

        for (index, step) in script.steps.iter().enumerate() {
            let (view, challenge) = simulation.apply(step).await;
            final_screen = view.screen;
            steps.push(StepRecord {
                index: index + 1,
                step: step.label(),
                screen: view.screen,
                session_expired: view.session_expired,
                biometric_error: view.biometric_error,
                challenge,
                flags: simulation.gate.flags().await,
            });
        }

        SimulationReport {
            steps,
            final_screen,
            audit: simulation.audit.events(),
        }
    }

    async fn apply(&self, step: &SimStep) -> (GateView, Option<ChallengeOutcome>) {
        match step {
            SimStep::Launch => (self.gate.on_launch().await, None),
            SimStep::Login { user_id } => {
                self.auth.login(user_id);
                (self.gate.on_auth_changed().await, None)
            }
            SimStep::LoginGuest { user_id } => {
                self.auth.login_as_guest(user_id);
                (self.gate.on_auth_changed().await, None)
            }
            SimStep::Logout => {
                self.auth.logout();
                (self.gate.on_auth_changed().await, None)
            }
            SimStep::Foreground => (self.gate.on_foreground().await, None),
            SimStep::Biometric { success } => {
                self.biometrics.push_biometric_result(*success);
                self.challenge(ChallengeMethod::Biometric).await
            }
            SimStep::Passcode { success } => {
                self.biometrics.push_passcode_result(*success);
                self.challenge(ChallengeMethod::Passcode).await
            }
            SimStep::SignConsent { signature } => {
                self.consent.record_consent(signature, Utc::now());
                (self.gate.current_view().await, None)
            }
            SimStep::RevokeConsent => {
                self.consent.revoke();
                (self.gate.current_view().await, None)
            }
            SimStep::CompleteProfile => {
                self.auth.update(|s| s.needs_profile_completion = false);
                (self.gate.on_auth_changed().await, None)
            }
            SimStep::CompleteCompanySetup => {
                self.auth.update(|s| s.needs_company_setup = false);
                (self.gate.on_auth_changed().await, None)
            }
            SimStep::SetBiometricEnabled { enabled } => {
                // takes effect at the next recompute trigger
                self.biometrics.set_enabled(*enabled);
                (self.gate.current_view().await, None)
            }
            SimStep::ExpireSession => {
                self.session_timeout.set_expired(true);
                (self.gate.current_view().await, None)
            }
        }
    }

    async fn challenge(&self, method: ChallengeMethod) -> (GateView, Option<ChallengeOutcome>) {
        let report = self.gate.authenticate(method).await;
        if report.outcome == ChallengeOutcome::NotRequired {
            self.biometrics.clear_queued();
        }
        (report.view, Some(report.outcome))
    }
}

impl SimulationReport {
    /// Format the report according to the output format
    pub fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(self).unwrap_or_else(|e| {
                format!("{{\"error\": \"Failed to serialize report: {}\"}}", e)
            }),
            OutputFormat::Text => {
                let mut output = String::new();
                for record in &self.steps {
                    output.push_str(&format!(
                        "[{:>2}] {:<28} -> {}",
                        record.index, record.step, record.screen
                    ));
                    if let Some(outcome) = record.challenge {
                        output.push_str(&format!(" ({:?})", outcome));
                    }
                    if record.session_expired {
                        output.push_str(" [session expired]");
                    }
                    output.push('\n');
                    if let Some(ref error) = record.biometric_error {
                        output.push_str(&format!("      {}\n", error));
                    }
                }

                if !self.audit.is_empty() {
                    output.push_str("\n--- Audit ---\n");
                    for event in &self.audit {
                        output.push_str(&format!("• {:?} {}\n", event.event_type, event.user_id));
                    }
                }

                output.push_str(&format!("\nFinal screen: {}\n", self.final_screen));
                output
            }
            OutputFormat::Markdown => {
                let mut output = String::new();

                output.push_str("## Gate Simulation\n\n");
                output.push_str("| # | Step | Screen | Challenge | Overlay |\n");
                output.push_str("|---|------|--------|-----------|---------|\n");
                for record in &self.steps {
                    output.push_str(&format!(
                        "| {} | {} | {} | {} | {} |\n",
                        record.index,
                        record.step,
                        record.screen,
                        record
                            .challenge
                            .map(|c| format!("{:?}", c))
                            .unwrap_or_default(),
                        if record.session_expired { "session expired" } else { "" }
                    ));
                }
                output.push('\n');

                if !self.audit.is_empty() {
                    output.push_str("## Audit Events\n\n");
                    for event in &self.audit {
                        output.push_str(&format!("- `{:?}` {}\n", event.event_type, event.user_id));
                    }
                    output.push('\n');
                }

                output.push_str("---\n");
                output.push_str(&format!("*Final screen: {}*\n", self.final_screen));
                output
            }
        }
    }
}
