use anyhow::Result;
use async_trait::async_trait;
use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch, Mutex};

use super::driver::{GateEvent, GateHandle, GateRuntime};
use crate::{
    app::{Config, Preferences},
    consent::ConsentStore,
    constants::{
        BIOMETRIC_PROMPT_REASON, PASSCODE_FALLBACK_TITLE, SESSION_EXPIRED_MESSAGE,
        SESSION_EXPIRED_TITLE,
    },
    gate::{AppAccessGate, BiometricPrompt, GateServices, GateView, Screen},
    services::{BiometricService, BiometricType, ChallengeMethod, InMemoryAuth},
    session::{AuditTrail, InactivityMonitor},
    utils::log_info,
};

/// Biometric service answered from the console: each challenge waits for
/// the operator to type `pass` or `fail`
pub struct ConsoleBiometrics {
    enabled: bool,
    /// Set while a challenge waits for an answer
    pending: AtomicBool,
    tx: mpsc::UnboundedSender<bool>,
    answers: Mutex<mpsc::UnboundedReceiver<bool>>,
}

impl ConsoleBiometrics {
    pub fn new(enabled: bool) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            enabled,
            pending: AtomicBool::new(false),
            tx,
            answers: Mutex::new(rx),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Answer the pending prompt. Returns false when no prompt is waiting;
    /// the answer is then discarded rather than kept for a later challenge.
    pub fn answer(&self, success: bool) -> bool {
        self.pending.swap(false, Ordering::SeqCst) && self.tx.send(success).is_ok()
    }

    async fn next_answer(&self, reason: &str) -> bool {
        let mut answers = self.answers.lock().await;
        self.pending.store(true, Ordering::SeqCst);
        println!("{}", format!("🔐 {} (type pass / fail)", reason).cyan());
        let answer = answers.recv().await.unwrap_or(false);
        self.pending.store(false, Ordering::SeqCst);
        answer
    }
}

#[async_trait]
impl BiometricService for ConsoleBiometrics {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_hardware_available(&self) -> bool {
        true
    }

    fn biometric_type(&self) -> BiometricType {
        BiometricType::FaceId
    }

    async fn challenge(&self) -> bool {
        self.next_answer(BIOMETRIC_PROMPT_REASON).await
    }

    async fn challenge_with_fallback_passcode(&self) -> bool {
        self.next_answer(PASSCODE_FALLBACK_TITLE).await
    }
}

const HELP: &str = "commands: launch | login <user> | guest <user> | logout | foreground | \
pass | fail | passcode | consent | revoke | profile | company | activity | audit [csv] | quit";

/// Interactive session wiring the gate runtime to console-driven collaborators
pub struct Console {
    handle: GateHandle,
    biometrics: Arc<ConsoleBiometrics>,
    prompt: BiometricPrompt,
    auth: Arc<InMemoryAuth>,
    consent: Arc<ConsentStore>,
    monitor: Arc<InactivityMonitor>,
    audit: Arc<AuditTrail>,
}

impl Console {
    pub fn new(config: &Config, prefs: &Preferences) -> (Self, watch::Receiver<GateView>) {
        let enabled = prefs.biometric_enabled_or(config.biometric.enabled_by_default);
        let biometrics = Arc::new(ConsoleBiometrics::new(enabled));
        let auth = Arc::new(InMemoryAuth::default());
        let consent = Arc::new(ConsentStore::default());
        let monitor = Arc::new(InactivityMonitor::from_config(&config.session));
        let audit = Arc::new(AuditTrail::new());

        let gate = AppAccessGate::new(GateServices {
            biometric: biometrics.clone(),
            auth: auth.clone(),
            consent: consent.clone(),
            session_timeout: monitor.clone(),
        })
        .with_audit(audit.clone());
        let prompt = gate.biometric_prompt();

        let (handle, views, _task) = GateRuntime::spawn(Arc::new(gate));
        handle.forward_session_expiry(monitor.subscribe_expiry());
        log_info(
            "🧴",
            format!(
                "gate ready (biometrics {}, idle timeout {}s)",
                if enabled { "on" } else { "off" },
                monitor.timeout().as_secs()
            ),
        );

        (
            Self {
                handle,
                biometrics,
                prompt,
                auth,
                consent,
                monitor,
                audit,
            },
            views,
        )
    }

    /// Read commands from stdin until `quit` or EOF
    pub async fn run(self, mut views: watch::Receiver<GateView>) -> Result<()> {
        let prompt = self.prompt.clone();
        tokio::spawn(async move {
            while views.changed().await.is_ok() {
                let view = views.borrow_and_update().clone();
                print_view(&view, &prompt);
            }
        });

        println!("{}", HELP.dimmed());
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let mut words = line.split_whitespace();
            let Some(command) = words.next() else {
                continue;
            };
            if !self.handle_line(command, words.next()).await? {
                break;
            }
        }

        self.handle.send(GateEvent::Shutdown).await?;
        Ok(())
    }

    async fn handle_line(&self, command: &str, arg: Option<&str>) -> Result<bool> {
        match command {
            "launch" => self.handle.send(GateEvent::Launch).await?,
            "login" | "guest" => {
                let user = arg.unwrap_or("clinician");
                if command == "guest" {
                    self.auth.login_as_guest(user);
                } else {
                    self.auth.login(user);
                }
                self.handle.send(GateEvent::AuthChanged).await?;
            }
            "logout" => {
                self.auth.logout();
                self.handle.send(GateEvent::AuthChanged).await?;
            }
            "foreground" => {
                self.monitor.on_foreground();
                self.handle.send(GateEvent::Foreground).await?;
            }
            "pass" | "fail" => {
                if !self.biometrics.answer(command == "pass") {
                    println!("{}", "no prompt pending".yellow());
                }
            }
            "passcode" => {
                self.handle
                    .send(GateEvent::Retry(ChallengeMethod::Passcode))
                    .await?
            }
            "consent" => {
                self.consent.record_consent(arg.unwrap_or("signed"), chrono::Utc::now());
                self.handle.send(GateEvent::Reevaluate).await?;
            }
            "revoke" => {
                self.consent.revoke();
                self.handle.send(GateEvent::Reevaluate).await?;
            }
            "profile" => {
                self.auth.update(|s| s.needs_profile_completion = !s.needs_profile_completion);
                self.handle.send(GateEvent::AuthChanged).await?;
            }
            "company" => {
                self.auth.update(|s| s.needs_company_setup = !s.needs_company_setup);
                self.handle.send(GateEvent::AuthChanged).await?;
            }
            "activity" => {
                self.monitor.record_activity();
                self.handle.send(GateEvent::Reevaluate).await?;
            }
            "audit" => match arg {
                Some("csv") => print!("{}", self.audit.export_csv()?),
                _ => println!("{}", self.audit.export_json()?),
            },
            "quit" | "exit" => return Ok(false),
            _ => println!("{}", HELP.dimmed()),
        }
        Ok(true)
    }
}

fn print_view(view: &GateView, prompt: &BiometricPrompt) {
    println!("→ {}", view.screen.to_string().bold());
    if view.screen == Screen::BiometricGate {
        println!("  {} {}", prompt.icon, prompt.title.bold());
        println!("  {}", prompt.subtitle);
        println!("  {}", format!("[{}]", prompt.fallback_title).dimmed());
    }
    if let Some(error) = &view.biometric_error {
        println!("  {}", error.red());
    }
    if view.session_expired {
        println!("  {}: {}", SESSION_EXPIRED_TITLE.yellow(), SESSION_EXPIRED_MESSAGE);
    }
}
