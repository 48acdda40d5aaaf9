use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::constants::GATE_EVENT_QUEUE_CAPACITY;
use crate::gate::{AppAccessGate, ChallengeOutcome, ChallengeReport, GateView, Screen};
use crate::services::ChallengeMethod;

/// Triggers the host app feeds into the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEvent {
    Launch,
    AuthChanged,
    Foreground,
    /// User tapped "Authenticate" or "Use Passcode" on the gate screen
    Retry(ChallengeMethod),
    /// Consent, profile or company data changed; re-resolve only
    Reevaluate,
    Shutdown,
}

enum Message {
    Event(GateEvent),
    ChallengeFinished(ChallengeReport),
}

/// Sending half used by the host app
#[derive(Clone)]
pub struct GateHandle {
    tx: mpsc::Sender<Message>,
}

impl GateHandle {
    pub async fn send(&self, event: GateEvent) -> Result<()> {
        self.tx
            .send(Message::Event(event))
            .await
            .context("gate runtime has stopped")
    }

    /// Re-resolve the gate whenever the idle monitor's expired flag flips.
    /// The forwarder holds no strong sender, so it never keeps the loop alive.
    pub fn forward_session_expiry(&self, mut expiry: watch::Receiver<bool>) -> JoinHandle<()> {
        let tx = self.tx.downgrade();
        tokio::spawn(async move {
            while expiry.changed().await.is_ok() {
                let expired = *expiry.borrow_and_update();
                let Some(tx) = tx.upgrade() else {
                    break;
                };
                debug!(expired, "session expiry changed; re-resolving");
                if tx.send(Message::Event(GateEvent::Reevaluate)).await.is_err() {
                    break;
                }
            }
        })
    }
}

/// Single-writer loop around the gate. Events are handled strictly one at a
/// time; every resolved view is published on a watch channel.
pub struct GateRuntime {
    gate: Arc<AppAccessGate>,
    rx: mpsc::Receiver<Message>,
    /// Weak so the loop ends once every handle is dropped
    feedback: mpsc::WeakSender<Message>,
    views: watch::Sender<GateView>,
}

impl GateRuntime {
    /// Start the loop; returns the event handle, the view stream and the task
    pub fn spawn(gate: Arc<AppAccessGate>) -> (GateHandle, watch::Receiver<GateView>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(GATE_EVENT_QUEUE_CAPACITY);
        let (views, view_rx) = watch::channel(GateView::new(Screen::Loading));

        let runtime = Self {
            gate,
            rx,
            feedback: tx.downgrade(),
            views,
        };
        let task = tokio::spawn(runtime.run());

        (GateHandle { tx }, view_rx, task)
    }

    async fn run(mut self) {
        while let Some(message) = self.rx.recv().await {
            let view = match message {
                Message::Event(GateEvent::Launch) => self.gate.on_launch().await,
                Message::Event(GateEvent::AuthChanged) => self.gate.on_auth_changed().await,
                Message::Event(GateEvent::Foreground) => self.gate.on_foreground().await,
                Message::Event(GateEvent::Reevaluate) => self.gate.current_view().await,
                Message::Event(GateEvent::Retry(method)) => {
                    self.start_challenge(method);
                    continue;
                }
                Message::Event(GateEvent::Shutdown) => break,
                Message::ChallengeFinished(report) => {
                    if report.outcome == ChallengeOutcome::Coalesced {
                        continue;
                    }
                    // events may have landed since the report was built
                    let mut view = self.gate.current_view().await;
                    view.prompt_biometric |=
                        report.view.prompt_biometric && view.screen == Screen::BiometricGate;
                    view
                }
            };

            if view.prompt_biometric {
                self.start_challenge(ChallengeMethod::Biometric);
            }
            self.views.send_replace(view);
        }
        debug!("gate runtime stopped");
    }

    fn start_challenge(&self, method: ChallengeMethod) {
        let Some(tx) = self.feedback.upgrade() else {
            return;
        };
        let gate = Arc::clone(&self.gate);
        tokio::spawn(async move {
            let report = gate.authenticate(method).await;
            debug!("{:?} challenge finished: {:?}", method, report.outcome);
            let _ = tx.send(Message::ChallengeFinished(report)).await;
        });
    }
}
