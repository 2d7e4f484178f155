//! Asynchronous driver for confirmation sessions.

use crate::config::PollConfig;
use crate::error::{Error, Result};
use crate::event::{PollEvent, PollEventsSender};
use crate::payment::session::{PollSession, SessionState, Step};
use crate::payment::status::{StatusReport, StatusSource};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const SUPPORT_ADVISORY: &str =
    "We couldn't confirm your payment. If you were charged, please contact support.";

/// Terminal outcome delivered to the session owner.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The payment settled.
    Succeeded {
        /// Response that confirmed the payment, including order metadata.
        payload: StatusReport,
    },
    /// The platform rejected the payment.
    Failed {
        /// Response that reported the rejection.
        payload: StatusReport,
    },
    /// No terminal result within the attempt budget.
    TimedOut {
        /// Checks issued.
        attempts: u32,
        /// Most recent transport failure, if any check failed to reach the API.
        last_error: Option<String>,
    },
}

impl PollOutcome {
    /// Session state corresponding to this outcome.
    #[must_use]
    pub fn state(&self) -> SessionState {
        match self {
            Self::Succeeded { .. } => SessionState::Succeeded,
            Self::Failed { .. } => SessionState::Failed,
            Self::TimedOut { .. } => SessionState::TimedOut,
        }
    }

    /// Returns true if the payment was confirmed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Success payload, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&StatusReport> {
        match self {
            Self::Succeeded { payload } => Some(payload),
            Self::Failed { .. } | Self::TimedOut { .. } => None,
        }
    }

    /// User-facing message for the outcome.
    ///
    /// Rejections and timeouts share the same advice because in both cases
    /// the customer may already have been charged.
    #[must_use]
    pub fn advisory(&self) -> &'static str {
        match self {
            Self::Succeeded { .. } => "Payment successful. Your ticket has been emailed to you.",
            Self::Failed { .. } | Self::TimedOut { .. } => SUPPORT_ADVISORY,
        }
    }
}

/// Report handed to the completion callback.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Subject that was confirmed.
    pub subject_id: String,
    /// Terminal outcome.
    pub outcome: PollOutcome,
    /// Checks issued over the session.
    pub attempts: u32,
    /// When the terminal state was reached.
    pub finished_at: DateTime<Utc>,
}

/// Spawns and drives confirmation sessions against a [`StatusSource`].
pub struct ConfirmationPoller<S> {
    source: Arc<S>,
    policy: PollConfig,
    events: Option<PollEventsSender>,
}

impl<S> ConfirmationPoller<S>
where
    S: StatusSource + 'static,
{
    /// Create a poller using the given status source and policy.
    #[must_use]
    pub fn new(source: S, policy: PollConfig) -> Self {
        Self {
            source: Arc::new(source),
            policy,
            events: None,
        }
    }

    /// Publish diagnostic events for every session on `events`.
    #[must_use]
    pub fn with_events(mut self, events: PollEventsSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Polling policy applied to new sessions.
    #[must_use]
    pub fn policy(&self) -> &PollConfig {
        &self.policy
    }

    /// Start confirming `subject_id`.
    ///
    /// The first check is issued immediately. `on_complete` runs at most once,
    /// when the session reaches a terminal state, and never after the session
    /// has been cancelled. Dropping the returned handle cancels the session.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(&self, subject_id: impl Into<String>, on_complete: F) -> PollHandle
    where
        F: FnOnce(Completion) + Send + 'static,
    {
        let session = Arc::new(Mutex::new(PollSession::new(subject_id, &self.policy)));
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let task = tokio::spawn(drive(
            Arc::clone(&self.source),
            Arc::clone(&session),
            cancel_rx,
            self.events.clone(),
            on_complete,
        ));

        PollHandle {
            session,
            cancel_tx,
            task: Some(task),
            events: self.events.clone(),
        }
    }

    /// Confirm `subject_id` and wait for the outcome.
    ///
    /// Returns `None` if the session was cancelled, which only happens when
    /// this future is dropped before completion.
    pub async fn confirm(&self, subject_id: impl Into<String>) -> Option<Completion> {
        let (tx, rx) = oneshot::channel();
        let _handle = self.start(subject_id, move |completion| {
            let _ = tx.send(completion);
        });
        rx.await.ok()
    }
}

/// Owner's handle on a running confirmation session.
#[must_use = "dropping a PollHandle cancels the session"]
pub struct PollHandle {
    session: Arc<Mutex<PollSession>>,
    cancel_tx: watch::Sender<bool>,
    task: Option<JoinHandle<SessionState>>,
    events: Option<PollEventsSender>,
}

impl PollHandle {
    /// Cancel the session.
    ///
    /// Safe to call at any time and any number of times. Has no effect once
    /// the session is terminal.
    pub fn cancel(&self) {
        let cancelled = self.session.lock().cancel();
        let _ = self.cancel_tx.send(true);

        if cancelled {
            let subject_id = self.subject_id();
            info!("Payment confirmation for {} cancelled", subject_id);
            if let Some(events) = &self.events {
                let _ = events.send(PollEvent::Cancelled { subject_id });
            }
        }
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session.lock().state()
    }

    /// Checks recorded so far.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.session.lock().attempts()
    }

    /// Whether the session may still issue checks.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.lock().is_active()
    }

    /// Subject being confirmed.
    #[must_use]
    pub fn subject_id(&self) -> String {
        self.session.lock().subject_id().to_string()
    }

    /// Wait for the session task to stop and return the final state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Task`] if the session task panicked.
    pub async fn join(mut self) -> Result<SessionState> {
        match self.task.take() {
            Some(task) => task.await.map_err(|e| Error::Task(e.to_string())),
            None => Ok(self.state()),
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn drive<S, F>(
    source: Arc<S>,
    session: Arc<Mutex<PollSession>>,
    mut cancel_rx: watch::Receiver<bool>,
    events: Option<PollEventsSender>,
    on_complete: F,
) -> SessionState
where
    S: StatusSource + ?Sized,
    F: FnOnce(Completion) + Send + 'static,
{
    let subject_id = session.lock().subject_id().to_string();
    let emit = |event: PollEvent| {
        if let Some(events) = &events {
            let _ = events.send(event);
        }
    };

    loop {
        let attempt = {
            let session = session.lock();
            if !session.is_active() {
                return session.state();
            }
            session.attempts() + 1
        };

        debug!("Checking payment {} (attempt {})", subject_id, attempt);
        emit(PollEvent::CheckIssued {
            subject_id: subject_id.clone(),
            attempt,
        });

        let result = tokio::select! {
            biased;
            () = cancelled(&mut cancel_rx) => return session.lock().state(),
            result = source.check_status(&subject_id) => result,
        };

        let (step, report) = match result {
            Ok(report) => (session.lock().record(report.status), Some(report)),
            Err(e) => {
                warn!(
                    "Payment check for {} failed (attempt {}): {}",
                    subject_id, attempt, e
                );
                emit(PollEvent::TransientFailure {
                    subject_id: subject_id.clone(),
                    attempt,
                    message: e.to_string(),
                });
                (session.lock().record_transport_error(e.to_string()), None)
            }
        };

        match step {
            Step::Ignored => return session.lock().state(),
            Step::Retry(delay) => {
                if report.is_some() {
                    emit(PollEvent::StillPending {
                        subject_id: subject_id.clone(),
                        attempt,
                    });
                }
                tokio::select! {
                    biased;
                    () = cancelled(&mut cancel_rx) => return session.lock().state(),
                    () = tokio::time::sleep(delay) => {}
                }
            }
            Step::Finished(state) => {
                let (attempts, last_error) = {
                    let session = session.lock();
                    (
                        session.attempts(),
                        session.last_transport_error().map(str::to_string),
                    )
                };
                let outcome = match report {
                    Some(payload) if state == SessionState::Succeeded => {
                        PollOutcome::Succeeded { payload }
                    }
                    Some(payload) if state == SessionState::Failed => {
                        PollOutcome::Failed { payload }
                    }
                    _ => PollOutcome::TimedOut {
                        attempts,
                        last_error,
                    },
                };

                info!(
                    "Payment confirmation for {} {} after {} attempt(s)",
                    subject_id, state, attempts
                );
                emit(PollEvent::Resolved {
                    subject_id: subject_id.clone(),
                    state,
                });
                on_complete(Completion {
                    subject_id,
                    outcome,
                    attempts,
                    finished_at: Utc::now(),
                });
                return state;
            }
        }
    }
}

/// Resolves once the owner cancels or drops its handle.
async fn cancelled(cancel_rx: &mut watch::Receiver<bool>) {
    let _ = cancel_rx.wait_for(|cancelled| *cancelled).await;
}
