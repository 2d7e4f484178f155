//! Confirmation session state machine.
//!
//! [`PollSession`] holds no timers and performs no I/O. The poller feeds it
//! the result of each check and acts on the returned [`Step`], which keeps
//! every transition testable without a runtime.

use crate::config::PollConfig;
use crate::payment::status::RemoteStatus;
use std::fmt;
use std::time::Duration;

/// Lifecycle state of a confirmation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Waiting on a terminal remote result.
    Pending,
    /// Remote reported the payment as completed.
    Succeeded,
    /// Remote explicitly rejected the payment.
    Failed,
    /// Attempt budget exhausted without a terminal result.
    TimedOut,
    /// Owner cancelled the session.
    Cancelled,
}

impl SessionState {
    /// Returns true for absorbing states.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::TimedOut => "timed out",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// What the driver must do after a check has been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Issue the next check after the given delay.
    Retry(Duration),
    /// The session just reached this terminal state.
    Finished(SessionState),
    /// The session was already inactive; the result was discarded.
    Ignored,
}

/// One in-flight payment confirmation.
#[derive(Debug, Clone)]
pub struct PollSession {
    subject_id: String,
    attempt_count: u32,
    max_attempts: u32,
    interval: Duration,
    state: SessionState,
    active: bool,
    last_transport_error: Option<String>,
}

impl PollSession {
    /// Create a pending session for `subject_id`.
    ///
    /// An attempt budget of zero is raised to one so that at least one check
    /// is always issued, and the interval never drops below
    /// [`MIN_POLL_INTERVAL_MS`](crate::config::MIN_POLL_INTERVAL_MS).
    #[must_use]
    pub fn new(subject_id: impl Into<String>, policy: &PollConfig) -> Self {
        Self {
            subject_id: subject_id.into(),
            attempt_count: 0,
            max_attempts: policy.max_attempts.max(1),
            interval: policy.interval(),
            state: SessionState::Pending,
            active: true,
            last_transport_error: None,
        }
    }

    /// Record a status reported by the remote.
    pub fn record(&mut self, status: RemoteStatus) -> Step {
        if !self.active {
            return Step::Ignored;
        }
        self.attempt_count += 1;

        match status {
            RemoteStatus::Completed => self.finish(SessionState::Succeeded),
            RemoteStatus::Failed => self.finish(SessionState::Failed),
            RemoteStatus::Pending => self.retry_or_time_out(),
        }
    }

    /// Record a check that failed before the remote answered.
    ///
    /// Counts against the budget exactly like a pending result.
    pub fn record_transport_error(&mut self, message: impl Into<String>) -> Step {
        if !self.active {
            return Step::Ignored;
        }
        self.attempt_count += 1;
        self.last_transport_error = Some(message.into());
        self.retry_or_time_out()
    }

    /// Cancel the session.
    ///
    /// Returns true only for the call that actually moved the session out of
    /// `Pending`; repeated calls and calls on terminal sessions are no-ops.
    pub fn cancel(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.state = SessionState::Cancelled;
        true
    }

    fn retry_or_time_out(&mut self) -> Step {
        if self.attempt_count >= self.max_attempts {
            self.finish(SessionState::TimedOut)
        } else {
            Step::Retry(self.interval)
        }
    }

    fn finish(&mut self, state: SessionState) -> Step {
        self.active = false;
        self.state = state;
        Step::Finished(state)
    }

    /// Subject being confirmed.
    #[must_use]
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Number of checks recorded so far.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempt_count
    }

    /// Attempt budget.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay between checks.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether further checks may be issued.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Message of the most recent transport failure, if any.
    #[must_use]
    pub fn last_transport_error(&self) -> Option<&str> {
        self.last_transport_error.as_deref()
    }
}
