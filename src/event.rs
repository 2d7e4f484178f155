//! Poll diagnostics event system.

use crate::payment::SessionState;
use tokio::sync::broadcast;

/// Diagnostic events emitted by confirmation sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    /// A status check is about to be issued.
    CheckIssued {
        /// Subject being confirmed.
        subject_id: String,
        /// 1-based attempt number.
        attempt: u32,
    },

    /// A status check failed at the transport level and counts as pending.
    TransientFailure {
        /// Subject being confirmed.
        subject_id: String,
        /// 1-based attempt number.
        attempt: u32,
        /// Error message.
        message: String,
    },

    /// The remote still reports the subject as pending.
    StillPending {
        /// Subject being confirmed.
        subject_id: String,
        /// 1-based attempt number.
        attempt: u32,
    },

    /// The session reached a terminal state.
    Resolved {
        /// Subject being confirmed.
        subject_id: String,
        /// Final state.
        state: SessionState,
    },

    /// The owner cancelled the session.
    Cancelled {
        /// Subject being confirmed.
        subject_id: String,
    },
}

/// Channel for receiving poll events.
pub type PollEventsChannel = broadcast::Receiver<PollEvent>;

/// Sender for poll events.
pub type PollEventsSender = broadcast::Sender<PollEvent>;

/// Create a new event channel pair.
#[must_use]
pub fn create_event_channel() -> (PollEventsSender, PollEventsChannel) {
    broadcast::channel(256)
}
