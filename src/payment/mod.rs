//! Payment confirmation polling.
//!
//! After checkout the payment gateway settles asynchronously. This module
//! repeatedly asks the platform for the status of a payment reference until
//! the platform reports a terminal result or the attempt budget runs out.
//!
//! # Architecture
//!
//! ```text
//!  start(reference)
//!        │
//!        ▼
//! ┌─────────────────────┐
//! │ check_status        │◀──────────────┐
//! └─────────┬───────────┘               │
//!           │                           │
//!    ┌──────┼──────────────┐            │
//!    │      │              │            │
//! COMPLETED FAILED  PENDING / error     │
//!    │      │              │            │
//!    ▼      ▼       attempts < max? ─yes─┘ (sleep interval)
//! Succeeded Failed         │
//!                          no
//!                          ▼
//!                       TimedOut
//! ```
//!
//! Transport errors consume budget exactly like `PENDING`: the payment may
//! still be settling while the client is offline. Cancelling a session stops
//! any scheduled check and suppresses the completion callback.

mod poller;
mod session;
mod status;

pub use poller::{Completion, ConfirmationPoller, PollHandle, PollOutcome};
pub use session::{PollSession, SessionState, Step};
pub use status::{RemoteStatus, StatusReport, StatusSource};
