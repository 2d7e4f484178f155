//! # ticketsafi-client
//!
//! Client-side confirmation flows for the TicketSafi ticketing platform.
//!
//! ## Features
//!
//! - **Payment confirmation polling**: drive a payment reference to a terminal
//!   state against the platform's verification endpoint, with a bounded
//!   attempt budget and owner-controlled cancellation
//! - **Gate ticket scanning**: single-flight verification of decoded QR
//!   ticket hashes for organizer and scanner staff
//! - **Storefront lookup**: an organizer's public store with its upcoming
//!   events and ticket tiers
//! - **HTTP adapters** for the platform endpoints
//!
//! ## Example
//!
//! ```rust,ignore
//! use ticketsafi_client::{ApiClient, ClientConfig, ConfirmationPoller, HttpStatusSource};
//!
//! #[tokio::main]
//! async fn main() -> ticketsafi_client::Result<()> {
//!     let config = ClientConfig::default();
//!     let source = HttpStatusSource::new(ApiClient::new(&config)?);
//!     let poller = ConfirmationPoller::new(source, config.poll.clone());
//!
//!     if let Some(completion) = poller.confirm("REF123").await {
//!         println!("{}", completion.outcome.advisory());
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod event;
pub mod payment;
pub mod scanner;
pub mod store;

pub use api::{ApiClient, HttpStatusSource, HttpStoreSource, HttpTicketVerifier};
pub use config::{ClientConfig, PollConfig};
pub use error::{Error, Result};
pub use event::{create_event_channel, PollEvent, PollEventsChannel, PollEventsSender};
pub use payment::{
    Completion, ConfirmationPoller, PollHandle, PollOutcome, PollSession, RemoteStatus,
    SessionState, StatusReport, StatusSource, Step,
};
pub use scanner::{GateScanner, ScanStats, ScanVerdict, StaffRole, TicketDetails, TicketVerifier};
pub use store::{Event, EventCategory, Store, TicketTier};
