//! Gate ticket scanning.
//!
//! Staff point a camera at a ticket; the decoding library hands us the QR
//! text and the platform decides whether the ticket is valid. A scanner
//! handles one ticket at a time: after a scan it stays paused, ignoring
//! further decoded frames, until the operator resumes it.

use crate::error::{Error, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Message shown when the platform gives no reason for a rejection.
pub const DEFAULT_REJECTION_MESSAGE: &str = "Invalid Ticket";

/// Account role as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StaffRole {
    /// Event organizer.
    Organizer,
    /// Gate staff allowed to scan tickets.
    Scanner,
    /// Ticket buyer.
    Attendee,
    /// Any other role.
    #[serde(other)]
    Other,
}

impl StaffRole {
    /// Returns true if the role may verify tickets at the gate.
    #[must_use]
    pub fn can_scan(self) -> bool {
        matches!(self, Self::Organizer | Self::Scanner)
    }
}

impl FromStr for StaffRole {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "ORGANIZER" => Self::Organizer,
            "SCANNER" => Self::Scanner,
            "ATTENDEE" => Self::Attendee,
            _ => Self::Other,
        })
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Organizer => "ORGANIZER",
            Self::Scanner => "SCANNER",
            Self::Attendee => "ATTENDEE",
            Self::Other => "OTHER",
        };
        f.write_str(name)
    }
}

/// Ticket holder details returned for a valid ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketDetails {
    /// Name on the ticket.
    #[serde(default)]
    pub attendee_name: Option<String>,
    /// Ticket tier.
    #[serde(default)]
    pub tier_name: Option<String>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TicketDetails {
    /// Name to display, falling back to "Guest".
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.attendee_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or("Guest")
    }
}

/// Platform decision for a scanned ticket.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanVerdict {
    /// Ticket accepted.
    Valid(TicketDetails),
    /// Ticket refused.
    Rejected {
        /// Reason shown to gate staff.
        message: String,
        /// Raw error body, when the platform sent one.
        details: Option<Value>,
    },
}

impl ScanVerdict {
    /// Rejection with the default message and no details.
    #[must_use]
    pub fn invalid() -> Self {
        Self::Rejected {
            message: DEFAULT_REJECTION_MESSAGE.to_string(),
            details: None,
        }
    }

    /// Returns true for an accepted ticket.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Verifies decoded QR payloads against the platform.
#[async_trait]
pub trait TicketVerifier: Send + Sync {
    /// Verify the ticket identified by `qr_hash`.
    ///
    /// `Ok` carries the platform's decision; `Err` means no decision was
    /// obtained.
    async fn verify(&self, qr_hash: &str) -> Result<ScanVerdict>;
}

/// Scan counters for monitoring.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    /// Tickets accepted.
    pub valid: u64,
    /// Tickets refused (including failed verifications).
    pub rejected: u64,
    /// Decoded frames dropped while paused.
    pub ignored: u64,
}

/// Single-flight ticket scanner for gate staff.
pub struct GateScanner<V> {
    verifier: V,
    role: StaffRole,
    paused: AtomicBool,
    last_verdict: Mutex<Option<ScanVerdict>>,
    stats: Mutex<ScanStats>,
}

impl<V: TicketVerifier> GateScanner<V> {
    /// Create a scanner operated by a user with `role`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] unless the role is organizer or scanner.
    pub fn new(verifier: V, role: StaffRole) -> Result<Self> {
        if !role.can_scan() {
            warn!("Refusing scanner access for role {}", role);
            return Err(Error::Unauthorized(role.to_string()));
        }

        info!("Gate scanner ready (role={})", role);
        Ok(Self {
            verifier,
            role,
            paused: AtomicBool::new(false),
            last_verdict: Mutex::new(None),
            stats: Mutex::new(ScanStats::default()),
        })
    }

    /// Submit a decoded QR payload.
    ///
    /// Returns `None` without contacting the platform when the scanner is
    /// paused. Otherwise pauses the scanner and returns the verdict, which
    /// stays current until [`GateScanner::resume`] is called.
    pub async fn submit(&self, decoded_text: &str) -> Option<ScanVerdict> {
        if self.paused.swap(true, Ordering::AcqRel) {
            debug!("Scanner paused, ignoring decoded frame");
            self.stats.lock().ignored += 1;
            return None;
        }

        let verdict = match self.verifier.verify(decoded_text).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!("Ticket verification failed: {}", e);
                ScanVerdict::invalid()
            }
        };

        {
            let mut stats = self.stats.lock();
            if verdict.is_valid() {
                stats.valid += 1;
            } else {
                stats.rejected += 1;
            }
        }

        match &verdict {
            ScanVerdict::Valid(details) => info!(
                "Valid ticket for {} ({})",
                details.display_name(),
                details.tier_name.as_deref().unwrap_or("unknown tier")
            ),
            ScanVerdict::Rejected { message, .. } => info!("Ticket rejected: {}", message),
        }

        *self.last_verdict.lock() = Some(verdict.clone());
        Some(verdict)
    }

    /// Clear the current verdict and accept the next scan.
    pub fn resume(&self) {
        *self.last_verdict.lock() = None;
        self.paused.store(false, Ordering::Release);
    }

    /// Returns true while a verdict is pending or being shown.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Verdict of the most recent scan, until resumed.
    #[must_use]
    pub fn last_verdict(&self) -> Option<ScanVerdict> {
        self.last_verdict.lock().clone()
    }

    /// Role operating this scanner.
    #[must_use]
    pub fn role(&self) -> StaffRole {
        self.role
    }

    /// Scan counters.
    #[must_use]
    pub fn stats(&self) -> ScanStats {
        self.stats.lock().clone()
    }
}
