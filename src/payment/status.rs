//! Remote payment status as reported by the platform.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Status of a payment as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RemoteStatus {
    /// Payment settled.
    Completed,
    /// Payment explicitly rejected.
    Failed,
    /// Payment not settled yet. Unrecognised statuses land here too.
    #[serde(other)]
    Pending,
}

impl RemoteStatus {
    /// Returns true if the status ends a confirmation session.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Body of a status check response.
///
/// Everything besides `status` (attendee, order and ticket metadata) is
/// kept verbatim in `details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Reported status.
    pub status: RemoteStatus,
    /// Additional order metadata.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl StatusReport {
    /// Report with no metadata.
    #[must_use]
    pub fn new(status: RemoteStatus) -> Self {
        Self {
            status,
            details: Map::new(),
        }
    }

    /// Attach a metadata field.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Look up a metadata field.
    #[must_use]
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }
}

/// Source of payment status for a subject.
///
/// Any `Err` is treated as a transient transport failure by the poller.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Query the current status of `subject_id`.
    async fn check_status(&self, subject_id: &str) -> Result<StatusReport>;
}

#[async_trait]
impl<S: StatusSource + ?Sized> StatusSource for Arc<S> {
    async fn check_status(&self, subject_id: &str) -> Result<StatusReport> {
        (**self).check_status(subject_id).await
    }
}
