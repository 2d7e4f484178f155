//! Ticket scanner endpoint.

use super::ApiClient;
use crate::error::{Error, Result};
use crate::scanner::{ScanVerdict, TicketDetails, TicketVerifier, DEFAULT_REJECTION_MESSAGE};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

/// [`TicketVerifier`] backed by `POST /api/scanner/verify/`.
#[derive(Debug, Clone)]
pub struct HttpTicketVerifier {
    api: ApiClient,
}

impl HttpTicketVerifier {
    /// Create a verifier using `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

/// Details from a success body. The API's decision is the status code, so a
/// body that is empty or not a ticket object still admits the holder.
fn ticket_details(body: &[u8]) -> TicketDetails {
    serde_json::from_slice(body).unwrap_or_else(|e| {
        debug!("Valid ticket without readable details: {}", e);
        TicketDetails::default()
    })
}

/// Verdict for a non-success response body.
fn rejection(body: Option<Value>) -> ScanVerdict {
    let message = body
        .as_ref()
        .and_then(|body| body.get("error"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_REJECTION_MESSAGE)
        .to_string();

    ScanVerdict::Rejected {
        message,
        details: body,
    }
}

#[async_trait]
impl TicketVerifier for HttpTicketVerifier {
    async fn verify(&self, qr_hash: &str) -> Result<ScanVerdict> {
        if qr_hash.trim().is_empty() {
            return Err(Error::Scanner("empty QR payload".to_string()));
        }

        let response = self
            .api
            .post(self.api.endpoint(["api", "scanner", "verify"]))
            .json(&json!({ "qr_hash": qr_hash }))
            .send()
            .await?;

        let status = response.status();
        debug!("Scanner verify returned {}", status);

        if status.is_success() {
            let body = response.bytes().await?;
            Ok(ScanVerdict::Valid(ticket_details(&body)))
        } else {
            Ok(rejection(response.json::<Value>().await.ok()))
        }
    }
}
