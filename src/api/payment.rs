//! Payment verification endpoint.

use super::{path_identifier, ApiClient};
use crate::error::{Error, Result};
use crate::payment::{StatusReport, StatusSource};
use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

/// [`StatusSource`] backed by `GET /api/pay/verify/{reference}/`.
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    api: ApiClient,
}

impl HttpStatusSource {
    /// Create a status source using `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// URL of the verification endpoint for `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for an empty or dot-segment
    /// reference.
    pub fn verify_url(&self, reference: &str) -> Result<Url> {
        let reference = path_identifier("payment reference", reference)?;
        Ok(self.api.endpoint(["api", "pay", "verify", reference]))
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn check_status(&self, subject_id: &str) -> Result<StatusReport> {
        let url = self.verify_url(subject_id)?;
        let response = self.api.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let report = response
            .json::<StatusReport>()
            .await
            .map_err(|e| Error::Decode(e.to_string()))?;

        debug!("Payment {} reported {:?}", subject_id, report.status);
        Ok(report)
    }
}
