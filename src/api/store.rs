//! Storefront endpoint.

use super::{path_identifier, ApiClient};
use crate::error::{Error, Result};
use crate::store::Store;
use tracing::debug;

/// Storefront lookup backed by `GET /api/stores/{slug}/`.
#[derive(Debug, Clone)]
pub struct HttpStoreSource {
    api: ApiClient,
}

impl HttpStoreSource {
    /// Create a store source using `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch the public storefront for `slug`, including its upcoming events.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for an empty slug,
    /// [`Error::UnexpectedStatus`] when the API answers with a non-success
    /// code (404 for an unknown store), and [`Error::Decode`] for a body that
    /// is not a store.
    pub async fn fetch(&self, slug: &str) -> Result<Store> {
        let slug = path_identifier("store slug", slug)?;
        let url = self.api.endpoint(["api", "stores", slug]);
        let response = self.api.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let store = response
            .json::<Store>()
            .await
            .map_err(|e| Error::Decode(e.to_string()))?;

        debug!("Store {} lists {} events", store.slug, store.events.len());
        Ok(store)
    }
}
