//! HTTP adapters for the TicketSafi API.
//!
//! [`ApiClient`] owns the shared `reqwest` client, base URL and credentials;
//! the endpoint adapters wrap it to implement the crate's collaborator traits.
//!
//! Endpoint URLs are assembled segment by segment. Caller-supplied
//! identifiers (payment references, store slugs) are always pushed as a
//! single percent-encoded segment and can never alter the route.

mod payment;
mod scanner;
mod store;

pub use payment::HttpStatusSource;
pub use scanner::HttpTicketVerifier;
pub use store::HttpStoreSource;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use reqwest::{Client, RequestBuilder, Url};
use tracing::debug;

/// Thin wrapper over a configured `reqwest` client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute `http(s)` URL or
    /// the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(config.api_base_url.trim_end_matches('/'))
            .map_err(|e| Error::Config(format!("invalid API base URL: {e}")))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "API base URL must be http(s): {}",
                config.api_base_url
            )));
        }

        let http = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("ticketsafi-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        debug!("API client targeting {}", base_url);

        Ok(Self {
            http,
            base_url,
            token: config.api_token.clone(),
        })
    }

    /// Base URL the endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute endpoint URL built from path segments, with a trailing slash.
    ///
    /// Each segment is percent-encoded on its own, so `/`, `?` and `#` inside
    /// a segment stay part of that segment.
    #[must_use]
    pub fn endpoint<I>(&self, segments: I) -> Url
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments).push("");
        }
        url
    }

    pub(crate) fn get(&self, url: Url) -> RequestBuilder {
        self.authorize(self.http.get(url))
    }

    pub(crate) fn post(&self, url: Url) -> RequestBuilder {
        self.authorize(self.http.post(url))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Validate a caller-supplied identifier before it becomes a path segment.
///
/// Empty values and the dot segments would collapse into a different route.
pub(crate) fn path_identifier<'a>(kind: &'static str, value: &'a str) -> Result<&'a str> {
    if matches!(value.trim(), "" | "." | "..") {
        return Err(Error::InvalidIdentifier {
            kind,
            value: value.to_string(),
        });
    }
    Ok(value)
}
