// Vendor REST client
//
// Wraps `reqwest::Client` with bearer authorization, site-scoped URL
// construction, and status/body handling. Endpoint groups (sites,
// security, history) are inherent methods in separate files to keep this
// module focused on transport mechanics.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, RETRY_AFTER};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::token::CredentialStore;
use crate::transport::TransportConfig;

/// Vendor REST API root.
pub const DEFAULT_API_URL: &str = "https://api.myfox.me";

/// Bearer-authorized HTTP client for the vendor API.
///
/// Reads the current access token from the shared [`CredentialStore`] on
/// every request. Token validity is the caller's concern; this client
/// only fails with [`Error::NotAuthenticated`] when no token exists at all.
#[derive(Clone)]
pub struct ProtectClient {
    http: reqwest::Client,
    base_url: Url,
    store: Arc<CredentialStore>,
}

impl ProtectClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(
        base_url: Url,
        store: Arc<CredentialStore>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self::with_client(transport.build_client()?, base_url, store))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, store: Arc<CredentialStore>) -> Self {
        Self {
            http,
            base_url,
            store,
        }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The credential store this client reads tokens from.
    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Append path segments to the base URL, percent-encoding each one.
    pub(crate) fn endpoint_url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build a site-scoped URL: `{base}/v2/client/site/{site_id}/{resource}`
    pub(crate) fn site_url(&self, site_id: &str, resource: &str) -> Result<Url, Error> {
        self.endpoint_url(&["v2", "client", "site", site_id, resource])
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn authorize(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, Error> {
        let token = self.store.access_token().ok_or(Error::NotAuthenticated)?;
        Ok(builder.header(
            AUTHORIZATION,
            format!("Bearer {}", token.expose_secret()),
        ))
    }

    /// Send an authorized GET and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self
            .authorize(self.http.get(url))?
            .send()
            .await
            .map_err(Error::Transport)?;
        let body = Self::check_status(resp).await?;
        decode(&body)
    }

    /// Send an authorized PUT with a JSON body, ignoring any response body.
    pub(crate) async fn put(&self, url: Url, body: &(impl Serialize + Sync)) -> Result<(), Error> {
        debug!("PUT {}", url);
        let resp = self
            .authorize(self.http.put(url).json(body))?
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::check_status(resp).await?;
        Ok(())
    }

    /// Map non-success statuses to errors and return the body text.
    async fn check_status(resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0);
            return Err(Error::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_owned()
                } else {
                    body_preview(&body).to_owned()
                },
            });
        }

        resp.text().await.map_err(Error::Transport)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", body_preview(body)),
        body: body.to_owned(),
    })
}

/// First 200 characters of a response body, cut on a char boundary.
pub(crate) fn body_preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
