// OAuth token acquisition
//
// Password and refresh grants against the vendor SSO endpoint. Both grant
// types parse the same response shape and write the resulting token triple
// into the shared `CredentialStore`; nothing else writes to it.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::client::body_preview;
use crate::error::Error;
use crate::models::TokenResponse;
use crate::token::{CredentialStore, TokenSet};
use crate::transport::TransportConfig;

/// Vendor SSO token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://sso.myfox.me/oauth/oauth";

/// OAuth client id the vendor's mobile app registers with.
pub const DEFAULT_CLIENT_ID: &str = "myfox-android-app";

/// Performs password and refresh grants and populates the credential store.
pub struct Authenticator {
    http: reqwest::Client,
    token_url: Url,
    client_id: String,
    store: Arc<CredentialStore>,
}

impl Authenticator {
    /// Create an authenticator with its own HTTP client.
    pub fn new(
        token_url: Url,
        client_id: impl Into<String>,
        store: Arc<CredentialStore>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self::with_client(
            transport.build_client()?,
            token_url,
            client_id,
            store,
        ))
    }

    /// Create an authenticator with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        token_url: Url,
        client_id: impl Into<String>,
        store: Arc<CredentialStore>,
    ) -> Self {
        Self {
            http,
            token_url,
            client_id: client_id.into(),
            store,
        }
    }

    /// The store this authenticator writes into.
    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// Exchange username/password for a fresh token pair.
    ///
    /// `POST {token_url}` with `grant_type=password`.
    pub async fn password_grant(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<TokenSet, Error> {
        debug!(username, "requesting password grant");
        let form = [
            ("grant_type", "password"),
            ("username", username),
            ("password", password.expose_secret()),
            ("client_id", self.client_id.as_str()),
        ];
        let tokens = self.request_token(&form).await?;
        debug!("authentication successful");
        Ok(tokens)
    }

    /// Exchange the stored refresh token for a fresh token pair.
    ///
    /// Fails with [`Error::MissingRefreshToken`] without touching the
    /// network when the store holds no refresh token.
    pub async fn refresh_grant(&self) -> Result<TokenSet, Error> {
        let refresh_token = self.store.refresh_token().ok_or(Error::MissingRefreshToken)?;

        debug!("requesting refresh grant");
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.expose_secret()),
            ("client_id", self.client_id.as_str()),
        ];
        let tokens = self.request_token(&form).await?;
        debug!("token refreshed successfully");
        Ok(tokens)
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenSet, Error> {
        let resp = self
            .http
            .post(self.token_url.clone())
            .form(form)
            .send()
            .await
            .map_err(|e| Error::Authentication {
                message: format!("token endpoint unreachable: {e}"),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("token request rejected (HTTP {status}): {}", body_preview(&body)),
            });
        }

        let body = resp.text().await.map_err(|e| Error::Authentication {
            message: format!("failed to read token response: {e}"),
        })?;
        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| Error::Authentication {
                message: format!("malformed token response: {e}"),
            })?;

        // Expiry is anchored to the moment the grant succeeded.
        let mut tokens = TokenSet::issued_now(
            SecretString::from(parsed.access_token),
            parsed.refresh_token.map(SecretString::from),
            Duration::from_secs(parsed.expires_in),
        )
        .ok_or_else(Error::lifetime_out_of_range)?;
        tokens.token_type = parsed.token_type;
        tokens.scope = parsed.scope;

        self.store.replace(tokens.clone());
        Ok(tokens)
    }
}
