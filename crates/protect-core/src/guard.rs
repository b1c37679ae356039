// ── Token guard ──
//
// Every authorized vendor call goes through `ensure_valid` first. A valid
// stored token is a no-op; otherwise the guard refreshes when a refresh
// token is stored and falls back to a password grant when none is.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::Mutex;
use tracing::debug;

use protect_api::{Authenticator, CredentialStore};

use crate::error::CoreError;

/// Keeps the shared [`CredentialStore`] holding a usable access token.
pub struct TokenGuard {
    authenticator: Authenticator,
    username: String,
    password: SecretString,
    /// Serializes re-authentication. Only one grant is in flight at a time.
    refresh_gate: Mutex<()>,
}

impl TokenGuard {
    pub fn new(
        authenticator: Authenticator,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            authenticator,
            username: username.into(),
            password,
            refresh_gate: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        self.authenticator.store()
    }

    /// Make sure the store holds a valid access token.
    ///
    /// Refresh and password failures propagate as
    /// [`CoreError::AuthenticationFailed`]; a stale token is never used as a
    /// fallback.
    pub async fn ensure_valid(&self) -> Result<(), CoreError> {
        if self.store().is_valid() {
            return Ok(());
        }

        let _gate = self.refresh_gate.lock().await;
        // Another caller may have re-authenticated while we waited.
        if self.store().is_valid() {
            return Ok(());
        }

        if self.store().refresh_token().is_some() {
            debug!("access token expired, refreshing");
            self.authenticator.refresh_grant().await?;
        } else {
            debug!(username = %self.username, "no refresh token, using password grant");
            self.authenticator
                .password_grant(&self.username, &self.password)
                .await?;
        }
        Ok(())
    }
}
