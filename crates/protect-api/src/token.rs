// OAuth credential storage
//
// Holds the current access/refresh token pair and its expiry. The whole
// triple is swapped atomically on every successful grant; readers always
// see either the previous or the new set, never a mix of the two.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use secrecy::SecretString;
use tokio::time::Instant;

use crate::error::Error;

/// One successful token grant.
#[derive(Debug, Clone)]
pub struct TokenSet {
    pub access_token: SecretString,
    /// The vendor may omit this on refresh; absence forces a password grant
    /// the next time the access token expires.
    pub refresh_token: Option<SecretString>,
    /// Response instant plus the server-declared lifetime.
    pub expires_at: Instant,
    pub token_type: Option<String>,
    pub scope: Option<String>,
}

impl TokenSet {
    /// Build a token set expiring `lifetime` from now.
    ///
    /// Returns `None` when the expiry is not representable by the clock.
    pub fn issued_now(
        access_token: SecretString,
        refresh_token: Option<SecretString>,
        lifetime: Duration,
    ) -> Option<Self> {
        let expires_at = Instant::now().checked_add(lifetime)?;
        Some(Self {
            access_token,
            refresh_token,
            expires_at,
            token_type: None,
            scope: None,
        })
    }

    /// `true` while the current instant is strictly before `expires_at`.
    pub fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Process-lifetime token storage shared by every API caller.
///
/// Never persisted. Uses `tokio::time::Instant` so that a paused test clock
/// drives expiry.
#[derive(Debug, Default)]
pub struct CredentialStore {
    current: ArcSwapOption<TokenSet>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` iff a token is stored and has not yet expired.
    pub fn is_valid(&self) -> bool {
        self.current.load().as_ref().is_some_and(|t| t.is_valid())
    }

    /// Store a fresh token pair, computing the expiry from now.
    ///
    /// An out-of-range `lifetime` leaves the store untouched.
    pub fn set(
        &self,
        access_token: SecretString,
        refresh_token: Option<SecretString>,
        lifetime: Duration,
    ) -> Result<(), Error> {
        let tokens = TokenSet::issued_now(access_token, refresh_token, lifetime)
            .ok_or_else(Error::lifetime_out_of_range)?;
        self.replace(tokens);
        Ok(())
    }

    /// Replace the stored set wholesale.
    pub fn replace(&self, tokens: TokenSet) {
        self.current.store(Some(Arc::new(tokens)));
    }

    /// Snapshot of the stored set.
    pub fn snapshot(&self) -> Option<Arc<TokenSet>> {
        self.current.load_full()
    }

    pub fn access_token(&self) -> Option<SecretString> {
        self.current.load().as_ref().map(|t| t.access_token.clone())
    }

    pub fn refresh_token(&self) -> Option<SecretString> {
        self.current
            .load()
            .as_ref()
            .and_then(|t| t.refresh_token.clone())
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.current.load().as_ref().map(|t| t.expires_at)
    }

    /// Drop the stored credentials.
    pub fn clear(&self) {
        self.current.store(None);
    }
}
