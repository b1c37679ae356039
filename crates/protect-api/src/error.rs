use thiserror::Error;

/// Top-level error type for the `protect-api` crate.
///
/// Covers every failure mode of the vendor cloud: OAuth token acquisition,
/// transport, and the bearer-authorized REST endpoints.
/// `protect-core` maps these into the accessory's error taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token endpoint rejected the grant, or could not be reached.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A refresh grant was requested but no refresh token is stored.
    #[error("No refresh token available")]
    MissingRefreshToken,

    /// An authorized call was attempted before any token was acquired.
    #[error("No access token -- authenticate first")]
    NotAuthenticated,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS or HTTP client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Rate limited by the vendor API. Includes retry-after in seconds.
    #[error("Rate limited -- retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Non-success response from a REST endpoint.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The token endpoint declared an expiry the clock cannot represent.
    pub(crate) fn lifetime_out_of_range() -> Self {
        Self::Authentication {
            message: "token lifetime out of range".into(),
        }
    }

    /// HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
