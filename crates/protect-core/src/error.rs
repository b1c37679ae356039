// ── Core error types ──
//
// The accessory's error taxonomy. Consumers never see raw transport
// variants; the `From<protect_api::Error>` impl folds them into
// authentication failures and generic API failures.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Authentication ───────────────────────────────────────────────
    /// Bad credentials, rejected refresh token, or token endpoint failure.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Site resolution ──────────────────────────────────────────────
    #[error("No sites found for this account")]
    NoSitesFound,

    #[error("Site not found: {site_id} (available: {})", .available.join(", "))]
    SiteNotFound {
        site_id: String,
        available: Vec<String>,
    },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    /// Any non-auth vendor call failure, including connection errors.
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` for failures of the token lifecycle.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<protect_api::Error> for CoreError {
    fn from(err: protect_api::Error) -> Self {
        let status = err.status();
        match err {
            protect_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            protect_api::Error::MissingRefreshToken | protect_api::Error::NotAuthenticated => {
                CoreError::AuthenticationFailed {
                    message: err.to_string(),
                }
            }
            protect_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            protect_api::Error::Tls(message) => CoreError::Config { message },
            protect_api::Error::Api { message, .. } => CoreError::Api { message, status },
            protect_api::Error::Transport(_)
            | protect_api::Error::RateLimited { .. }
            | protect_api::Error::Deserialization { .. } => CoreError::Api {
                message: err.to_string(),
                status,
            },
        }
    }
}
