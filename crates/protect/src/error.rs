//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use protect_config::ConfigError;
use protect_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(protect::auth_failed),
        help(
            "Verify the username and password of your Somfy Protect account.\n\
             Store the password with: protect set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No password configured for '{username}'")]
    #[diagnostic(
        code(protect::no_password),
        help(
            "Run: protect set-password\n\
             Or set the PROTECT_PASSWORD environment variable."
        )
    )]
    NoPassword { username: String },

    // ── Sites ────────────────────────────────────────────────────────
    #[error("No sites found for this account")]
    #[diagnostic(
        code(protect::no_sites),
        help("Add the alarm to your account in the Somfy Protect app first.")
    )]
    NoSitesFound,

    #[error("Site '{site_id}' not found")]
    #[diagnostic(
        code(protect::site_not_found),
        help(
            "Available sites: {available}\n\
             Set siteId in the config file or pass --site. Run: protect sites"
        )
    )]
    SiteNotFound { site_id: String, available: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(protect::api_error))]
    Api {
        message: String,
        status: Option<u16>,
    },

    // ── Validation / configuration ───────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(
        code(protect::validation),
        help("Check the config file at {path}")
    )]
    Validation {
        field: String,
        reason: String,
        path: String,
    },

    #[error(transparent)]
    #[diagnostic(code(protect::config))]
    Config(Box<figment::Error>),

    #[error("Keyring error: {message}")]
    #[diagnostic(
        code(protect::keyring),
        help("Use PROTECT_PASSWORD or a plaintext password in the config file instead.")
    )]
    Keyring { message: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed { .. } | Self::NoPassword { .. } => exit_code::AUTH,
            Self::NoSitesFound | Self::SiteNotFound { .. } => exit_code::NOT_FOUND,
            Self::Api { status: None, .. } => exit_code::CONNECTION,
            Self::Validation { .. } | Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::NoSitesFound => CliError::NoSitesFound,
            CoreError::SiteNotFound { site_id, available } => CliError::SiteNotFound {
                site_id,
                available: available.join(", "),
            },
            CoreError::Api { message, status } => CliError::Api { message, status },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
                path: protect_config::config_path().display().to_string(),
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation {
                field,
                reason,
                path: protect_config::config_path().display().to_string(),
            },
            ConfigError::NoPassword { username } => CliError::NoPassword { username },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Keyring(e) => CliError::Keyring {
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let auth = CliError::from(CoreError::AuthenticationFailed {
            message: "bad".into(),
        });
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let missing = CliError::from(CoreError::SiteNotFound {
            site_id: "Z".into(),
            available: vec!["Home (A)".into()],
        });
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);

        let offline = CliError::from(CoreError::Api {
            message: "connection refused".into(),
            status: None,
        });
        assert_eq!(offline.exit_code(), exit_code::CONNECTION);

        let server = CliError::from(CoreError::Api {
            message: "boom".into(),
            status: Some(500),
        });
        assert_eq!(server.exit_code(), exit_code::GENERAL);
    }
}
