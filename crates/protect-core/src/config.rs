// ── Runtime accessory configuration ──
//
// These types describe *how* to reach the vendor cloud and how the
// accessory behaves. They carry credential data and tuning, but never
// touch disk. `protect-config` (or a test) builds an `AccessoryConfig`
// and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Vendor endpoints and OAuth client identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// OAuth token endpoint (password and refresh grants).
    pub token_url: Url,
    /// REST API root.
    pub api_url: Url,
    /// OAuth client id sent with every grant.
    pub client_id: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            token_url: Url::parse(protect_api::DEFAULT_TOKEN_URL).expect("valid token URL"),
            api_url: Url::parse(protect_api::DEFAULT_API_URL).expect("valid API URL"),
            client_id: protect_api::DEFAULT_CLIENT_ID.to_owned(),
        }
    }
}

/// Configuration for one security-system accessory.
#[derive(Debug, Clone)]
pub struct AccessoryConfig {
    /// Display name of the accessory.
    pub name: String,
    /// Vendor account login (an email address).
    pub username: String,
    pub password: SecretString,
    /// Site to control. `None` selects the first site on the account.
    pub site_id: Option<String>,
    /// Run the history monitoring loop.
    pub log_user_changes: bool,
    pub endpoints: Endpoints,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Monitoring loop period.
    pub monitor_interval: Duration,
    /// Delay before the post-write attribution check.
    pub attribution_delay: Duration,
    /// Number of history events fetched per attribution lookup.
    pub history_limit: u32,
}

impl AccessoryConfig {
    /// Build a config with the default endpoints and timings.
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            password,
            site_id: None,
            log_user_changes: false,
            endpoints: Endpoints::default(),
            timeout: Duration::from_secs(30),
            monitor_interval: Duration::from_secs(30),
            attribution_delay: Duration::from_secs(2),
            history_limit: 10,
        }
    }
}
