//! Configuration for protect-bridge.
//!
//! TOML config file merged with `PROTECT_` environment variables, password
//! resolution (env + keyring + plaintext), and translation to
//! `protect_core::AccessoryConfig`. The core crate never reads files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use protect_core::{AccessoryConfig, Endpoints};

/// Keyring service name for stored passwords.
pub const KEYRING_SERVICE: &str = "protect-bridge";

/// Environment variable consulted first for the account password.
pub const PASSWORD_ENV: &str = "PROTECT_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for '{username}'")]
    NoPassword { username: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config struct ───────────────────────────────────────────────────

/// Accessory configuration as written in the config file.
///
/// Field names follow the host platform's camelCase convention.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Accessory display name.
    #[serde(default)]
    pub name: String,

    /// Vendor account email.
    #[serde(default)]
    pub username: String,

    /// Plaintext password (prefer the keyring or `PROTECT_PASSWORD`).
    pub password: Option<String>,

    /// Site to control. Defaults to the first site on the account.
    pub site_id: Option<String>,

    /// Log who changed the alarm, polled every 30 seconds.
    #[serde(default)]
    pub log_user_changes: bool,

    /// Override the OAuth token endpoint.
    pub auth_url: Option<String>,

    /// Override the REST API root.
    pub api_url: Option<String>,

    /// Override the OAuth client id.
    pub client_id: Option<String>,

    /// HTTP request timeout in seconds.
    pub timeout: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: String::new(),
            username: String::new(),
            password: None,
            site_id: None,
            log_user_changes: false,
            auth_url: None,
            api_url: None,
            client_id: None,
            timeout: None,
        }
    }
}

impl Config {
    /// Check required fields and the username format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.is_empty() {
            return Err(ConfigError::Validation {
                field: "username".into(),
                reason: "is required".into(),
            });
        }
        if !is_email_like(&self.username) {
            return Err(ConfigError::Validation {
                field: "username".into(),
                reason: format!("'{}' is not an email address", self.username),
            });
        }
        if self.name.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "name".into(),
                reason: "is required".into(),
            });
        }
        Ok(())
    }
}

/// `local@domain.tld` shape: no whitespace, one `@`, and a dot inside the
/// domain with characters on both sides.
fn is_email_like(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "protect-bridge", "protect-bridge").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("protect-bridge");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Environment provider: `PROTECT_SITE_ID` becomes `siteId`, and so on.
fn env_provider() -> Env {
    Env::prefixed("PROTECT_").map(|key| {
        let field = match key.as_str() {
            "site_id" => "siteId",
            "log_user_changes" => "logUserChanges",
            "auth_url" => "authUrl",
            "api_url" => "apiUrl",
            "client_id" => "clientId",
            _ => return key.into(),
        };
        field.into()
    })
}

/// Layered figment: defaults, then the TOML file at `path`, then env.
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
}

/// Load config from the canonical path and the environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` and the environment. A missing file is not an
/// error; defaults and env still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment(path).extract()?;
    Ok(config)
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the account password.
///
/// Order: `PROTECT_PASSWORD`, then the system keyring
/// (service `protect-bridge`, user = username), then plaintext in config.
pub fn resolve_password(config: &Config) -> Result<SecretString, ConfigError> {
    resolve_password_with(config, std::env::var(PASSWORD_ENV).ok(), keyring_password)
}

fn keyring_password(username: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, username)
        .and_then(|entry| entry.get_password())
        .ok()
}

fn resolve_password_with(
    config: &Config,
    env_password: Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Env var
    if let Some(pw) = env_password.filter(|pw| !pw.is_empty()) {
        return Ok(SecretString::from(pw));
    }

    // 2. Keyring
    if let Some(pw) = keyring(&config.username) {
        return Ok(SecretString::from(pw));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = config.password {
        if !pw.is_empty() {
            return Ok(SecretString::from(pw.clone()));
        }
    }

    Err(ConfigError::NoPassword {
        username: config.username.clone(),
    })
}

/// Store `password` in the system keyring for `username`.
pub fn store_password(username: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, username)?;
    entry.set_password(password)?;
    Ok(())
}

// ── Translation to core config ──────────────────────────────────────

fn parse_url(field: &str, raw: Option<&str>, default: &Url) -> Result<Url, ConfigError> {
    match raw {
        None => Ok(default.clone()),
        Some(raw) => raw.parse().map_err(|_| ConfigError::Validation {
            field: field.into(),
            reason: format!("invalid URL: {raw}"),
        }),
    }
}

/// Validate `config`, resolve the password, and build an `AccessoryConfig`.
pub fn to_accessory_config(config: &Config) -> Result<AccessoryConfig, ConfigError> {
    config.validate()?;
    let password = resolve_password(config)?;
    build_accessory_config(config, password)
}

fn build_accessory_config(
    config: &Config,
    password: SecretString,
) -> Result<AccessoryConfig, ConfigError> {
    let defaults = Endpoints::default();
    let endpoints = Endpoints {
        token_url: parse_url("authUrl", config.auth_url.as_deref(), &defaults.token_url)?,
        api_url: parse_url("apiUrl", config.api_url.as_deref(), &defaults.api_url)?,
        client_id: config
            .client_id
            .clone()
            .unwrap_or(defaults.client_id),
    };

    let mut accessory =
        AccessoryConfig::new(config.name.clone(), config.username.clone(), password);
    accessory.site_id = config.site_id.clone().filter(|id| !id.is_empty());
    accessory.log_user_changes = config.log_user_changes;
    accessory.endpoints = endpoints;
    if let Some(secs) = config.timeout {
        accessory.timeout = Duration::from_secs(secs);
    }
    Ok(accessory)
}
