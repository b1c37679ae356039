//! CLI configuration: thin wrapper around `protect_config`.
//!
//! Adds `GlobalOpts`-aware resolution (--config, --site, --timeout) on top
//! of the shared loader.

use std::path::PathBuf;
use std::time::Duration;

use protect_config::Config;
use protect_core::AccessoryConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file selected by `--config` / `PROTECT_CONFIG`, or the default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(protect_config::config_path)
}

/// Load the config file and environment, without validation.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(protect_config::load_config_from(&config_file(global))?)
}

/// Build an `AccessoryConfig`, applying CLI flag overrides.
pub fn accessory_config(global: &GlobalOpts) -> Result<AccessoryConfig, CliError> {
    let cfg = load(global)?;
    let mut accessory = protect_config::to_accessory_config(&cfg).map_err(|e| {
        let path = config_file(global).display().to_string();
        match CliError::from(e) {
            CliError::Validation { field, reason, .. } => CliError::Validation {
                field,
                reason,
                path,
            },
            other => other,
        }
    })?;

    if let Some(ref site) = global.site {
        accessory.site_id = Some(site.clone());
    }
    if let Some(secs) = global.timeout {
        accessory.timeout = Duration::from_secs(secs);
    }
    Ok(accessory)
}
