//! Shared helpers for command handlers.

use std::sync::Arc;

use tracing::info;

use protect_core::{Accessory, AccessoryConfig, HostBridge, SecurityState};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;

/// Host bridge that logs pushed state updates.
pub struct LoggingHost;

impl HostBridge for LoggingHost {
    fn update_current_state(&self, state: SecurityState) {
        info!(%state, "current state updated");
    }
}

/// Start an accessory for a one-shot command. Monitoring stays off.
pub async fn start_accessory(global: &GlobalOpts) -> Result<Accessory, CliError> {
    let mut cfg: AccessoryConfig = config::accessory_config(global)?;
    cfg.log_user_changes = false;
    Ok(Accessory::start(cfg, Arc::new(LoggingHost)).await?)
}

/// `user at timestamp`, with placeholders for missing parts.
pub fn describe_change(user: Option<&str>, timestamp: Option<&str>) -> String {
    format!(
        "{} at {}",
        user.unwrap_or("unknown user"),
        timestamp.unwrap_or("unknown time")
    )
}
