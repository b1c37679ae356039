//! `protect run`: host the accessory until Ctrl-C.

use std::sync::Arc;

use tracing::{info, warn};

use protect_core::{Accessory, CallbackAdapter};

use crate::cli::{GlobalOpts, RunArgs};
use crate::config;
use crate::error::CliError;

use super::util::LoggingHost;

pub async fn handle(args: &RunArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::accessory_config(global)?;
    cfg.log_user_changes |= args.log_user_changes;

    let accessory = Arc::new(Accessory::start(cfg, Arc::new(LoggingHost)).await?);
    let info = accessory.information();
    info!(
        name = %info.name,
        manufacturer = info.manufacturer,
        model = info.model,
        serial = info.serial_number,
        site = %accessory.site(),
        "accessory running, press Ctrl-C to stop"
    );

    // Initial state through the host callback path.
    let adapter = CallbackAdapter::new(Arc::clone(&accessory), tokio::runtime::Handle::current());
    let initial = adapter.get_current_state(|result| match result {
        Ok(value) => info!(value, "initial current state"),
        Err(e) => warn!(error = %e, "initial state read failed"),
    });
    let _ = initial.await;

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    accessory.shutdown().await;
    Ok(())
}
