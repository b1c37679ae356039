//! `protect status`: read the remote alarm state.

use serde::Serialize;

use protect_core::mapping::vendor_to_host;
use protect_core::{LastAction, SecurityState};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Serialize)]
struct StatusView {
    site_id: String,
    site_label: String,
    vendor_status: String,
    state: SecurityState,
    last_action: Option<LastAction>,
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let accessory = util::start_accessory(global).await?;
    let result = accessory.alarm_status().await;
    accessory.shutdown().await;
    let status = result?;

    let view = StatusView {
        site_id: accessory.site().id.clone(),
        site_label: accessory.site().label.clone(),
        vendor_status: status.status.to_string(),
        state: vendor_to_host(&status.status),
        last_action: status.last_action,
    };

    let out = output::render_single(global.output, &view, detail, |v| v.state.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(v: &StatusView) -> String {
    let mut pairs = vec![
        ("Site", format!("{} ({})", v.site_label, v.site_id)),
        ("State", v.state.to_string()),
        ("Vendor status", v.vendor_status.clone()),
    ];
    if let Some(ref action) = v.last_action {
        pairs.push((
            "Last change",
            util::describe_change(action.user_name.as_deref(), action.timestamp.as_deref()),
        ));
    }
    output::detail_lines(&pairs)
}
