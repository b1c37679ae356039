//! `protect history`: recent events from the site history feed.

use chrono::{DateTime, Local, Utc};
use tabled::Tabled;

use protect_core::{AlarmEventType, HistoryEvent, Session, site};

use crate::cli::{GlobalOpts, HistoryArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Type")]
    event_type: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Device")]
    device: String,
}

fn format_time(raw: &str, parsed: Option<DateTime<Utc>>) -> String {
    parsed.map_or_else(
        || raw.to_owned(),
        |dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        },
    )
}

fn user_name(event: &HistoryEvent) -> String {
    event
        .actor
        .as_ref()
        .and_then(|a| a.name.clone())
        .unwrap_or_else(|| "-".into())
}

pub async fn handle(args: &HistoryArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::accessory_config(global)?;
    let session = Session::new(&cfg)?;
    let site = site::resolve(&session, cfg.site_id.as_deref()).await?;

    let types: &[AlarmEventType] = if args.all {
        &[]
    } else {
        &AlarmEventType::ALL
    };
    let mut events = session.history(&site.id, args.limit, types).await?;
    events.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));

    let out = output::render_list(
        global.output,
        &events,
        |e| HistoryRow {
            time: format_time(&e.timestamp, e.occurred_at),
            event_type: e.event_type.clone(),
            user: user_name(e),
            device: e.device_type.clone().unwrap_or_else(|| "-".into()),
        },
        |e| format!("{}\t{}\t{}", e.timestamp, e.event_type, user_name(e)),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
