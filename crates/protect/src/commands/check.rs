//! `protect check`: walk through every vendor interaction and report each
//! step. Stops at the first failure.

use std::fmt::Display;

use protect_core::mapping::vendor_to_host;
use protect_core::{AlarmEventType, AlarmGateway, CoreError, Session, latest_alarm_action, site};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

struct Reporter {
    color: bool,
    quiet: bool,
}

impl Reporter {
    fn step<T, D: Display>(
        &self,
        name: &str,
        result: Result<T, CoreError>,
        describe: impl FnOnce(&T) -> D,
    ) -> Result<T, CoreError> {
        match result {
            Ok(value) => {
                if !self.quiet {
                    println!(
                        "{} {name}: {}",
                        output::step_marker(true, self.color),
                        describe(&value)
                    );
                }
                Ok(value)
            }
            Err(e) => {
                if !self.quiet {
                    println!("{} {name}: {e}", output::step_marker(false, self.color));
                }
                Err(e)
            }
        }
    }
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::accessory_config(global)?;
    let reporter = Reporter {
        color: output::should_color(global.color),
        quiet: global.quiet,
    };

    let session = Session::new(&cfg)?;
    reporter.step("authenticate", session.authenticate().await, |_| {
        format!("signed in as {}", cfg.username)
    })?;

    let sites = reporter.step("list sites", session.list_sites().await, |sites| {
        format!("{} site(s)", sites.len())
    })?;
    for s in &sites {
        tracing::info!(site = %s, "available site");
    }

    let site = reporter.step(
        "resolve site",
        site::resolve(&session, cfg.site_id.as_deref()).await,
        ToString::to_string,
    )?;

    let gateway = AlarmGateway::new(session.clone(), site.clone());
    reporter.step("read status", gateway.read_status().await, |status| {
        format!("{} ({})", status.status, vendor_to_host(&status.status))
    })?;

    let events = reporter.step(
        "read history",
        session
            .history(&site.id, cfg.history_limit, &AlarmEventType::ALL)
            .await,
        |events| format!("{} alarm event(s)", events.len()),
    )?;

    if !global.quiet {
        match latest_alarm_action(&events) {
            Some(a) => println!(
                "Last change: {} ({})",
                util::describe_change(
                    a.actor_name.as_deref(),
                    Some(&a.timestamp)
                ),
                a.event_type.as_str()
            ),
            None => println!("Last change: unknown"),
        }
    }
    Ok(())
}
