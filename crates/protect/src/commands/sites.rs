//! `protect sites`: list sites on the account.

use serde::Serialize;
use tabled::Tabled;

use protect_core::{Session, select_site};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct SiteView {
    site_id: String,
    label: String,
    selected: bool,
}

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "Site ID")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Selected")]
    selected: &'static str,
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::accessory_config(global)?;
    let session = Session::new(&cfg)?;
    let sites = session.list_sites().await?;

    // Which site the accessory would pick, if any.
    let selected = select_site(sites.clone(), cfg.site_id.as_deref())
        .ok()
        .map(|s| s.site.id);

    let views: Vec<SiteView> = sites
        .into_iter()
        .map(|s| SiteView {
            selected: selected.as_deref() == Some(s.id.as_str()),
            site_id: s.id,
            label: s.label,
        })
        .collect();

    let out = output::render_list(
        global.output,
        &views,
        |v| SiteRow {
            id: v.site_id.clone(),
            label: v.label.clone(),
            selected: if v.selected { "*" } else { "" },
        },
        |v| v.site_id.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
