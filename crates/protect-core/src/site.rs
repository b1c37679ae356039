// ── Site resolution ──
//
// Picks the one site the accessory controls. Runs once at startup.

use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::Site;
use crate::session::Session;

/// Outcome of [`select_site`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSelection {
    pub site: Site,
    /// Set when no site was configured and the account has several.
    pub warning: Option<String>,
}

/// Choose a site from the account's site list.
///
/// A configured id must be present in `sites`. Without one, the first site
/// wins and an ambiguity warning lists every candidate.
pub fn select_site(sites: Vec<Site>, configured: Option<&str>) -> Result<SiteSelection, CoreError> {
    if sites.is_empty() {
        return Err(CoreError::NoSitesFound);
    }

    if let Some(site_id) = configured {
        let available: Vec<String> = sites.iter().map(ToString::to_string).collect();
        return sites
            .into_iter()
            .find(|s| s.id == site_id)
            .map(|site| SiteSelection {
                site,
                warning: None,
            })
            .ok_or_else(|| CoreError::SiteNotFound {
                site_id: site_id.to_owned(),
                available,
            });
    }

    let warning = (sites.len() > 1).then(|| {
        let listed: Vec<String> = sites.iter().map(ToString::to_string).collect();
        format!(
            "Multiple sites found, using the first one. Set siteId to choose. Available sites: {}",
            listed.join(", ")
        )
    });
    let mut sites = sites.into_iter();
    let site = sites.next().ok_or(CoreError::NoSitesFound)?;
    Ok(SiteSelection { site, warning })
}

/// List the account's sites and select one, logging any ambiguity.
pub async fn resolve(session: &Session, configured: Option<&str>) -> Result<Site, CoreError> {
    let sites = session.list_sites().await?;
    let selection = select_site(sites, configured)?;
    if let Some(ref warning) = selection.warning {
        warn!("{warning}");
    }
    debug!(site_id = %selection.site.id, "using site");
    Ok(selection.site)
}
