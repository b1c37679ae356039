// Alarm security endpoints
//
// Read and write the alarm status of one site. The vendor accepts a write
// before the panel has actually transitioned; a later read may still
// report the previous status.

use tracing::debug;

use crate::client::ProtectClient;
use crate::error::Error;
use crate::models::{SecurityResponse, SecurityUpdate};

impl ProtectClient {
    /// Fetch the current alarm status of a site.
    ///
    /// `GET /v2/client/site/{site_id}/security`
    pub async fn get_security(&self, site_id: &str) -> Result<SecurityResponse, Error> {
        let url = self.site_url(site_id, "security")?;
        debug!(site_id, "fetching alarm status");
        self.get(url).await
    }

    /// Request a new alarm status for a site.
    ///
    /// `PUT /v2/client/site/{site_id}/security` with `{"status": "..."}`
    pub async fn set_security(&self, site_id: &str, status: &str) -> Result<(), Error> {
        let url = self.site_url(site_id, "security")?;
        debug!(site_id, status, "setting alarm status");
        self.put(url, &SecurityUpdate { status }).await
    }
}
