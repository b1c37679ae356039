// Site endpoints
//
// Site listing is account-scoped, not site-scoped: `/v2/client/site`.

use tracing::debug;

use crate::client::ProtectClient;
use crate::error::Error;
use crate::models::SiteResponse;

impl ProtectClient {
    /// List all sites visible to the authenticated account.
    ///
    /// `GET /v2/client/site`
    pub async fn list_sites(&self) -> Result<Vec<SiteResponse>, Error> {
        let url = self.endpoint_url(&["v2", "client", "site"])?;
        debug!("listing sites");
        self.get(url).await
    }
}
