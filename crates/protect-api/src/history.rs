// Site history endpoint
//
// Recent events for a site, optionally filtered by event type. The vendor
// returns them in an unspecified order; callers sort as needed.

use tracing::debug;

use crate::client::ProtectClient;
use crate::error::Error;
use crate::models::HistoryEventResponse;

impl ProtectClient {
    /// List recent history events.
    ///
    /// `GET /v2/client/site/{site_id}/history?limit={limit}&types={a,b,c}`
    ///
    /// An empty `types` slice omits the filter.
    pub async fn list_history(
        &self,
        site_id: &str,
        limit: u32,
        types: &[&str],
    ) -> Result<Vec<HistoryEventResponse>, Error> {
        let mut url = self.site_url(site_id, "history")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &limit.to_string());
            if !types.is_empty() {
                query.append_pair("types", &types.join(","));
            }
        }
        debug!(site_id, limit, ?types, "listing history");
        self.get(url).await
    }
}
