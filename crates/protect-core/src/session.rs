// ── Authenticated vendor session ──
//
// Bundles the API client and token guard that share one credential store.
// Every method runs the guard before touching the API.

use std::sync::Arc;

use tracing::debug;

use protect_api::{Authenticator, CredentialStore, ProtectClient, TransportConfig};

use crate::config::AccessoryConfig;
use crate::error::CoreError;
use crate::guard::TokenGuard;
use crate::model::{AlarmEventType, HistoryEvent, Site};

/// A vendor API client paired with the guard that keeps its token fresh.
#[derive(Clone)]
pub struct Session {
    client: ProtectClient,
    guard: Arc<TokenGuard>,
}

impl Session {
    /// Build the credential store, authenticator, client, and guard for
    /// `config`. No network traffic happens here.
    pub fn new(config: &AccessoryConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let http = transport.build_client()?;
        let store = Arc::new(CredentialStore::new());

        let authenticator = Authenticator::with_client(
            http.clone(),
            config.endpoints.token_url.clone(),
            config.endpoints.client_id.clone(),
            Arc::clone(&store),
        );
        let client = ProtectClient::with_client(http, config.endpoints.api_url.clone(), store);
        let guard = TokenGuard::new(
            authenticator,
            config.username.clone(),
            config.password.clone(),
        );

        Ok(Self::from_parts(client, Arc::new(guard)))
    }

    /// Assemble a session from an existing client and guard. Both must
    /// share the same credential store.
    pub fn from_parts(client: ProtectClient, guard: Arc<TokenGuard>) -> Self {
        Self { client, guard }
    }

    pub fn client(&self) -> &ProtectClient {
        &self.client
    }

    pub fn guard(&self) -> &Arc<TokenGuard> {
        &self.guard
    }

    /// Obtain a valid token, authenticating if necessary.
    pub async fn authenticate(&self) -> Result<(), CoreError> {
        self.guard.ensure_valid().await
    }

    /// All sites on the account, in vendor order.
    pub async fn list_sites(&self) -> Result<Vec<Site>, CoreError> {
        self.guard.ensure_valid().await?;
        let sites = self.client.list_sites().await?;
        debug!(count = sites.len(), "listed sites");
        Ok(sites.into_iter().map(Site::from).collect())
    }

    /// Recent history events for `site_id`, filtered server-side to `types`.
    pub async fn history(
        &self,
        site_id: &str,
        limit: u32,
        types: &[AlarmEventType],
    ) -> Result<Vec<HistoryEvent>, CoreError> {
        self.guard.ensure_valid().await?;
        let types: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
        let events = self.client.list_history(site_id, limit, &types).await?;
        Ok(events.into_iter().map(HistoryEvent::from).collect())
    }
}
