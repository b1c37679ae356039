// ── Alarm state gateway ──
//
// Reads and writes the remote alarm status of the resolved site. Reads
// always go to the vendor; nothing is cached.

use tracing::{debug, info};

use protect_api::ProtectClient;

use crate::error::CoreError;
use crate::model::{AlarmStatus, Site, VendorAlarmState};
use crate::session::Session;

/// Remote alarm status access for one site.
#[derive(Clone)]
pub struct AlarmGateway {
    session: Session,
    site: Site,
}

impl AlarmGateway {
    pub fn new(session: Session, site: Site) -> Self {
        Self { session, site }
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    fn client(&self) -> &ProtectClient {
        self.session.client()
    }

    /// Fetch the current remote status.
    pub async fn read_status(&self) -> Result<AlarmStatus, CoreError> {
        self.session.guard().ensure_valid().await?;
        let status = AlarmStatus::from(self.client().get_security(&self.site.id).await?);
        debug!(site_id = %self.site.id, status = %status.status, "read alarm status");
        Ok(status)
    }

    /// Request a status change. Returns once the vendor accepts the write.
    pub async fn write_status(&self, status: &VendorAlarmState) -> Result<(), CoreError> {
        self.session.guard().ensure_valid().await?;
        self.client()
            .set_security(&self.site.id, status.as_str())
            .await?;
        info!(site_id = %self.site.id, %status, "alarm status change accepted");
        Ok(())
    }
}
