// ── Security-system accessory facade ──
//
// Wires the session, site, gateway, and attributor together and exposes
// the host-facing operations. Every read goes to the vendor; the only
// local state is the token and the resolved site.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::config::AccessoryConfig;
use crate::error::CoreError;
use crate::gateway::AlarmGateway;
use crate::history::HistoryAttributor;
use crate::host::{AccessoryInformation, HostBridge};
use crate::mapping::{host_to_vendor, vendor_to_host};
use crate::model::{AlarmStatus, SecurityState, Site};
use crate::session::Session;
use crate::site;

/// One security-system accessory bound to one vendor site.
pub struct Accessory {
    information: AccessoryInformation,
    gateway: AlarmGateway,
    attributor: HistoryAttributor,
    host: Arc<dyn HostBridge>,
    attribution_delay: Duration,
}

impl Accessory {
    /// Authenticate, resolve the site, and start monitoring if enabled.
    pub async fn start(
        config: AccessoryConfig,
        host: Arc<dyn HostBridge>,
    ) -> Result<Self, CoreError> {
        let session = Session::new(&config)?;
        Self::start_with_session(config, session, host).await
    }

    /// Like [`start`](Self::start), with a caller-provided session.
    pub async fn start_with_session(
        config: AccessoryConfig,
        session: Session,
        host: Arc<dyn HostBridge>,
    ) -> Result<Self, CoreError> {
        if let Err(e) = session.authenticate().await {
            error!(error = %e, "authentication failed");
            return Err(e);
        }
        let site = match site::resolve(&session, config.site_id.as_deref()).await {
            Ok(site) => site,
            Err(e) => {
                error!(error = %e, "failed to resolve site");
                return Err(e);
            }
        };

        let attributor =
            HistoryAttributor::new(session.clone(), site.id.clone(), config.history_limit);
        if config.log_user_changes {
            attributor.start_monitoring(config.monitor_interval).await;
        }

        info!(name = %config.name, site = %site, "accessory initialized");
        Ok(Self {
            information: AccessoryInformation::new(config.name),
            gateway: AlarmGateway::new(session, site),
            attributor,
            host,
            attribution_delay: config.attribution_delay,
        })
    }

    pub fn name(&self) -> &str {
        &self.information.name
    }

    pub fn information(&self) -> &AccessoryInformation {
        &self.information
    }

    pub fn site(&self) -> &Site {
        self.gateway.site()
    }

    pub fn attributor(&self) -> &HistoryAttributor {
        &self.attributor
    }

    /// Raw remote status, including the vendor's last-action block.
    pub async fn alarm_status(&self) -> Result<AlarmStatus, CoreError> {
        self.gateway.read_status().await
    }

    /// Current state, read fresh from the vendor.
    pub async fn current_state(&self) -> Result<SecurityState, CoreError> {
        match self.gateway.read_status().await {
            Ok(status) => Ok(vendor_to_host(&status.status)),
            Err(e) => {
                error!(error = %e, "failed to get current state");
                Err(e)
            }
        }
    }

    /// Target state. The vendor has no separate target, so this reads the
    /// same remote status as [`current_state`](Self::current_state).
    pub async fn target_state(&self) -> Result<SecurityState, CoreError> {
        match self.gateway.read_status().await {
            Ok(status) => Ok(vendor_to_host(&status.status)),
            Err(e) => {
                error!(error = %e, "failed to get target state");
                Err(e)
            }
        }
    }

    /// Write a new target state.
    ///
    /// Once the vendor accepts the write, `target` is pushed to the host as
    /// the current state without waiting for confirmation, and a post-write
    /// attribution check is scheduled. A rejected write pushes nothing.
    pub async fn set_target_state(&self, target: SecurityState) -> Result<(), CoreError> {
        let vendor = host_to_vendor(target);
        if let Err(e) = self.gateway.write_status(&vendor).await {
            error!(error = %e, %target, "failed to set alarm state");
            return Err(e);
        }

        self.host.update_current_state(target);
        self.attributor
            .schedule_post_write_check(self.attribution_delay)
            .await;
        Ok(())
    }

    /// Stop background monitoring and pending post-write checks.
    pub async fn shutdown(&self) {
        self.attributor.shutdown().await;
        info!(name = %self.information.name, "accessory stopped");
    }
}
