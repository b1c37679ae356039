//! Token lifecycle, state reconciliation, and the security-system accessory
//! facade on top of `protect-api`.
//!
//! - **[`Accessory`]**: host-facing facade.
//!   [`start()`](Accessory::start) authenticates, resolves the site, and
//!   starts history monitoring when enabled. Reads always hit the vendor;
//!   writes push an optimistic current-state update to the [`HostBridge`].
//!
//! - **[`TokenGuard`]**: runs before every authorized call and keeps the
//!   shared credential store valid (refresh grant if possible, password
//!   grant otherwise). Re-authentication is single-flight.
//!
//! - **[`HistoryAttributor`]**: answers "who changed the alarm last" from the
//!   site history feed, runs the periodic monitoring loop, and owns the
//!   post-write checks. Stopped with [`shutdown()`](HistoryAttributor::shutdown).
//!
//! - **[`mapping`]**: lossy translation between the host's 4-state model and
//!   the vendor's open status vocabulary.
//!
//! - **[`CallbackAdapter`]**: the host's callback convention over the async
//!   core.

pub mod accessory;
pub mod config;
pub mod convert;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod history;
pub mod host;
pub mod mapping;
pub mod model;
pub mod session;
pub mod site;

// ── Primary re-exports ──────────────────────────────────────────────
pub use accessory::Accessory;
pub use config::{AccessoryConfig, Endpoints};
pub use error::CoreError;
pub use gateway::AlarmGateway;
pub use guard::TokenGuard;
pub use history::{HistoryAttributor, latest_alarm_action};
pub use host::{AccessoryInformation, CallbackAdapter, HostBridge, HostError};
pub use session::Session;
pub use site::{SiteSelection, select_site};

pub use model::{
    Actor, AlarmEventType, AlarmStatus, Attribution, HistoryEvent, LastAction, SecurityState,
    Site, VendorAlarmState,
};
