// ── Domain model ──
//
// Canonical types the accessory works with, independent of the vendor's
// wire shapes (see `convert` for the mapping from `protect_api::models`).

pub mod alarm;
pub mod history;
pub mod security;
pub mod site;

pub use alarm::{AlarmStatus, LastAction};
pub use history::{Actor, AlarmEventType, Attribution, HistoryEvent};
pub use security::{SecurityState, VendorAlarmState};
pub use site::Site;
