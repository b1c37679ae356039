// ── Alarm status domain types ──

use serde::{Deserialize, Serialize};

use super::security::VendorAlarmState;

/// Remote alarm status, fetched fresh on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmStatus {
    pub status: VendorAlarmState,
    pub last_action: Option<LastAction>,
}

/// The vendor's own record of the last state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastAction {
    pub user_name: Option<String>,
    pub user_id: Option<String>,
    pub timestamp: Option<String>,
    pub action_type: Option<String>,
}
