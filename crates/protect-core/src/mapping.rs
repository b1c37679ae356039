// ── State mapping between host and vendor vocabularies ──
//
// The mapping is lossy. The host has four states and the vendor three, so
// NIGHT_ARM and STAY_ARM both become "partial", and "partial" always reads
// back as STAY_ARM. Anything the vendor reports outside its known
// vocabulary reads as DISARMED.

use crate::model::{SecurityState, VendorAlarmState};

/// Map a vendor status onto the host's current-state model.
pub fn vendor_to_host(state: &VendorAlarmState) -> SecurityState {
    match state {
        VendorAlarmState::Armed => SecurityState::AwayArm,
        VendorAlarmState::Partial => SecurityState::StayArm,
        VendorAlarmState::Disarmed | VendorAlarmState::Other(_) => SecurityState::Disarmed,
    }
}

/// Map a host target state onto the vendor status to write.
pub fn host_to_vendor(state: SecurityState) -> VendorAlarmState {
    match state {
        SecurityState::Disarmed => VendorAlarmState::Disarmed,
        SecurityState::AwayArm => VendorAlarmState::Armed,
        SecurityState::StayArm | SecurityState::NightArm => VendorAlarmState::Partial,
    }
}

/// Decode a raw target characteristic value. Values outside the host model
/// decode to `Disarmed`, and so map to "disarmed".
pub fn target_from_characteristic(value: u8) -> SecurityState {
    SecurityState::from_characteristic(value).unwrap_or(SecurityState::Disarmed)
}
