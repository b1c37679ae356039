// ── Security state vocabularies ──
//
// Two incompatible vocabularies meet here: the host platform's fixed
// 4-state security-system model and the vendor's open set of alarm status
// strings. Translation between them lives in `crate::mapping`.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

// ── SecurityState ───────────────────────────────────────────────────

/// Host-side security-system state.
///
/// Used for both the current-state and the target-state characteristic;
/// the host encodes DISARMED (current) and DISARM (target) with the same
/// value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum SecurityState {
    Disarmed,
    AwayArm,
    StayArm,
    NightArm,
}

impl SecurityState {
    /// Numeric characteristic value on the host platform.
    pub const fn characteristic_value(self) -> u8 {
        match self {
            Self::StayArm => 0,
            Self::AwayArm => 1,
            Self::NightArm => 2,
            Self::Disarmed => 3,
        }
    }

    /// Decode a characteristic value. `None` for values outside the model.
    pub const fn from_characteristic(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::StayArm),
            1 => Some(Self::AwayArm),
            2 => Some(Self::NightArm),
            3 => Some(Self::Disarmed),
            _ => None,
        }
    }
}

// ── VendorAlarmState ────────────────────────────────────────────────

/// Vendor alarm status string.
///
/// The vocabulary is observed rather than documented, so anything
/// unrecognized is carried verbatim in [`Other`](Self::Other) instead of
/// failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VendorAlarmState {
    Disarmed,
    Armed,
    Partial,
    Other(String),
}

impl VendorAlarmState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Disarmed => "disarmed",
            Self::Armed => "armed",
            Self::Partial => "partial",
            Self::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for VendorAlarmState {
    fn from(s: &str) -> Self {
        match s {
            "disarmed" => Self::Disarmed,
            "armed" => Self::Armed,
            "partial" => Self::Partial,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for VendorAlarmState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "disarmed" => Self::Disarmed,
            "armed" => Self::Armed,
            "partial" => Self::Partial,
            _ => Self::Other(s),
        }
    }
}

impl From<VendorAlarmState> for String {
    fn from(state: VendorAlarmState) -> Self {
        match state {
            VendorAlarmState::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl FromStr for VendorAlarmState {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for VendorAlarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
