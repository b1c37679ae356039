// ── History and attribution domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// History event types that record an alarm state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlarmEventType {
    #[serde(rename = "alarm_arm")]
    Arm,
    #[serde(rename = "alarm_disarm")]
    Disarm,
    #[serde(rename = "alarm_partial")]
    Partial,
}

impl AlarmEventType {
    pub const ALL: [Self; 3] = [Self::Arm, Self::Disarm, Self::Partial];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arm => "alarm_arm",
            Self::Disarm => "alarm_disarm",
            Self::Partial => "alarm_partial",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// The user behind a history event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// One entry of the site history feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    /// Timestamp exactly as the vendor sent it.
    pub timestamp: String,
    /// Parsed timestamp, `None` when the vendor format is unrecognized.
    pub occurred_at: Option<DateTime<Utc>>,
    pub event_type: String,
    pub actor: Option<Actor>,
    pub action: Option<String>,
    pub device_type: Option<String>,
}

impl HistoryEvent {
    /// The alarm event type, if this is an arm/disarm/partial event.
    pub fn alarm_event_type(&self) -> Option<AlarmEventType> {
        AlarmEventType::parse(&self.event_type)
    }
}

/// Who most recently changed the alarm state, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    pub actor_name: Option<String>,
    pub actor_id: Option<String>,
    pub timestamp: String,
    pub occurred_at: Option<DateTime<Utc>>,
    pub event_type: AlarmEventType,
}
