// ── API-to-domain type conversions ──
//
// Bridges raw `protect_api::models` response types into canonical
// `protect_core::model` domain types. Timestamps are parsed here once so
// that attribution ordering never re-parses strings.

use chrono::{DateTime, NaiveDateTime, Utc};

use protect_api::models::{
    HistoryEventResponse, HistoryUserResponse, LastActionResponse, SecurityResponse, SiteResponse,
};

use crate::model::{Actor, AlarmStatus, HistoryEvent, LastAction, Site, VendorAlarmState};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse a vendor timestamp to `DateTime<Utc>`.
///
/// Accepts RFC 3339 and the offset-without-colon variant
/// (`2024-01-01T08:00:00+0000`) the history feed also produces.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }
    // Naive timestamps are taken as UTC.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

// ── Conversions ────────────────────────────────────────────────────

impl From<SiteResponse> for Site {
    fn from(s: SiteResponse) -> Self {
        Site {
            id: s.site_id,
            label: s.label,
        }
    }
}

impl From<LastActionResponse> for LastAction {
    fn from(a: LastActionResponse) -> Self {
        LastAction {
            user_name: a.user_name,
            user_id: a.user_id,
            timestamp: a.timestamp,
            action_type: a.action_type,
        }
    }
}

impl From<SecurityResponse> for AlarmStatus {
    fn from(s: SecurityResponse) -> Self {
        AlarmStatus {
            status: VendorAlarmState::from(s.status),
            last_action: s.last_action.map(LastAction::from),
        }
    }
}

impl From<HistoryUserResponse> for Actor {
    fn from(u: HistoryUserResponse) -> Self {
        Actor {
            id: u.id,
            name: u.name,
        }
    }
}

impl From<HistoryEventResponse> for HistoryEvent {
    fn from(e: HistoryEventResponse) -> Self {
        let occurred_at = parse_timestamp(&e.timestamp);
        HistoryEvent {
            timestamp: e.timestamp,
            occurred_at,
            event_type: e.event_type,
            actor: e.user.map(Actor::from),
            action: e.action,
            device_type: e.device_type,
        }
    }
}
