// Wire models for the vendor API
//
// Field names follow the vendor JSON exactly. Everything the vendor might
// omit is an `Option` so that a partial payload still deserializes.

use serde::{Deserialize, Serialize};

/// OAuth token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Token lifetime in seconds, relative to the response.
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// `GET /v2/client/site` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteResponse {
    pub site_id: String,
    #[serde(default)]
    pub label: String,
}

/// `GET /v2/client/site/{site_id}/security`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityResponse {
    /// Open vocabulary: "disarmed", "armed", "partial", and whatever else
    /// the vendor adds later.
    pub status: String,
    #[serde(default)]
    pub last_action: Option<LastActionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastActionResponse {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub action_type: Option<String>,
}

/// `PUT /v2/client/site/{site_id}/security` body.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityUpdate<'a> {
    pub status: &'a str,
}

/// `GET /v2/client/site/{site_id}/history` element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEventResponse {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub user: Option<HistoryUserResponse>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryUserResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}
