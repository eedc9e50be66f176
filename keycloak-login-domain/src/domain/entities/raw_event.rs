use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Activity event as recorded by Keycloak for a user action (login, password change, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEventRecord {
    pub time: Option<i64>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub realm_id: Option<String>,
    pub client_id: Option<String>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub ip_address: Option<String>,
    pub error: Option<String>,
    #[serde(default)]
    pub details: HashMap<String, String>,
}

/// Who performed an administrative action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthDetails {
    pub realm_id: Option<String>,
    pub client_id: Option<String>,
    pub user_id: Option<String>,
    pub ip_address: Option<String>,
}

/// Administrative event as recorded by Keycloak for an admin API call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminEventRecord {
    pub time: Option<i64>,
    pub realm_id: Option<String>,
    pub operation_type: Option<String>,
    pub resource_type: Option<String>,
    pub resource_path: Option<String>,
    pub auth_details: Option<AuthDetails>,
    pub error: Option<String>,
}

/// Raw upstream record, tagged by the stream it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEventRecord {
    Activity(UserEventRecord),
    Admin(AdminEventRecord),
}

impl RawEventRecord {
    /// Event time in UTC; `None` when absent or out of range.
    pub fn timestamp_of(time: Option<i64>) -> Option<DateTime<Utc>> {
        time.and_then(|millis| Utc.timestamp_millis_opt(millis).single())
    }
}
