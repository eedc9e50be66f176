use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token issued to an end user, with its decoded expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub jwt: String,
    pub expiration_date: DateTime<Utc>,
    /// Lifetime in seconds as reported by the token endpoint
    pub expires_in: i64,
}

/// Access and refresh token pair returned by login and refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenContainer {
    pub access_token: Token,
    pub refresh_token: Token,
}

/// Raw token endpoint response for a realm client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeycloakAuthentication {
    pub access_token: String,
    pub expires_in: i64,
    pub refresh_token: String,
    pub refresh_expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub session_state: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}
