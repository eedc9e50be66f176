use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Username/password pair used to log in or to create credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_id: None,
            username: Some(username.into()),
            password: password.into(),
        }
    }

    pub fn for_user(user_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            username: None,
            password: password.into(),
        }
    }

    /// Non-blank platform user id, if one was given.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref().filter(|id| !id.trim().is_empty())
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.password.is_empty() {
            return Err(DomainError::validation("password", "Password cannot be empty"));
        }
        let has_username = self
            .username
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty());
        if self.user_id().is_none() && !has_username {
            return Err(DomainError::validation(
                "username",
                "Either userId or username must be provided",
            ));
        }
        Ok(())
    }
}

/// Password change request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCredentials {
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub new_password: String,
}

impl UpdateCredentials {
    pub fn validate(&self) -> DomainResult<()> {
        if self.user_id.trim().is_empty() {
            return Err(DomainError::validation("userId", "User id cannot be empty"));
        }
        if self.new_password.is_empty() {
            return Err(DomainError::validation(
                "newPassword",
                "New password cannot be empty",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsExistence {
    pub credentials_exist: bool,
}

/// Failed login statistics for a platform user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginAttempts {
    pub user_id: String,
    pub attempt_count: u32,
    pub last_attempt: DateTime<Utc>,
}

/// Keycloak brute-force detector status for one user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BruteForceStatus {
    #[serde(default)]
    pub num_failures: u32,
    /// Millis since epoch, 0 when no failure was recorded
    #[serde(default)]
    pub last_failure: i64,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub last_ip_failure: Option<String>,
}
