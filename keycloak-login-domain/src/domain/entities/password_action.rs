use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// Pending password set/reset for one user, addressed by its id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordCreateAction {
    pub id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<DateTime<Utc>>,
}

impl PasswordCreateAction {
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            expiration_time: None,
        }
    }

    pub fn with_expiration(mut self, expiration_time: DateTime<Utc>) -> Self {
        self.expiration_time = Some(expiration_time);
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        validate_action_id("id", &self.id)?;
        if self.user_id.trim().is_empty() {
            return Err(DomainError::validation("userId", "User id cannot be empty"));
        }
        Ok(())
    }
}

/// Sets a new password through a previously created action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetAction {
    pub password_reset_action_id: String,
    pub new_password: String,
}

impl PasswordResetAction {
    pub fn validate(&self) -> DomainResult<()> {
        validate_action_id("passwordResetActionId", &self.password_reset_action_id)?;
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
pub struct ResponseCreateAction {
    pub password_exists: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseResetAction {
    pub is_new_password: bool,
}

/// Candidate password submitted for the repeatability check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordCheck {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl PasswordCheck {
    pub fn validate(&self) -> DomainResult<()> {
        if self.user_id.as_deref().map_or(true, |id| id.trim().is_empty()) {
            return Err(DomainError::validation("userId", "must not be null"));
        }
        if self.password.is_none() {
            return Err(DomainError::validation("password", "must not be null"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidPasswordResponse {
    pub result: String,
}

impl ValidPasswordResponse {
    pub fn valid() -> Self {
        Self {
            result: "valid".to_string(),
        }
    }
}

fn validate_action_id(field: &str, id: &str) -> DomainResult<()> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| DomainError::validation(field, format!("Invalid UUID string: {id}")))
}
