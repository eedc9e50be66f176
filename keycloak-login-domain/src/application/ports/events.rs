use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Publisher port for session lifecycle events
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: LogoutEvent) -> Result<(), EventError>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogoutEventType {
    /// One session ended
    Logout,
    /// Every session of the user ended
    LogoutAll,
}

/// Emitted after a successful logout so other services can drop cached sessions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogoutEvent {
    pub id: String,
    pub tenant: String,
    pub user_id: Option<String>,
    pub keycloak_user_id: Option<String>,
    pub session_id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: LogoutEventType,
    pub timestamp: DateTime<Utc>,
}

impl LogoutEvent {
    pub fn logout(
        tenant: impl Into<String>,
        user_id: Option<String>,
        session_id: Option<String>,
    ) -> Self {
        Self::new(tenant.into(), user_id, None, session_id, LogoutEventType::Logout)
    }

    pub fn logout_all(
        tenant: impl Into<String>,
        user_id: impl Into<String>,
        keycloak_user_id: impl Into<String>,
    ) -> Self {
        Self::new(
            tenant.into(),
            Some(user_id.into()),
            Some(keycloak_user_id.into()),
            None,
            LogoutEventType::LogoutAll,
        )
    }

    fn new(
        tenant: String,
        user_id: Option<String>,
        keycloak_user_id: Option<String>,
        session_id: Option<String>,
        event_type: LogoutEventType,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant,
            user_id,
            keycloak_user_id,
            session_id,
            event_type,
            timestamp: Utc::now(),
        }
    }
}

/// Event-related errors
#[derive(Error, Debug)]
pub enum EventError {
    #[error("Event serialization failed: {message}")]
    SerializationFailed { message: String },

    #[error("Event publishing failed: {message}")]
    PublishFailed { message: String },
}
