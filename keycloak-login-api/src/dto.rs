use chrono::{DateTime, Utc};
use keycloak_login_domain::{EventWindow, TokenContainer};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// `GET /authn/log/events` query; `start` is 1-based
#[derive(Debug, Default, Deserialize)]
pub struct LogEventsQuery {
    pub start: Option<i64>,
    pub length: Option<i64>,
    /// Accepted for compatibility, not applied
    pub query: Option<String>,
}

impl LogEventsQuery {
    pub fn window(&self) -> AppResult<EventWindow> {
        let start = self.start.unwrap_or(1);
        if start < 1 {
            return Err(AppError::bad_request(format!(
                "start must be greater than or equal to 1, got {start}"
            )));
        }

        let length = match self.length {
            None => EventWindow::DEFAULT_LENGTH,
            Some(length) => usize::try_from(length).map_err(|_| {
                AppError::bad_request(format!(
                    "length must be greater than or equal to 0, got {length}"
                ))
            })?,
        };

        let offset = usize::try_from(start - 1)
            .map_err(|_| AppError::bad_request(format!("start is out of range: {start}")))?;
        Ok(EventWindow::new(offset, length))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: Option<String>,
}

impl UserIdQuery {
    pub fn required(&self) -> AppResult<&str> {
        self.user_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::bad_request("userId query parameter is required"))
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub code: Option<String>,
    #[serde(rename = "redirect-uri")]
    pub redirect_uri: Option<String>,
}

/// Body of `/authn/login`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub okapi_token: String,
    pub refresh_token: String,
}

impl From<&TokenContainer> for LoginResponse {
    fn from(tokens: &TokenContainer) -> Self {
        Self {
            okapi_token: tokens.access_token.jwt.clone(),
            refresh_token: tokens.refresh_token.jwt.clone(),
        }
    }
}

/// Body of the cookie-based endpoints; tokens travel only in cookies
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseWithExpiry {
    pub access_token_expiration: DateTime<Utc>,
    pub refresh_token_expiration: DateTime<Utc>,
}

impl From<&TokenContainer> for LoginResponseWithExpiry {
    fn from(tokens: &TokenContainer) -> Self {
        Self {
            access_token_expiration: tokens.access_token.expiration_date,
            refresh_token_expiration: tokens.refresh_token.expiration_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
