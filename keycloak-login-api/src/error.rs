use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use keycloak_login_domain::DomainError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Domain(e) => match e {
                DomainError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
                DomainError::TokenParsing { .. } => (StatusCode::BAD_REQUEST, "token_parsing_error"),
                DomainError::TokenRequestFailed { .. } => {
                    (StatusCode::BAD_REQUEST, "token_request_error")
                }
                DomainError::CredentialsAlreadyExist { .. } => {
                    (StatusCode::BAD_REQUEST, "credentials_exist_error")
                }
                DomainError::AmbiguousUser { .. } => (StatusCode::BAD_REQUEST, "ambiguous_user_error"),
                DomainError::PasswordActionExists { .. } => (StatusCode::BAD_REQUEST, "found_error"),
                DomainError::UserNotFound { .. }
                | DomainError::UsernameNotFound { .. }
                | DomainError::CredentialsNotFound { .. }
                | DomainError::PasswordActionNotFound { .. } => {
                    (StatusCode::NOT_FOUND, "not_found_error")
                }
                DomainError::TokenRefreshFailed { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "token_refresh_error")
                }
                DomainError::TokenLogoutFailed { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "token_logout_error")
                }
                DomainError::ExternalService { .. } => (StatusCode::BAD_GATEWAY, "service_error"),
                DomainError::Configuration { .. } | DomainError::Serialization { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "unknown_error")
                }
            },
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "unknown_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = Json(json!({
            "errors": [{
                "message": self.to_string(),
                "type": "error",
                "code": code,
            }],
            "totalRecords": 1,
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
