use crate::error::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

pub const TENANT_HEADER: &str = "x-okapi-tenant";
pub const USER_ID_HEADER: &str = "x-okapi-user-id";
pub const TOKEN_HEADER: &str = "x-okapi-token";

/// Tenant of the request; also the Keycloak realm name
#[derive(Debug, Clone)]
pub struct Tenant(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Tenant {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(TENANT_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|tenant| !tenant.is_empty())
            .map(|tenant| Tenant(tenant.to_string()))
            .ok_or_else(|| AppError::bad_request(format!("{TENANT_HEADER} header is required")))
    }
}

/// Platform user id of the caller, when the gateway supplied one
#[derive(Debug, Clone, Default)]
pub struct RequestUser(pub Option<String>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestUser(
            parts
                .headers
                .get(USER_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|user| !user.is_empty())
                .map(str::to_string),
        ))
    }
}
