use crate::{dto::UserIdQuery, error::AppResult, handlers::tenant::Tenant, state::AppState};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use keycloak_login_domain::{CredentialsExistence, LoginCredentials, UpdateCredentials};

pub async fn create_credentials(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Json(credentials): Json<LoginCredentials>,
) -> AppResult<StatusCode> {
    state
        .credentials_service
        .create_credentials(&tenant, &credentials)
        .await?;
    Ok(StatusCode::CREATED)
}

pub async fn delete_credentials(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Query(query): Query<UserIdQuery>,
) -> AppResult<StatusCode> {
    state
        .credentials_service
        .delete_credentials(&tenant, query.required()?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn credentials_existence(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Query(query): Query<UserIdQuery>,
) -> AppResult<Json<CredentialsExistence>> {
    let existence = state
        .credentials_service
        .credentials_exist(&tenant, query.required()?)
        .await?;
    Ok(Json(existence))
}

pub async fn update_credentials(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Json(update): Json<UpdateCredentials>,
) -> AppResult<StatusCode> {
    state
        .credentials_service
        .update_credentials(&tenant, &update)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
