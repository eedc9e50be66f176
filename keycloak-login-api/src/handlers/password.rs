use crate::{error::AppResult, handlers::tenant::Tenant, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use keycloak_login_domain::{
    PasswordCheck, PasswordCreateAction, PasswordResetAction, ResponseCreateAction,
    ResponseResetAction, ValidPasswordResponse,
};

pub async fn create_reset_password_action(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Json(action): Json<PasswordCreateAction>,
) -> AppResult<(StatusCode, Json<ResponseCreateAction>)> {
    let response = state
        .password_service
        .create_reset_password_action(&tenant, action)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_password_action(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(action_id): Path<String>,
) -> AppResult<Json<PasswordCreateAction>> {
    let action = state
        .password_service
        .get_password_action(&tenant, &action_id)
        .await?;
    Ok(Json(action))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Json(reset): Json<PasswordResetAction>,
) -> AppResult<(StatusCode, Json<ResponseResetAction>)> {
    let response = state.password_service.reset_password(&tenant, &reset).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn validate_password_repeatability(
    State(state): State<AppState>,
    Tenant(_tenant): Tenant,
    Json(check): Json<PasswordCheck>,
) -> AppResult<Json<ValidPasswordResponse>> {
    Ok(Json(state.password_service.validate_repeatability(&check)?))
}
