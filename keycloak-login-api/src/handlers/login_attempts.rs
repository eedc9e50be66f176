use crate::{error::AppResult, handlers::tenant::Tenant, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use keycloak_login_domain::LoginAttempts;

pub async fn get_login_attempts(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(user_id): Path<String>,
) -> AppResult<Json<LoginAttempts>> {
    let attempts = state
        .login_attempts_service
        .get_login_attempts(&tenant, &user_id)
        .await?;
    Ok(Json(attempts))
}
