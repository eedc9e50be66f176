use crate::{dto::LogEventsQuery, error::AppResult, handlers::tenant::Tenant, state::AppState};
use axum::{
    extract::{Query, State},
    Json,
};
use keycloak_login_domain::LogEventCollection;
use tracing::debug;

pub async fn get_log_events(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Query(query): Query<LogEventsQuery>,
) -> AppResult<Json<LogEventCollection>> {
    let window = query.window()?;
    debug!(tenant = %tenant, ?window, "Reading log events");

    let events = state.log_events.get_log_events(&tenant, window).await?;
    Ok(Json(events))
}
