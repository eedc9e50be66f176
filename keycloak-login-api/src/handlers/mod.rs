pub mod credentials;
pub mod health;
pub mod log_events;
pub mod login;
pub mod login_attempts;
pub mod password;
pub mod tenant;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// All routes of the service with request tracing and CORS applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Audit feed
        .route("/authn/log/events", get(log_events::get_log_events))
        // Login and session endpoints
        .route("/authn/login", post(login::login))
        .route("/authn/login-with-expiry", post(login::login_with_expiry))
        .route("/authn/token", post(login::token))
        .route("/authn/refresh", post(login::refresh))
        .route("/authn/logout", post(login::logout))
        .route("/authn/logout-all", post(login::logout_all))
        // Credential endpoints
        .route(
            "/authn/credentials",
            post(credentials::create_credentials).delete(credentials::delete_credentials),
        )
        .route(
            "/authn/credentials-existence",
            get(credentials::credentials_existence),
        )
        .route("/authn/update", post(credentials::update_credentials))
        // Password actions
        .route(
            "/authn/password-reset-action",
            post(password::create_reset_password_action),
        )
        .route(
            "/authn/password-reset-action/:action_id",
            get(password::get_password_action),
        )
        .route("/authn/reset-password", post(password::reset_password))
        .route(
            "/authn/password/repeatable",
            post(password::validate_password_repeatability),
        )
        .route(
            "/authn/loginAttempts/:user_id",
            get(login_attempts::get_login_attempts),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
