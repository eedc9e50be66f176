use crate::{
    cookies::{self, REFRESH_TOKEN_COOKIE},
    dto::{LoginResponse, LoginResponseWithExpiry, TokenQuery},
    error::{AppError, AppResult},
    handlers::tenant::{RequestUser, Tenant, TOKEN_HEADER},
    state::AppState,
};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use keycloak_login_domain::{DomainResult, LoginCredentials, RequestOrigin, TokenContainer};
use serde::Serialize;

const FORWARDED_FOR: &str = "x-forwarded-for";

fn header_string(headers: &HeaderMap, name: impl header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn request_origin(headers: &HeaderMap) -> RequestOrigin {
    RequestOrigin::new(
        header_string(headers, header::USER_AGENT),
        header_string(headers, FORWARDED_FOR),
    )
}

/// 201 with token cookies, the optional token header and `body`.
fn token_response<B: Serialize>(state: &AppState, tokens: &TokenContainer, body: B) -> Response {
    let mut headers = HeaderMap::new();
    cookies::append_set_cookies(
        &mut headers,
        &cookies::authorization_cookies(tokens, state.cookies.same_site),
    );
    if state.cookies.token_header_enabled {
        if let Ok(value) = HeaderValue::from_str(&tokens.access_token.jwt) {
            headers.insert(TOKEN_HEADER, value);
        }
    }

    (StatusCode::CREATED, headers, Json(body)).into_response()
}

/// Logout outcome with the token cookies cleared either way.
fn logout_response(state: &AppState, result: DomainResult<()>) -> Response {
    let mut response = match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => AppError::from(e).into_response(),
    };
    cookies::append_set_cookies(
        response.headers_mut(),
        &cookies::expired_cookies(state.cookies.same_site),
    );
    response
}

pub async fn login(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    headers: HeaderMap,
    Json(credentials): Json<LoginCredentials>,
) -> AppResult<Response> {
    let tokens = state
        .auth_service
        .login(&tenant, &credentials, &request_origin(&headers))
        .await?;
    Ok(token_response(&state, &tokens, LoginResponse::from(&tokens)))
}

pub async fn login_with_expiry(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    headers: HeaderMap,
    Json(credentials): Json<LoginCredentials>,
) -> AppResult<Response> {
    let tokens = state
        .auth_service
        .login(&tenant, &credentials, &request_origin(&headers))
        .await?;
    Ok(token_response(
        &state,
        &tokens,
        LoginResponseWithExpiry::from(&tokens),
    ))
}

pub async fn token(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Query(query): Query<TokenQuery>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let tokens = state
        .auth_service
        .token(
            &tenant,
            query.code.as_deref().unwrap_or_default(),
            query.redirect_uri.as_deref().unwrap_or_default(),
            &request_origin(&headers),
        )
        .await?;
    Ok(token_response(
        &state,
        &tokens,
        LoginResponseWithExpiry::from(&tokens),
    ))
}

pub async fn refresh(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    headers: HeaderMap,
) -> AppResult<Response> {
    let refresh_token = cookies::request_cookie(&headers, REFRESH_TOKEN_COOKIE)
        .ok_or_else(|| AppError::bad_request("No Refresh token Cookie"))?;

    let tokens = state
        .auth_service
        .refresh_token(&tenant, &refresh_token)
        .await?;
    Ok(token_response(
        &state,
        &tokens,
        LoginResponseWithExpiry::from(&tokens),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    RequestUser(user_id): RequestUser,
    headers: HeaderMap,
) -> Response {
    let refresh_token = cookies::request_cookie(&headers, REFRESH_TOKEN_COOKIE);
    let result = state
        .auth_service
        .logout(&tenant, refresh_token.as_deref(), user_id.as_deref())
        .await;
    logout_response(&state, result)
}

pub async fn logout_all(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    RequestUser(user_id): RequestUser,
) -> Response {
    let result = state
        .auth_service
        .logout_all(&tenant, user_id.as_deref())
        .await;
    logout_response(&state, result)
}
