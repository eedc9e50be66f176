//! Token cookies set by login, refresh and logout responses.

use axum::http::{header, HeaderMap, HeaderValue};
use cookie::{time::Duration, Cookie, SameSite};
use keycloak_login_domain::{SameSitePolicy, Token, TokenContainer};

pub const ACCESS_TOKEN_COOKIE: &str = "folioAccessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "folioRefreshToken";

const ACCESS_TOKEN_PATH: &str = "/";
const REFRESH_TOKEN_PATH: &str = "/authn";

fn same_site(policy: SameSitePolicy) -> SameSite {
    match policy {
        SameSitePolicy::None => SameSite::None,
        SameSitePolicy::Lax => SameSite::Lax,
        SameSitePolicy::Strict => SameSite::Strict,
    }
}

fn token_cookie(
    name: &'static str,
    path: &'static str,
    value: String,
    max_age: Duration,
    policy: SameSitePolicy,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path(path)
        .http_only(true)
        .secure(true)
        .max_age(max_age)
        .same_site(same_site(policy))
        .build()
}

fn cookie_for(name: &'static str, path: &'static str, token: &Token, policy: SameSitePolicy) -> Cookie<'static> {
    token_cookie(
        name,
        path,
        token.jwt.clone(),
        Duration::seconds(token.expires_in),
        policy,
    )
}

/// `Set-Cookie` values carrying both tokens of a login or refresh.
pub fn authorization_cookies(tokens: &TokenContainer, policy: SameSitePolicy) -> Vec<String> {
    vec![
        cookie_for(ACCESS_TOKEN_COOKIE, ACCESS_TOKEN_PATH, &tokens.access_token, policy).to_string(),
        cookie_for(REFRESH_TOKEN_COOKIE, REFRESH_TOKEN_PATH, &tokens.refresh_token, policy)
            .to_string(),
    ]
}

/// `Set-Cookie` values that make the browser drop both token cookies.
pub fn expired_cookies(policy: SameSitePolicy) -> Vec<String> {
    [
        (ACCESS_TOKEN_COOKIE, ACCESS_TOKEN_PATH),
        (REFRESH_TOKEN_COOKIE, REFRESH_TOKEN_PATH),
    ]
    .into_iter()
    .map(|(name, path)| token_cookie(name, path, String::new(), Duration::ZERO, policy).to_string())
    .collect()
}

/// Appends every cookie as its own `Set-Cookie` header.
pub fn append_set_cookies(headers: &mut HeaderMap, cookies: &[String]) {
    for value in cookies {
        if let Ok(value) = HeaderValue::from_str(value) {
            headers.append(header::SET_COOKIE, value);
        }
    }
}

/// Value of the named cookie in the request `Cookie` headers.
pub fn request_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}
