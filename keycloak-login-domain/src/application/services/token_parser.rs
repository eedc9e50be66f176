//! Unverified JWT payload reads. Tokens come straight from Keycloak's token
//! endpoint, so only the claims needed for cookies and logout events are decoded.

use crate::domain::errors::{DomainError, DomainResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct PayloadClaims {
    exp: Option<i64>,
    sid: Option<String>,
}

fn parsing_error(reason: &str) -> DomainError {
    DomainError::TokenParsing {
        reason: reason.to_string(),
    }
}

fn decode_claims(token: &str) -> DomainResult<PayloadClaims> {
    let segments: Vec<&str> = token.split('.').collect();
    if !(2..=3).contains(&segments.len()) {
        return Err(parsing_error("Invalid amount of segments in JWT token."));
    }

    // Some issuers pad the payload even though JWTs should not be padded.
    let payload = segments[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD.decode(payload).map_err(|e| {
        warn!(error = %e, "Failed to decode token payload");
        parsing_error("Invalid token.")
    })?;

    serde_json::from_slice(&bytes).map_err(|e| {
        warn!(error = %e, "Failed to parse token payload");
        parsing_error("Invalid token.")
    })
}

/// Expiration instant (`exp` claim) of a JWT.
pub fn parse_expiration(token: &str) -> DomainResult<DateTime<Utc>> {
    let exp = decode_claims(token)?
        .exp
        .ok_or_else(|| parsing_error("Invalid token."))?;

    Utc.timestamp_opt(exp, 0)
        .single()
        .ok_or_else(|| parsing_error("Invalid token."))
}

/// Keycloak session id (`sid` claim), if the token carries one.
pub fn parse_session_id(token: &str) -> DomainResult<Option<String>> {
    Ok(decode_claims(token)?.sid)
}
