use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::application::ports::auth::*;
use crate::application::ports::config::KeycloakConfig;
use crate::domain::entities::KeycloakAuthentication;
use crate::domain::errors::*;

/// Raw token response from Keycloak
#[derive(Debug, Clone, Deserialize)]
struct RawTokenResponse {
    access_token: String,
    expires_in: i64,
    refresh_expires_in: Option<i64>,
    refresh_token: Option<String>,
    scope: Option<String>,
    session_state: Option<String>,
    token_type: Option<String>,
}

/// OpenID Connect token endpoint client for admin and tenant realms
pub struct KeycloakTokenManager {
    config: KeycloakConfig,
    client: reqwest::Client,
}

impl KeycloakTokenManager {
    pub fn new(config: KeycloakConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, String)],
        origin: &RequestOrigin,
    ) -> Result<reqwest::Response, String> {
        let mut request = self.client.post(url).form(form);
        if let Some(user_agent) = &origin.user_agent {
            request = request.header(reqwest::header::USER_AGENT, user_agent);
        }
        if let Some(forwarded_for) = &origin.forwarded_for {
            request = request.header("X-Forwarded-For", forwarded_for);
        }

        let response = request
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(format!("HTTP error {status}: {error_text}"));
        }
        Ok(response)
    }
}

#[async_trait]
impl TokenManager for KeycloakTokenManager {
    async fn acquire_token(&self, credentials: &AdminCredentials) -> Result<AuthToken, AuthError> {
        let token_url = self.config.get_token_url(&credentials.realm);
        let form = [
            ("client_id", credentials.client_id.clone()),
            ("username", credentials.username.clone()),
            ("password", credentials.password.clone()),
            ("grant_type", credentials.grant_type.clone()),
        ];

        let response = self
            .post_form(&token_url, &form, &RequestOrigin::default())
            .await
            .map_err(|reason| AuthError::TokenAcquisitionFailed { reason })?;

        let raw_token: RawTokenResponse =
            response
                .json()
                .await
                .map_err(|e| AuthError::TokenAcquisitionFailed {
                    reason: format!("Failed to parse token response: {e}"),
                })?;

        Ok(AuthToken::new(
            raw_token.access_token,
            raw_token.expires_in,
            raw_token.refresh_token,
            raw_token.token_type,
        ))
    }
}

#[async_trait]
impl TokenEndpoint for KeycloakTokenManager {
    async fn exchange(
        &self,
        realm: &str,
        client: &RealmClient,
        grant: &TokenGrant,
        origin: &RequestOrigin,
    ) -> Result<KeycloakAuthentication, AuthError> {
        let failed = |reason: String| match grant {
            TokenGrant::RefreshToken { .. } => AuthError::TokenRefreshFailed { reason },
            _ => AuthError::TokenAcquisitionFailed { reason },
        };

        debug!(realm, grant_type = grant.grant_type(), "Calling token endpoint");
        let response = self
            .post_form(&self.config.get_token_url(realm), &grant.form(client), origin)
            .await
            .map_err(failed)?;

        let raw: RawTokenResponse = response
            .json()
            .await
            .map_err(|e| failed(format!("Failed to parse token response: {e}")))?;

        let refresh_token = raw
            .refresh_token
            .ok_or_else(|| failed("Token response has no refresh token".to_string()))?;

        Ok(KeycloakAuthentication {
            access_token: raw.access_token,
            expires_in: raw.expires_in,
            refresh_token,
            refresh_expires_in: raw.refresh_expires_in.unwrap_or_default(),
            token_type: raw.token_type,
            session_state: raw.session_state,
            scope: raw.scope,
        })
    }

    async fn logout(
        &self,
        realm: &str,
        client: &RealmClient,
        refresh_token: &str,
    ) -> Result<(), AuthError> {
        let form = [
            ("client_id", client.client_id.clone()),
            ("client_secret", client.client_secret.clone()),
            ("refresh_token", refresh_token.to_string()),
        ];

        self.post_form(
            &self.config.get_logout_url(realm),
            &form,
            &RequestOrigin::default(),
        )
        .await
        .map_err(|reason| AuthError::TokenRevocationFailed { reason })?;
        Ok(())
    }
}

/// Keeps one admin token and replaces it shortly before it expires
pub struct CachedAdminTokenProvider {
    token_manager: Arc<dyn TokenManager>,
    credentials: AdminCredentials,
    refresh_threshold_seconds: i64,
    cached: RwLock<Option<AuthToken>>,
}

impl CachedAdminTokenProvider {
    pub fn new(
        token_manager: Arc<dyn TokenManager>,
        credentials: AdminCredentials,
        refresh_threshold_seconds: u64,
    ) -> Self {
        Self {
            token_manager,
            credentials,
            refresh_threshold_seconds: i64::try_from(refresh_threshold_seconds)
                .unwrap_or(i64::MAX),
            cached: RwLock::new(None),
        }
    }

    fn usable(&self, token: &Option<AuthToken>) -> Option<AuthToken> {
        token
            .as_ref()
            .filter(|t| !t.is_expiring_soon(self.refresh_threshold_seconds))
            .cloned()
    }
}

#[async_trait]
impl AdminTokenProvider for CachedAdminTokenProvider {
    async fn admin_token(&self) -> Result<AuthToken, AuthError> {
        if let Some(token) = self.usable(&*self.cached.read().await) {
            return Ok(token);
        }

        let mut cached = self.cached.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(token) = self.usable(&cached) {
            return Ok(token);
        }

        let token = self.token_manager.acquire_token(&self.credentials).await?;
        info!(
            realm = %self.credentials.realm,
            expires_at = %token.expires_at,
            "Acquired admin token"
        );
        *cached = Some(token.clone());
        Ok(token)
    }
}
