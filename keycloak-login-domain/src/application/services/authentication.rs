use crate::{
    application::{
        ports::*,
        services::{token_parser, user_lookup},
    },
    domain::{
        entities::*,
        errors::{DomainError, DomainResult},
    },
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const TOKEN_REFRESH_UNPROCESSABLE: &str =
    "Authorization server unable to process token refresh request";
const TOKEN_LOGOUT_UNPROCESSABLE: &str =
    "Authorization server unable to process token logout request";

/// End-user login, token refresh and logout against tenant realms
pub struct AuthenticationService {
    token_endpoint: Arc<dyn TokenEndpoint>,
    realm_config: Arc<dyn RealmConfigurationProvider>,
    repository: Arc<dyn KeycloakRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl AuthenticationService {
    pub fn new(
        token_endpoint: Arc<dyn TokenEndpoint>,
        realm_config: Arc<dyn RealmConfigurationProvider>,
        repository: Arc<dyn KeycloakRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            token_endpoint,
            realm_config,
            repository,
            event_publisher,
        }
    }

    /// Password login. A credentials object carrying only `userId` is resolved
    /// to the linked Keycloak username first.
    #[instrument(skip(self, credentials, origin), fields(tenant = %tenant))]
    pub async fn login(
        &self,
        tenant: &str,
        credentials: &LoginCredentials,
        origin: &RequestOrigin,
    ) -> DomainResult<TokenContainer> {
        credentials.validate()?;

        let username = match credentials.username.as_deref().filter(|u| !u.is_empty()) {
            Some(username) => username.to_string(),
            None => self.username_of(tenant, credentials.user_id().unwrap_or_default()).await?,
        };

        let grant = TokenGrant::Password {
            username: username.clone(),
            password: credentials.password.clone(),
        };
        let tokens = self.exchange(tenant, &grant, origin).await?;

        info!(username = %username, "User logged in");
        Ok(tokens)
    }

    /// Authorization code exchange.
    #[instrument(skip(self, code, origin), fields(tenant = %tenant))]
    pub async fn token(
        &self,
        tenant: &str,
        code: &str,
        redirect_uri: &str,
        origin: &RequestOrigin,
    ) -> DomainResult<TokenContainer> {
        if code.trim().is_empty() {
            return Err(DomainError::validation("code", "Code cannot be empty"));
        }
        if redirect_uri.trim().is_empty() {
            return Err(DomainError::validation(
                "redirect-uri",
                "Redirect uri cannot be empty",
            ));
        }

        let grant = TokenGrant::AuthorizationCode {
            code: code.to_string(),
            redirect_uri: redirect_uri.to_string(),
        };
        self.exchange(tenant, &grant, origin).await
    }

    #[instrument(skip(self, refresh_token), fields(tenant = %tenant))]
    pub async fn refresh_token(
        &self,
        tenant: &str,
        refresh_token: &str,
    ) -> DomainResult<TokenContainer> {
        let grant = TokenGrant::RefreshToken {
            refresh_token: refresh_token.to_string(),
        };

        self.exchange(tenant, &grant, &RequestOrigin::default())
            .await
            .map_err(|e| {
                warn!(error = %e, "Token refresh failed");
                DomainError::TokenRefreshFailed {
                    reason: TOKEN_REFRESH_UNPROCESSABLE.to_string(),
                }
            })
    }

    /// Ends the session of `refresh_token`, or every session of `user_id`
    /// when no refresh token is available.
    #[instrument(skip(self, refresh_token), fields(tenant = %tenant))]
    pub async fn logout(
        &self,
        tenant: &str,
        refresh_token: Option<&str>,
        user_id: Option<&str>,
    ) -> DomainResult<()> {
        let refresh_token = match refresh_token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => return self.logout_all(tenant, user_id).await,
        };

        let client = self.realm_config.realm_client(tenant)?;
        self.token_endpoint
            .logout(tenant, &client, refresh_token)
            .await
            .map_err(|e| {
                warn!(error = %e, "Logout failed");
                logout_failed()
            })?;

        let session_id = token_parser::parse_session_id(refresh_token).unwrap_or_else(|e| {
            debug!(error = %e, "Refresh token carries no readable session id");
            None
        });
        info!(session_id = ?session_id, "User session ended");

        self.publish(LogoutEvent::logout(
            tenant,
            user_id.map(str::to_string),
            session_id,
        ))
        .await;
        Ok(())
    }

    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn logout_all(&self, tenant: &str, user_id: Option<&str>) -> DomainResult<()> {
        let user_id = user_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| DomainError::validation("userId", "User id is not found"))?;

        debug!(user_id, "Logging out all user sessions");
        let principal = user_lookup::find_by_user_id(self.repository.as_ref(), tenant, user_id)
            .await
            .map_err(|e| {
                warn!(error = %e, "Cannot resolve user for logout");
                logout_failed()
            })?;

        self.repository
            .logout_all_sessions(tenant, &principal.id)
            .await
            .map_err(|e| {
                warn!(error = %e, "Logout of all sessions failed");
                logout_failed()
            })?;

        info!(user_id, keycloak_user_id = %principal.id, "All user sessions ended");
        self.publish(LogoutEvent::logout_all(tenant, user_id, principal.id))
            .await;
        Ok(())
    }

    async fn username_of(&self, tenant: &str, user_id: &str) -> DomainResult<String> {
        let principal =
            user_lookup::find_by_user_id(self.repository.as_ref(), tenant, user_id).await?;
        principal.username.ok_or_else(|| {
            DomainError::validation("username", "Linked Keycloak user has no username")
        })
    }

    async fn exchange(
        &self,
        tenant: &str,
        grant: &TokenGrant,
        origin: &RequestOrigin,
    ) -> DomainResult<TokenContainer> {
        let client = self.realm_config.realm_client(tenant)?;
        let authentication = self
            .token_endpoint
            .exchange(tenant, &client, grant, origin)
            .await?;
        build_token_container(&authentication)
    }

    async fn publish(&self, event: LogoutEvent) {
        if let Err(e) = self.event_publisher.publish(event).await {
            warn!("Failed to publish logout event: {}", e);
        }
    }
}

fn logout_failed() -> DomainError {
    DomainError::TokenLogoutFailed {
        reason: TOKEN_LOGOUT_UNPROCESSABLE.to_string(),
    }
}

/// Pairs both tokens of a token endpoint response with their decoded expiry.
pub fn build_token_container(
    authentication: &KeycloakAuthentication,
) -> DomainResult<TokenContainer> {
    let access_token = Token {
        jwt: authentication.access_token.clone(),
        expiration_date: token_parser::parse_expiration(&authentication.access_token)?,
        expires_in: authentication.expires_in,
    };
    let refresh_token = Token {
        jwt: authentication.refresh_token.clone(),
        expiration_date: token_parser::parse_expiration(&authentication.refresh_token)?,
        expires_in: authentication.refresh_expires_in,
    };

    Ok(TokenContainer {
        access_token,
        refresh_token,
    })
}
