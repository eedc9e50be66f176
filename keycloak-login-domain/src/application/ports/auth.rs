use crate::domain::entities::KeycloakAuthentication;
use crate::domain::errors::{AuthError, DomainResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Admin API access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub token_type: String,
}

impl AuthToken {
    pub fn new(
        access_token: String,
        expires_in: i64,
        refresh_token: Option<String>,
        token_type: Option<String>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: Utc::now() + chrono::Duration::seconds(expires_in),
            token_type: token_type.unwrap_or_else(|| "Bearer".to_string()),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    pub fn is_expiring_soon(&self, seconds: i64) -> bool {
        Utc::now() + chrono::Duration::seconds(seconds) >= self.expires_at
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Admin credentials for the master (or admin) realm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
    pub realm: String,
    pub client_id: String,
    pub grant_type: String,
}

impl AdminCredentials {
    pub fn new(username: String, password: String, realm: String, client_id: String) -> Self {
        Self {
            username,
            password,
            realm,
            client_id,
            grant_type: "password".to_string(),
        }
    }
}

/// Confidential client used to log users into a tenant realm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealmClient {
    pub client_id: String,
    pub client_secret: String,
}

/// Caller details forwarded to the token endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOrigin {
    pub user_agent: Option<String>,
    pub forwarded_for: Option<String>,
}

impl RequestOrigin {
    pub fn new(user_agent: Option<String>, forwarded_for: Option<String>) -> Self {
        Self {
            user_agent,
            forwarded_for,
        }
    }
}

/// OpenID Connect grant sent to a realm token endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenGrant {
    Password { username: String, password: String },
    AuthorizationCode { code: String, redirect_uri: String },
    RefreshToken { refresh_token: String },
}

impl TokenGrant {
    pub fn grant_type(&self) -> &'static str {
        match self {
            TokenGrant::Password { .. } => "password",
            TokenGrant::AuthorizationCode { .. } => "authorization_code",
            TokenGrant::RefreshToken { .. } => "refresh_token",
        }
    }

    /// Form parameters for the grant, client authentication included.
    pub fn form(&self, client: &RealmClient) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("grant_type", self.grant_type().to_string()),
            ("client_id", client.client_id.clone()),
            ("client_secret", client.client_secret.clone()),
        ];
        match self {
            TokenGrant::Password { username, password } => {
                form.push(("username", username.clone()));
                form.push(("password", password.clone()));
            }
            TokenGrant::AuthorizationCode { code, redirect_uri } => {
                form.push(("code", code.clone()));
                form.push(("redirect_uri", redirect_uri.clone()));
            }
            TokenGrant::RefreshToken { refresh_token } => {
                form.push(("refresh_token", refresh_token.clone()));
            }
        }
        form
    }
}

/// Admin token acquisition port
#[async_trait]
pub trait TokenManager: Send + Sync {
    /// Acquire a new token using credentials
    async fn acquire_token(&self, credentials: &AdminCredentials) -> Result<AuthToken, AuthError>;
}

/// Supplies a valid admin token, acquiring a new one when needed
#[async_trait]
pub trait AdminTokenProvider: Send + Sync {
    async fn admin_token(&self) -> Result<AuthToken, AuthError>;
}

/// Realm token endpoint port used for end-user login
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    async fn exchange(
        &self,
        realm: &str,
        client: &RealmClient,
        grant: &TokenGrant,
        origin: &RequestOrigin,
    ) -> Result<KeycloakAuthentication, AuthError>;

    /// Ends the session bound to `refresh_token`.
    async fn logout(
        &self,
        realm: &str,
        client: &RealmClient,
        refresh_token: &str,
    ) -> Result<(), AuthError>;
}

/// Resolves the login client of a tenant realm
pub trait RealmConfigurationProvider: Send + Sync {
    fn realm_client(&self, tenant: &str) -> DomainResult<RealmClient>;
}
