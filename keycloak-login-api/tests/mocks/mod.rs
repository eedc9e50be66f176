#![allow(dead_code)]

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use keycloak_login_api::AppState;
use keycloak_login_domain::{
    application::ports::{
        EventError, EventPublisher, EventRepository, KeycloakRepository, LogoutEvent,
        RealmClient, RequestOrigin, TokenEndpoint, TokenGrant,
    },
    domain::{
        entities::*,
        errors::{AuthError, DomainResult},
    },
    infrastructure::adapters::{ConfiguredRealmClients, InMemoryPasswordActionRepository},
    AuthenticationService, CookieConfig, CredentialsService, LogEventsService,
    LoginAttemptsService, PasswordService, SameSitePolicy,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const TENANT: &str = "diku";
pub const KEYCLOAK_ID: &str = "3f1b6c2a-7d4e-4a9b-8c1d-2e3f4a5b6c7d";
pub const USER_ID: &str = "user-1";

pub fn jwt(payload: &str) -> String {
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256"}"#),
        URL_SAFE_NO_PAD.encode(payload)
    )
}

/// Single-realm Keycloak stand-in with one linked user and a fixed event history
#[derive(Default)]
pub struct FakeKeycloak {
    pub credentials: Mutex<Vec<Credential>>,
    pub user_events: Vec<UserEventRecord>,
    pub admin_events: Vec<AdminEventRecord>,
    pub logged_out: Mutex<Vec<String>>,
}

impl FakeKeycloak {
    fn principal() -> Principal {
        Principal::new(KEYCLOAK_ID)
            .with_username("jdoe")
            .with_external_id(USER_ID)
    }
}

fn page<T: Clone>(items: &[T], first: usize, max: usize) -> Vec<T> {
    items.iter().skip(first).take(max).cloned().collect()
}

#[async_trait]
impl KeycloakRepository for FakeKeycloak {
    async fn count_users(&self, _realm: &str) -> DomainResult<usize> {
        Ok(1)
    }

    async fn list_users(&self, _realm: &str, first: usize, max: usize) -> DomainResult<Vec<Principal>> {
        Ok(page(&[Self::principal()], first, max))
    }

    async fn find_users_by_attribute(
        &self,
        _realm: &str,
        _key: &str,
        value: &str,
    ) -> DomainResult<Vec<Principal>> {
        Ok(if value == USER_ID {
            vec![Self::principal()]
        } else {
            Vec::new()
        })
    }

    async fn find_users_by_username(&self, _realm: &str, username: &str) -> DomainResult<Vec<Principal>> {
        Ok(if username == "jdoe" {
            vec![Self::principal()]
        } else {
            Vec::new()
        })
    }

    async fn get_user_credentials(&self, _realm: &str, _user_id: &str) -> DomainResult<Vec<Credential>> {
        Ok(self.credentials.lock().unwrap().clone())
    }

    async fn reset_password(
        &self,
        _realm: &str,
        _user_id: &str,
        credential: &Credential,
    ) -> DomainResult<()> {
        let mut stored = credential.clone();
        stored.id = Some("cred-1".to_string());
        *self.credentials.lock().unwrap() = vec![stored];
        Ok(())
    }

    async fn delete_user_credential(
        &self,
        _realm: &str,
        _user_id: &str,
        credential_id: &str,
    ) -> DomainResult<()> {
        self.credentials
            .lock()
            .unwrap()
            .retain(|c| c.id.as_deref() != Some(credential_id));
        Ok(())
    }

    async fn logout_all_sessions(&self, _realm: &str, user_id: &str) -> DomainResult<()> {
        self.logged_out.lock().unwrap().push(user_id.to_string());
        Ok(())
    }

    async fn brute_force_status(&self, _realm: &str, _user_id: &str) -> DomainResult<BruteForceStatus> {
        Ok(BruteForceStatus {
            num_failures: 2,
            last_failure: 1_700_000_000_000,
            ..Default::default()
        })
    }
}

#[async_trait]
impl EventRepository for FakeKeycloak {
    async fn list_user_events(
        &self,
        _realm: &str,
        _types: &[&str],
        first: usize,
        max: usize,
    ) -> DomainResult<Vec<UserEventRecord>> {
        Ok(page(&self.user_events, first, max))
    }

    async fn list_admin_events(
        &self,
        _realm: &str,
        _operation_types: &[&str],
        first: usize,
        max: usize,
    ) -> DomainResult<Vec<AdminEventRecord>> {
        Ok(page(&self.admin_events, first, max))
    }
}

/// Token endpoint issuing the same token pair for every grant
#[derive(Default)]
pub struct FakeTokenEndpoint {
    pub logouts: Mutex<Vec<String>>,
}

#[async_trait]
impl TokenEndpoint for FakeTokenEndpoint {
    async fn exchange(
        &self,
        _realm: &str,
        _client: &RealmClient,
        grant: &TokenGrant,
        _origin: &RequestOrigin,
    ) -> Result<KeycloakAuthentication, AuthError> {
        if let TokenGrant::Password { password, .. } = grant {
            if password != "secret" {
                return Err(AuthError::InvalidCredentials);
            }
        }
        Ok(KeycloakAuthentication {
            access_token: jwt(r#"{"exp":1700000300}"#),
            expires_in: 300,
            refresh_token: jwt(r#"{"exp":1700001800,"sid":"s-1"}"#),
            refresh_expires_in: 1800,
            token_type: Some("Bearer".to_string()),
            session_state: None,
            scope: None,
        })
    }

    async fn logout(
        &self,
        _realm: &str,
        _client: &RealmClient,
        refresh_token: &str,
    ) -> Result<(), AuthError> {
        self.logouts.lock().unwrap().push(refresh_token.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, _event: LogoutEvent) -> Result<(), EventError> {
        Ok(())
    }
}

pub struct TestApp {
    pub state: AppState,
    pub keycloak: Arc<FakeKeycloak>,
    pub tokens: Arc<FakeTokenEndpoint>,
}

pub fn test_app(keycloak: FakeKeycloak, token_header_enabled: bool) -> TestApp {
    let keycloak = Arc::new(keycloak);
    let tokens = Arc::new(FakeTokenEndpoint::default());
    let clients = Arc::new(ConfiguredRealmClients::new(
        "-login-application",
        HashMap::from([(TENANT.to_string(), "s3cret".to_string())]),
    ));

    let state = AppState {
        cookies: CookieConfig {
            same_site: SameSitePolicy::Lax,
            token_header_enabled,
        },
        log_events: Arc::new(LogEventsService::new(keycloak.clone(), keycloak.clone())),
        auth_service: Arc::new(AuthenticationService::new(
            tokens.clone(),
            clients,
            keycloak.clone(),
            Arc::new(NoopPublisher),
        )),
        credentials_service: Arc::new(CredentialsService::new(keycloak.clone())),
        login_attempts_service: Arc::new(LoginAttemptsService::new(keycloak.clone())),
        password_service: Arc::new(PasswordService::new(
            keycloak.clone(),
            Arc::new(InMemoryPasswordActionRepository::new()),
        )),
    };

    TestApp {
        state,
        keycloak,
        tokens,
    }
}
