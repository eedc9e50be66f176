#![allow(dead_code)]

use async_trait::async_trait;
use keycloak_login_domain::{
    application::ports::{
        auth::{RealmClient, RequestOrigin, TokenEndpoint, TokenGrant},
        events::{EventError, EventPublisher, LogoutEvent},
        repository::{EventRepository, KeycloakRepository},
    },
    domain::{
        entities::*,
        errors::{AuthError, DomainError, DomainResult},
    },
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn mock_failure() -> DomainError {
    DomainError::ExternalService {
        service: "mock-keycloak".to_string(),
        message: "Mock failure enabled".to_string(),
    }
}

fn page<T: Clone>(items: &[T], first: usize, max: usize) -> Vec<T> {
    items.iter().skip(first).take(max).cloned().collect()
}

/// Mock repository implementation for testing
#[derive(Default)]
pub struct MockKeycloakRepository {
    pub users: Arc<Mutex<HashMap<String, Vec<Principal>>>>, // realm -> users
    pub credentials: Arc<Mutex<HashMap<String, Vec<Credential>>>>, // keycloak user id -> credentials
    pub brute_force: Arc<Mutex<HashMap<String, BruteForceStatus>>>,
    pub logged_out: Arc<Mutex<Vec<String>>>,
    pub list_calls: Arc<Mutex<Vec<(usize, usize)>>>,
    pub should_fail: Arc<Mutex<bool>>, // For testing error scenarios
}

impl MockKeycloakRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(realm: &str, users: Vec<Principal>) -> Self {
        let repository = Self::new();
        repository
            .users
            .lock()
            .unwrap()
            .insert(realm.to_string(), users);
        repository
    }

    pub fn add_credential(&self, keycloak_user_id: &str, credential: Credential) {
        self.credentials
            .lock()
            .unwrap()
            .entry(keycloak_user_id.to_string())
            .or_default()
            .push(credential);
    }

    pub fn credentials_of(&self, keycloak_user_id: &str) -> Vec<Credential> {
        self.credentials
            .lock()
            .unwrap()
            .get(keycloak_user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    fn check_should_fail(&self) -> DomainResult<()> {
        if *self.should_fail.lock().unwrap() {
            Err(mock_failure())
        } else {
            Ok(())
        }
    }

    fn realm_users(&self, realm: &str) -> Vec<Principal> {
        self.users
            .lock()
            .unwrap()
            .get(realm)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl KeycloakRepository for MockKeycloakRepository {
    async fn count_users(&self, realm: &str) -> DomainResult<usize> {
        self.check_should_fail()?;
        Ok(self.realm_users(realm).len())
    }

    async fn list_users(
        &self,
        realm: &str,
        first: usize,
        max: usize,
    ) -> DomainResult<Vec<Principal>> {
        self.check_should_fail()?;
        self.list_calls.lock().unwrap().push((first, max));
        Ok(page(&self.realm_users(realm), first, max))
    }

    async fn find_users_by_attribute(
        &self,
        realm: &str,
        key: &str,
        value: &str,
    ) -> DomainResult<Vec<Principal>> {
        self.check_should_fail()?;
        Ok(self
            .realm_users(realm)
            .into_iter()
            .filter(|user| {
                user.attributes
                    .get_attribute(key)
                    .is_some_and(|values| values.iter().any(|v| v == value))
            })
            .collect())
    }

    async fn find_users_by_username(
        &self,
        realm: &str,
        username: &str,
    ) -> DomainResult<Vec<Principal>> {
        self.check_should_fail()?;
        Ok(self
            .realm_users(realm)
            .into_iter()
            .filter(|user| user.username.as_deref() == Some(username))
            .collect())
    }

    async fn get_user_credentials(
        &self,
        _realm: &str,
        user_id: &str,
    ) -> DomainResult<Vec<Credential>> {
        self.check_should_fail()?;
        Ok(self.credentials_of(user_id))
    }

    async fn reset_password(
        &self,
        _realm: &str,
        user_id: &str,
        credential: &Credential,
    ) -> DomainResult<()> {
        self.check_should_fail()?;
        let mut stored = credential.clone();
        stored.id = Some(format!("cred-{user_id}"));
        stored.value = None;

        let mut credentials = self.credentials.lock().unwrap();
        let entry = credentials.entry(user_id.to_string()).or_default();
        entry.retain(|c| !c.is_password());
        entry.push(stored);
        Ok(())
    }

    async fn delete_user_credential(
        &self,
        _realm: &str,
        user_id: &str,
        credential_id: &str,
    ) -> DomainResult<()> {
        self.check_should_fail()?;
        if let Some(entry) = self.credentials.lock().unwrap().get_mut(user_id) {
            entry.retain(|c| c.id.as_deref() != Some(credential_id));
        }
        Ok(())
    }

    async fn logout_all_sessions(&self, _realm: &str, user_id: &str) -> DomainResult<()> {
        self.check_should_fail()?;
        self.logged_out.lock().unwrap().push(user_id.to_string());
        Ok(())
    }

    async fn brute_force_status(
        &self,
        _realm: &str,
        user_id: &str,
    ) -> DomainResult<BruteForceStatus> {
        self.check_should_fail()?;
        Ok(self
            .brute_force
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Mock event store serving newest-first pages
#[derive(Default)]
pub struct MockEventRepository {
    pub user_events: Arc<Mutex<Vec<UserEventRecord>>>,
    pub admin_events: Arc<Mutex<Vec<AdminEventRecord>>>,
    pub user_event_calls: Arc<Mutex<Vec<(Vec<String>, usize, usize)>>>,
    pub admin_event_calls: Arc<Mutex<Vec<(Vec<String>, usize, usize)>>>,
    pub fail_user_events: Arc<Mutex<bool>>,
    pub fail_admin_events: Arc<Mutex<bool>>,
}

impl MockEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(user_events: Vec<UserEventRecord>, admin_events: Vec<AdminEventRecord>) -> Self {
        let repository = Self::new();
        *repository.user_events.lock().unwrap() = user_events;
        *repository.admin_events.lock().unwrap() = admin_events;
        repository
    }

    pub fn set_fail_user_events(&self, fail: bool) {
        *self.fail_user_events.lock().unwrap() = fail;
    }

    pub fn set_fail_admin_events(&self, fail: bool) {
        *self.fail_admin_events.lock().unwrap() = fail;
    }
}

#[async_trait]
impl EventRepository for MockEventRepository {
    async fn list_user_events(
        &self,
        _realm: &str,
        types: &[&str],
        first: usize,
        max: usize,
    ) -> DomainResult<Vec<UserEventRecord>> {
        if *self.fail_user_events.lock().unwrap() {
            return Err(mock_failure());
        }
        let types = types.iter().map(|t| t.to_string()).collect();
        self.user_event_calls.lock().unwrap().push((types, first, max));
        Ok(page(self.user_events.lock().unwrap().as_slice(), first, max))
    }

    async fn list_admin_events(
        &self,
        _realm: &str,
        operation_types: &[&str],
        first: usize,
        max: usize,
    ) -> DomainResult<Vec<AdminEventRecord>> {
        if *self.fail_admin_events.lock().unwrap() {
            return Err(mock_failure());
        }
        let types = operation_types.iter().map(|t| t.to_string()).collect();
        self.admin_event_calls.lock().unwrap().push((types, first, max));
        Ok(page(self.admin_events.lock().unwrap().as_slice(), first, max))
    }
}

/// Mock token endpoint returning a fixed authentication
pub struct MockTokenEndpoint {
    pub authentication: KeycloakAuthentication,
    pub exchanges: Arc<Mutex<Vec<(String, RealmClient, TokenGrant, RequestOrigin)>>>,
    pub logouts: Arc<Mutex<Vec<String>>>,
    pub should_fail: Arc<Mutex<bool>>,
}

impl MockTokenEndpoint {
    pub fn new(authentication: KeycloakAuthentication) -> Self {
        Self {
            authentication,
            exchanges: Arc::new(Mutex::new(Vec::new())),
            logouts: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }
}

#[async_trait]
impl TokenEndpoint for MockTokenEndpoint {
    async fn exchange(
        &self,
        realm: &str,
        client: &RealmClient,
        grant: &TokenGrant,
        origin: &RequestOrigin,
    ) -> Result<KeycloakAuthentication, AuthError> {
        if *self.should_fail.lock().unwrap() {
            return Err(AuthError::TokenAcquisitionFailed {
                reason: "HTTP error 401 Unauthorized".to_string(),
            });
        }
        self.exchanges.lock().unwrap().push((
            realm.to_string(),
            client.clone(),
            grant.clone(),
            origin.clone(),
        ));
        Ok(self.authentication.clone())
    }

    async fn logout(
        &self,
        _realm: &str,
        _client: &RealmClient,
        refresh_token: &str,
    ) -> Result<(), AuthError> {
        if *self.should_fail.lock().unwrap() {
            return Err(AuthError::TokenRevocationFailed {
                reason: "HTTP error 400 Bad Request".to_string(),
            });
        }
        self.logouts.lock().unwrap().push(refresh_token.to_string());
        Ok(())
    }
}

/// Mock event publisher for testing
#[derive(Default)]
pub struct MockEventPublisher {
    pub published_events: Arc<Mutex<Vec<LogoutEvent>>>,
    pub should_fail: Arc<Mutex<bool>>,
}

impl MockEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_published_events(&self) -> Vec<LogoutEvent> {
        self.published_events.lock().unwrap().clone()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }
}

#[async_trait]
impl EventPublisher for MockEventPublisher {
    async fn publish(&self, event: LogoutEvent) -> Result<(), EventError> {
        if *self.should_fail.lock().unwrap() {
            return Err(EventError::PublishFailed {
                message: "Mock failure".to_string(),
            });
        }
        self.published_events.lock().unwrap().push(event);
        Ok(())
    }
}

// Event builders

pub fn user_event(event_type: &str, user_id: &str, time: i64) -> UserEventRecord {
    UserEventRecord {
        time: Some(time),
        type_: Some(event_type.to_string()),
        user_id: Some(user_id.to_string()),
        ip_address: Some("10.0.0.1".to_string()),
        ..Default::default()
    }
}

pub fn reset_password_event(keycloak_user_id: &str, time: i64) -> AdminEventRecord {
    AdminEventRecord {
        time: Some(time),
        operation_type: Some("ACTION".to_string()),
        resource_type: Some("USER".to_string()),
        resource_path: Some(format!("users/{keycloak_user_id}/reset-password")),
        auth_details: Some(AuthDetails {
            ip_address: Some("192.168.1.1".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}
