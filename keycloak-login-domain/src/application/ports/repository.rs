use crate::domain::{entities::*, errors::DomainResult};
use async_trait::async_trait;

/// Repository port for Keycloak user administration
#[async_trait]
pub trait KeycloakRepository: Send + Sync {
    // Directory reads
    async fn count_users(&self, realm: &str) -> DomainResult<usize>;
    async fn list_users(&self, realm: &str, first: usize, max: usize)
        -> DomainResult<Vec<Principal>>;
    /// Exact match on a single attribute value (`q=key:value`).
    async fn find_users_by_attribute(
        &self,
        realm: &str,
        key: &str,
        value: &str,
    ) -> DomainResult<Vec<Principal>>;
    /// Exact match on username.
    async fn find_users_by_username(
        &self,
        realm: &str,
        username: &str,
    ) -> DomainResult<Vec<Principal>>;

    // Credentials
    async fn get_user_credentials(
        &self,
        realm: &str,
        user_id: &str,
    ) -> DomainResult<Vec<Credential>>;
    async fn reset_password(
        &self,
        realm: &str,
        user_id: &str,
        credential: &Credential,
    ) -> DomainResult<()>;
    async fn delete_user_credential(
        &self,
        realm: &str,
        user_id: &str,
        credential_id: &str,
    ) -> DomainResult<()>;

    // Sessions and attack detection
    async fn logout_all_sessions(&self, realm: &str, user_id: &str) -> DomainResult<()>;
    async fn brute_force_status(&self, realm: &str, user_id: &str)
        -> DomainResult<BruteForceStatus>;
}

/// Repository port for the Keycloak event stores
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// One page of user activity events restricted to `types`, newest first.
    async fn list_user_events(
        &self,
        realm: &str,
        types: &[&str],
        first: usize,
        max: usize,
    ) -> DomainResult<Vec<UserEventRecord>>;

    /// One page of admin events restricted to `operation_types`, newest first.
    async fn list_admin_events(
        &self,
        realm: &str,
        operation_types: &[&str],
        first: usize,
        max: usize,
    ) -> DomainResult<Vec<AdminEventRecord>>;
}

/// Storage port for pending password actions, partitioned by tenant
#[async_trait]
pub trait PasswordActionRepository: Send + Sync {
    async fn find_by_id(&self, tenant: &str, id: &str)
        -> DomainResult<Option<PasswordCreateAction>>;
    async fn find_by_user_id(
        &self,
        tenant: &str,
        user_id: &str,
    ) -> DomainResult<Option<PasswordCreateAction>>;
    async fn save(&self, tenant: &str, action: PasswordCreateAction) -> DomainResult<()>;
    async fn delete(&self, tenant: &str, id: &str) -> DomainResult<()>;
}
