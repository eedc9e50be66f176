use crate::{
    application::{ports::KeycloakRepository, services::user_lookup},
    domain::{
        entities::LoginAttempts,
        errors::{DomainError, DomainResult},
    },
};
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use tracing::instrument;

/// Exposes Keycloak brute-force detection counters per platform user
pub struct LoginAttemptsService {
    repository: Arc<dyn KeycloakRepository>,
}

impl LoginAttemptsService {
    pub fn new(repository: Arc<dyn KeycloakRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn get_login_attempts(
        &self,
        tenant: &str,
        user_id: &str,
    ) -> DomainResult<LoginAttempts> {
        let principal =
            user_lookup::find_by_user_id(self.repository.as_ref(), tenant, user_id).await?;
        let status = self
            .repository
            .brute_force_status(tenant, &principal.id)
            .await?;

        let last_attempt = Utc
            .timestamp_millis_opt(status.last_failure)
            .single()
            .ok_or_else(|| DomainError::Serialization {
                message: format!("Invalid lastFailure value {}", status.last_failure),
            })?;

        Ok(LoginAttempts {
            user_id: user_id.to_string(),
            attempt_count: status.num_failures,
            last_attempt,
        })
    }
}
