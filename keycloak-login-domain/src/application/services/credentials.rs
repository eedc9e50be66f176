use crate::{
    application::{ports::KeycloakRepository, services::user_lookup},
    domain::{
        entities::*,
        errors::{DomainError, DomainResult},
    },
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Password credential management for platform users
pub struct CredentialsService {
    repository: Arc<dyn KeycloakRepository>,
}

impl CredentialsService {
    pub fn new(repository: Arc<dyn KeycloakRepository>) -> Self {
        Self { repository }
    }

    /// Sets the first password of a user that has no credentials yet.
    #[instrument(skip(self, credentials), fields(tenant = %tenant))]
    pub async fn create_credentials(
        &self,
        tenant: &str,
        credentials: &LoginCredentials,
    ) -> DomainResult<()> {
        credentials.validate()?;
        let repository = self.repository.as_ref();

        let principal = match credentials.user_id() {
            Some(user_id) => user_lookup::find_by_user_id(repository, tenant, user_id).await?,
            None => {
                let username = credentials.username.as_deref().unwrap_or_default();
                user_lookup::find_by_username(repository, tenant, username).await?
            }
        };

        let existing = repository.get_user_credentials(tenant, &principal.id).await?;
        if !existing.is_empty() {
            return Err(DomainError::CredentialsAlreadyExist {
                username: credentials
                    .username
                    .clone()
                    .or(principal.username)
                    .unwrap_or_default(),
            });
        }

        let password = Credential::password(credentials.password.clone(), false);
        repository
            .reset_password(tenant, &principal.id, &password)
            .await?;

        info!(keycloak_user_id = %principal.id, "Created credentials");
        Ok(())
    }

    /// Removes the password credential of a user.
    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn delete_credentials(&self, tenant: &str, user_id: &str) -> DomainResult<()> {
        let repository = self.repository.as_ref();
        let principal = user_lookup::find_by_user_id(repository, tenant, user_id).await?;

        let credential_id = repository
            .get_user_credentials(tenant, &principal.id)
            .await?
            .into_iter()
            .find(Credential::is_password)
            .and_then(|credential| credential.id)
            .ok_or_else(|| DomainError::CredentialsNotFound {
                user_id: user_id.to_string(),
            })?;

        repository
            .delete_user_credential(tenant, &principal.id, &credential_id)
            .await?;

        info!(user_id, "Deleted credentials");
        Ok(())
    }

    /// Replaces the password of a user. The current password is not checked.
    #[instrument(skip(self, update), fields(tenant = %tenant, user_id = %update.user_id))]
    pub async fn update_credentials(
        &self,
        tenant: &str,
        update: &UpdateCredentials,
    ) -> DomainResult<()> {
        update.validate()?;
        let repository = self.repository.as_ref();
        let principal = user_lookup::find_by_user_id(repository, tenant, &update.user_id).await?;

        let password = Credential::password(update.new_password.clone(), false);
        repository
            .reset_password(tenant, &principal.id, &password)
            .await?;

        info!("Updated credentials");
        Ok(())
    }

    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn credentials_exist(
        &self,
        tenant: &str,
        user_id: &str,
    ) -> DomainResult<CredentialsExistence> {
        let repository = self.repository.as_ref();
        let principal = user_lookup::find_by_user_id(repository, tenant, user_id).await?;
        let credentials = repository.get_user_credentials(tenant, &principal.id).await?;

        Ok(CredentialsExistence {
            credentials_exist: !credentials.is_empty(),
        })
    }
}
