use crate::{
    application::{
        ports::{KeycloakRepository, PasswordActionRepository},
        services::user_lookup,
    },
    domain::{
        entities::*,
        errors::{DomainError, DomainResult},
    },
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Two-step password set/reset: an action is created first and later redeemed
pub struct PasswordService {
    repository: Arc<dyn KeycloakRepository>,
    actions: Arc<dyn PasswordActionRepository>,
}

impl PasswordService {
    pub fn new(
        repository: Arc<dyn KeycloakRepository>,
        actions: Arc<dyn PasswordActionRepository>,
    ) -> Self {
        Self {
            repository,
            actions,
        }
    }

    /// Stores a new action for the user, replacing any action the user already had.
    #[instrument(skip(self, action), fields(tenant = %tenant, action_id = %action.id))]
    pub async fn create_reset_password_action(
        &self,
        tenant: &str,
        action: PasswordCreateAction,
    ) -> DomainResult<ResponseCreateAction> {
        action.validate()?;
        let password_exists = self.has_credentials(tenant, &action.user_id).await?;

        if let Some(existing) = self.actions.find_by_id(tenant, &action.id).await? {
            return Err(DomainError::PasswordActionExists {
                id: existing.id,
                user_id: existing.user_id,
            });
        }

        if let Some(previous) = self.actions.find_by_user_id(tenant, &action.user_id).await? {
            debug!(previous_id = %previous.id, "Replacing pending password action");
            self.actions.delete(tenant, &previous.id).await?;
        }
        self.actions.save(tenant, action).await?;

        info!(password_exists, "Created password action");
        Ok(ResponseCreateAction { password_exists })
    }

    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn get_password_action(
        &self,
        tenant: &str,
        action_id: &str,
    ) -> DomainResult<PasswordCreateAction> {
        self.actions
            .find_by_id(tenant, action_id)
            .await?
            .ok_or_else(|| DomainError::PasswordActionNotFound {
                id: action_id.to_string(),
            })
    }

    /// Sets the new password of the action's user and consumes the action.
    #[instrument(
        skip(self, reset),
        fields(tenant = %tenant, action_id = %reset.password_reset_action_id)
    )]
    pub async fn reset_password(
        &self,
        tenant: &str,
        reset: &PasswordResetAction,
    ) -> DomainResult<ResponseResetAction> {
        reset.validate()?;
        let action = self
            .get_password_action(tenant, &reset.password_reset_action_id)
            .await?;

        let password_existed = self.has_credentials(tenant, &action.user_id).await?;
        let principal =
            user_lookup::find_by_user_id(self.repository.as_ref(), tenant, &action.user_id).await?;
        let password = Credential::password(reset.new_password.clone(), false);
        self.repository
            .reset_password(tenant, &principal.id, &password)
            .await?;
        self.actions.delete(tenant, &action.id).await?;

        info!(user_id = %action.user_id, "Password reset through action");
        Ok(ResponseResetAction {
            is_new_password: !password_existed,
        })
    }

    /// Always `valid` for a well-formed check; Keycloak applies its password policy on reset.
    pub fn validate_repeatability(
        &self,
        check: &PasswordCheck,
    ) -> DomainResult<ValidPasswordResponse> {
        check.validate()?;
        Ok(ValidPasswordResponse::valid())
    }

    async fn has_credentials(&self, tenant: &str, user_id: &str) -> DomainResult<bool> {
        let repository = self.repository.as_ref();
        let principal = user_lookup::find_by_user_id(repository, tenant, user_id).await?;
        let credentials = repository.get_user_credentials(tenant, &principal.id).await?;
        Ok(!credentials.is_empty())
    }
}
