use crate::application::ports::{LoginConfig, RealmClient, RealmConfigurationProvider};
use crate::domain::errors::{DomainError, DomainResult};
use std::collections::HashMap;

/// Login clients derived from configuration: `<tenant><suffix>` with a
/// per-tenant secret.
pub struct ConfiguredRealmClients {
    client_suffix: String,
    secrets: HashMap<String, String>,
}

impl ConfiguredRealmClients {
    pub fn new(client_suffix: impl Into<String>, secrets: HashMap<String, String>) -> Self {
        Self {
            client_suffix: client_suffix.into(),
            secrets,
        }
    }

    pub fn from_config(config: &LoginConfig) -> Self {
        Self::new(config.client_suffix.clone(), config.client_secrets.clone())
    }
}

impl RealmConfigurationProvider for ConfiguredRealmClients {
    fn realm_client(&self, tenant: &str) -> DomainResult<RealmClient> {
        let client_id = format!("{tenant}{}", self.client_suffix);
        let client_secret = self
            .secrets
            .get(tenant)
            .cloned()
            .ok_or_else(|| DomainError::Configuration {
                message: format!("Failed to get value from secure store [clientId: {client_id}]"),
            })?;

        Ok(RealmClient {
            client_id,
            client_secret,
        })
    }
}
