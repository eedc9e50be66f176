use keycloak_login_domain::{
    infrastructure::adapters::EnvConfigurationAdapter, DomainError, DomainResult,
};
use std::env;

const DEFAULT_PORT: u16 = 8081;

/// Server configuration: the domain configuration plus the listening port
pub struct Config {
    pub settings: EnvConfigurationAdapter,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> DomainResult<Self> {
        let settings = EnvConfigurationAdapter::new()?;
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| DomainError::Configuration {
                message: format!("Invalid PORT: {raw}"),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self { settings, port })
    }
}
