use crate::domain::errors::{ConfigError, DomainResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

/// Read access to the loaded settings
pub trait ConfigurationPort: Send + Sync {
    fn get_keycloak_config(&self) -> &KeycloakConfig;
    fn get_auth_config(&self) -> &AuthConfig;
    fn get_http_config(&self) -> &HttpConfig;
    fn get_logging_config(&self) -> &LoggingConfig;
    fn get_login_config(&self) -> &LoginConfig;
    fn get_cookie_config(&self) -> &CookieConfig;

    fn validate(&self) -> DomainResult<()>;

    fn is_development(&self) -> bool;
}

/// Keycloak base URL and the admin account used for REST calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeycloakConfig {
    pub url: String,
    pub admin_realm: String,
    pub admin_client_id: String,
    pub admin_username: String,
    pub admin_password: String,
}

impl KeycloakConfig {
    pub fn validate(&self) -> DomainResult<()> {
        if self.url.is_empty() {
            return Err(missing("KEYCLOAK_URL"));
        }

        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "KEYCLOAK_URL".to_string(),
                message: format!("not an http(s) URL: {}", self.url),
            }
            .into());
        }

        for (key, value) in [
            ("KEYCLOAK_ADMIN_USERNAME", &self.admin_username),
            ("KEYCLOAK_ADMIN_PASSWORD", &self.admin_password),
            ("KEYCLOAK_ADMIN_REALM", &self.admin_realm),
            ("KEYCLOAK_ADMIN_CLIENT_ID", &self.admin_client_id),
        ] {
            if value.is_empty() {
                return Err(missing(key));
            }
        }

        Ok(())
    }

    fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Admin REST root of a realm.
    pub fn get_realm_url(&self, realm: &str) -> String {
        format!("{}/admin/realms/{}", self.base_url(), realm)
    }

    /// OpenID Connect token endpoint of a realm.
    pub fn get_token_url(&self, realm: &str) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url(),
            realm
        )
    }

    pub fn get_logout_url(&self, realm: &str) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/logout",
            self.base_url(),
            realm
        )
    }

    pub fn get_auth_url(&self) -> String {
        self.get_token_url(&self.admin_realm)
    }
}

/// Admin token handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub token_refresh_threshold_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_refresh_threshold_seconds: 60,
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> DomainResult<()> {
        non_zero("AUTH_TOKEN_REFRESH_THRESHOLD_SECONDS", self.token_refresh_threshold_seconds)
    }

    pub fn get_refresh_threshold(&self) -> Duration {
        Duration::from_secs(self.token_refresh_threshold_seconds)
    }
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            connect_timeout_seconds: 10,
            user_agent: concat!("keycloak-login/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn validate(&self) -> DomainResult<()> {
        non_zero("HTTP_TIMEOUT_SECONDS", self.timeout_seconds)?;
        non_zero("HTTP_CONNECT_TIMEOUT_SECONDS", self.connect_timeout_seconds)
    }

    pub fn get_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn get_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

/// Tenant login clients and audit feed tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginConfig {
    /// Appended to the tenant name to form the login client id
    pub client_suffix: String,
    /// Login client secret per tenant
    pub client_secrets: HashMap<String, String>,
    /// Page size used when reading users and events from Keycloak
    pub log_events_batch_size: usize,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            client_suffix: "-login-application".to_string(),
            client_secrets: HashMap::new(),
            log_events_batch_size: 100,
        }
    }
}

impl LoginConfig {
    pub fn validate(&self) -> DomainResult<()> {
        non_zero("LOG_EVENTS_BATCH_SIZE", self.log_events_batch_size as u64)
    }

    /// Parses `tenant=secret,tenant2=secret2`.
    pub fn parse_client_secrets(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                entry
                    .split_once('=')
                    .map(|(tenant, secret)| (tenant.trim().to_string(), secret.trim().to_string()))
                    .filter(|(tenant, _)| !tenant.is_empty())
                    .ok_or_else(|| ConfigError::InvalidValue {
                        key: "KEYCLOAK_CLIENT_SECRETS".to_string(),
                        message: format!("Expected tenant=secret, got '{entry}'"),
                    })
            })
            .collect()
    }
}

/// `SameSite` attribute applied to token cookies
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SameSitePolicy {
    #[default]
    None,
    Lax,
    Strict,
}

impl FromStr for SameSitePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(SameSitePolicy::None),
            "lax" => Ok(SameSitePolicy::Lax),
            "strict" => Ok(SameSitePolicy::Strict),
            _ => Err(format!("Invalid SameSite policy: {s}")),
        }
    }
}

/// Response cookie and header options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CookieConfig {
    pub same_site: SameSitePolicy,
    /// Also return the access token in `x-okapi-token`
    pub token_header_enabled: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
        }
    }
}

/// Log level enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Staging,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Staging => "staging",
            Self::Production => "production",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub keycloak: KeycloakConfig,
    pub auth: AuthConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    pub login: LoginConfig,
    pub cookies: CookieConfig,
}

impl AppConfig {
    pub fn validate(&self) -> DomainResult<()> {
        self.keycloak.validate()?;
        self.auth.validate()?;
        self.http.validate()?;
        self.login.validate()?;
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup, applying defaults and validation.
    pub fn from_lookup<F>(lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| missing(key));

        let environment = parse_or(&lookup, "ENVIRONMENT", Environment::Development)?;

        let keycloak = KeycloakConfig {
            url: required("KEYCLOAK_URL")?,
            admin_realm: lookup("KEYCLOAK_ADMIN_REALM").unwrap_or_else(|| "master".to_string()),
            admin_client_id: lookup("KEYCLOAK_ADMIN_CLIENT_ID")
                .unwrap_or_else(|| "admin-cli".to_string()),
            admin_username: required("KEYCLOAK_ADMIN_USERNAME")?,
            admin_password: required("KEYCLOAK_ADMIN_PASSWORD")?,
        };

        let auth_defaults = AuthConfig::default();
        let auth = AuthConfig {
            token_refresh_threshold_seconds: parse_or(
                &lookup,
                "AUTH_TOKEN_REFRESH_THRESHOLD_SECONDS",
                auth_defaults.token_refresh_threshold_seconds,
            )?,
        };

        let http_defaults = HttpConfig::default();
        let http = HttpConfig {
            timeout_seconds: parse_or(&lookup, "HTTP_TIMEOUT_SECONDS", http_defaults.timeout_seconds)?,
            connect_timeout_seconds: parse_or(
                &lookup,
                "HTTP_CONNECT_TIMEOUT_SECONDS",
                http_defaults.connect_timeout_seconds,
            )?,
            user_agent: lookup("HTTP_USER_AGENT").unwrap_or(http_defaults.user_agent),
        };

        let logging = LoggingConfig {
            level: parse_or(&lookup, "LOG_LEVEL", LogLevel::Info)?,
            format: parse_or(&lookup, "LOG_FORMAT", LogFormat::Compact)?,
        };

        let login_defaults = LoginConfig::default();
        let login = LoginConfig {
            client_suffix: lookup("KEYCLOAK_CLIENT_SUFFIX").unwrap_or(login_defaults.client_suffix),
            client_secrets: match lookup("KEYCLOAK_CLIENT_SECRETS") {
                Some(raw) => LoginConfig::parse_client_secrets(&raw)?,
                None => HashMap::new(),
            },
            log_events_batch_size: parse_or(
                &lookup,
                "LOG_EVENTS_BATCH_SIZE",
                login_defaults.log_events_batch_size,
            )?,
        };

        let cookies = CookieConfig {
            same_site: parse_or(&lookup, "COOKIE_SAME_SITE", SameSitePolicy::None)?,
            token_header_enabled: parse_or(&lookup, "TOKEN_HEADER_ENABLED", false)?,
        };

        let config = AppConfig {
            environment,
            keycloak,
            auth,
            http,
            logging,
            login,
            cookies,
        };

        config.validate()?;
        Ok(config)
    }
}

fn missing(key: &str) -> crate::domain::errors::DomainError {
    ConfigError::MissingRequired {
        key: key.to_string(),
    }
    .into()
}

fn non_zero(key: &str, value: u64) -> DomainResult<()> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "must be positive".to_string(),
        }
        .into());
    }
    Ok(())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {s}")),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {s}")),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {s}")),
        }
    }
}
