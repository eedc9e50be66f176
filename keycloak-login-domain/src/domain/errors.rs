use thiserror::Error;

/// Domain-specific errors for the login service
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Keycloak user doesn't exist with the given 'user_id' attribute: {user_id} in realm {realm}")]
    UserNotFound { user_id: String, realm: String },

    #[error("Keycloak user doesn't exist with the given 'username': {username} in realm {realm}")]
    UsernameNotFound { username: String, realm: String },

    #[error("Too many keycloak users with 'user_id' attribute: {user_id}")]
    AmbiguousUser { user_id: String },

    #[error("No credentials for userId {user_id} found")]
    CredentialsNotFound { user_id: String },

    #[error("There already exists credentials for a user: {username}")]
    CredentialsAlreadyExist { username: String },

    #[error("Password action with ID: {id} already exist for a user: {user_id}")]
    PasswordActionExists { id: String, user_id: String },

    #[error("Password action with ID: {id} was not found")]
    PasswordActionNotFound { id: String },

    #[error("Failed to obtain a token: {reason}")]
    TokenRequestFailed { reason: String },

    #[error("Failed to parse token: {reason}")]
    TokenParsing { reason: String },

    #[error("Authorization server unable to process token refresh request: {reason}")]
    TokenRefreshFailed { reason: String },

    #[error("Authorization server unable to process token logout request: {reason}")]
    TokenLogoutFailed { reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn keycloak(message: impl Into<String>) -> Self {
        DomainError::ExternalService {
            service: "Keycloak".to_string(),
            message: message.into(),
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Authentication-specific errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token acquisition failed: {reason}")]
    TokenAcquisitionFailed { reason: String },

    #[error("Token refresh failed: {reason}")]
    TokenRefreshFailed { reason: String },

    #[error("Token revocation failed: {reason}")]
    TokenRevocationFailed { reason: String },
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => DomainError::TokenRequestFailed {
                reason: "Invalid credentials".to_string(),
            },
            AuthError::TokenAcquisitionFailed { reason } => {
                DomainError::TokenRequestFailed { reason }
            }
            AuthError::TokenRefreshFailed { reason } => DomainError::TokenRefreshFailed { reason },
            AuthError::TokenRevocationFailed { reason } => DomainError::TokenLogoutFailed { reason },
        }
    }
}

/// Repository-specific errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Query failed: {query} - {message}")]
    QueryFailed { query: String, message: String },

    #[error("Serialization failed: {message}")]
    SerializationFailed { message: String },

    #[error("Unexpected status {status} from {query}: {body}")]
    UnexpectedStatus {
        query: String,
        status: u16,
        body: String,
    },
}

impl From<RepositoryError> for DomainError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ConnectionFailed { message } => DomainError::keycloak(message),
            RepositoryError::QueryFailed { query, message } => {
                DomainError::keycloak(format!("{query}: {message}"))
            }
            RepositoryError::SerializationFailed { message } => {
                DomainError::Serialization { message }
            }
            RepositoryError::UnexpectedStatus {
                query,
                status,
                body,
            } => DomainError::keycloak(format!("{query} returned {status}: {body}")),
        }
    }
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}")]
    MissingRequired { key: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl From<ConfigError> for DomainError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingRequired { key } => DomainError::Configuration {
                message: format!("Missing required configuration: {key}"),
            },
            ConfigError::InvalidValue { key, message } => DomainError::Configuration {
                message: format!("Invalid value for {key}: {message}"),
            },
        }
    }
}
