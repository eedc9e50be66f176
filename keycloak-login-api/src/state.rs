use keycloak_login_domain::{
    application::ports::{AdminCredentials, ConfigurationPort, CookieConfig},
    infrastructure::adapters::{
        http_client, CachedAdminTokenProvider, ConfiguredRealmClients, KeycloakRestAdapter,
        InMemoryPasswordActionRepository, KeycloakTokenManager, MemoryEventPublisher,
    },
    AuthenticationService, CredentialsService, DomainResult, LogEventsService,
    LoginAttemptsService, LogoutEvent, PasswordService,
};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

#[derive(Clone)]
pub struct AppState {
    pub cookies: CookieConfig,
    // Domain services
    pub log_events: Arc<LogEventsService>,
    pub auth_service: Arc<AuthenticationService>,
    pub credentials_service: Arc<CredentialsService>,
    pub login_attempts_service: Arc<LoginAttemptsService>,
    pub password_service: Arc<PasswordService>,
}

impl AppState {
    /// Wires the Keycloak adapters into the domain services.
    ///
    /// Logout events are drained by a background task that logs them.
    pub fn new(config: &dyn ConfigurationPort) -> DomainResult<Self> {
        let keycloak = config.get_keycloak_config();
        let login = config.get_login_config();
        let client = http_client(config.get_http_config())?;

        let token_manager = Arc::new(KeycloakTokenManager::new(keycloak.clone(), client.clone()));
        let admin_tokens = Arc::new(CachedAdminTokenProvider::new(
            token_manager.clone(),
            AdminCredentials::new(
                keycloak.admin_username.clone(),
                keycloak.admin_password.clone(),
                keycloak.admin_realm.clone(),
                keycloak.admin_client_id.clone(),
            ),
            config.get_auth_config().token_refresh_threshold_seconds,
        ));
        let repository = Arc::new(KeycloakRestAdapter::new(
            keycloak.clone(),
            client,
            admin_tokens,
        ));
        let realm_clients = Arc::new(ConfiguredRealmClients::from_config(login));

        let (event_publisher, events) = MemoryEventPublisher::new();
        tokio::spawn(log_logout_events(events));

        let log_events = LogEventsService::new(repository.clone(), repository.clone())
            .with_batch_size(login.log_events_batch_size);
        let auth_service = AuthenticationService::new(
            token_manager,
            realm_clients,
            repository.clone(),
            Arc::new(event_publisher),
        );

        info!(
            keycloak_url = %keycloak.url,
            batch_size = login.log_events_batch_size,
            "Application state initialized"
        );

        Ok(Self {
            cookies: config.get_cookie_config().clone(),
            log_events: Arc::new(log_events),
            auth_service: Arc::new(auth_service),
            credentials_service: Arc::new(CredentialsService::new(repository.clone())),
            login_attempts_service: Arc::new(LoginAttemptsService::new(repository.clone())),
            password_service: Arc::new(PasswordService::new(
                repository,
                Arc::new(InMemoryPasswordActionRepository::new()),
            )),
        })
    }
}

async fn log_logout_events(mut events: UnboundedReceiver<LogoutEvent>) {
    while let Some(event) = events.recv().await {
        debug!(
            tenant = %event.tenant,
            event_type = ?event.event_type,
            user_id = ?event.user_id,
            "Logout event published"
        );
    }
}
