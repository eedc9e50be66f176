use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use keycloak_login_domain::{
    application::ports::{
        auth::{RequestOrigin, TokenGrant},
        events::LogoutEventType,
    },
    domain::{
        entities::{KeycloakAuthentication, LoginCredentials, Principal},
        errors::DomainError,
    },
    infrastructure::adapters::ConfiguredRealmClients,
    AuthenticationService,
};
use std::collections::HashMap;
use std::sync::Arc;

mod mocks;
use mocks::{MockEventPublisher, MockKeycloakRepository, MockTokenEndpoint};

const TENANT: &str = "diku";

fn jwt(payload: &str) -> String {
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(payload)
    )
}

fn authentication() -> KeycloakAuthentication {
    KeycloakAuthentication {
        access_token: jwt(r#"{"exp":1700000300,"sub":"kc-1"}"#),
        expires_in: 300,
        refresh_token: jwt(r#"{"exp":1700001800,"sid":"session-1"}"#),
        refresh_expires_in: 1800,
        token_type: Some("Bearer".to_string()),
        session_state: Some("session-1".to_string()),
        scope: None,
    }
}

struct Fixture {
    service: AuthenticationService,
    endpoint: Arc<MockTokenEndpoint>,
    repository: Arc<MockKeycloakRepository>,
    publisher: Arc<MockEventPublisher>,
}

fn fixture() -> Fixture {
    let endpoint = Arc::new(MockTokenEndpoint::new(authentication()));
    let repository = Arc::new(MockKeycloakRepository::with_users(
        TENANT,
        vec![Principal::new("kc-1")
            .with_username("jdoe")
            .with_external_id("user-1")],
    ));
    let publisher = Arc::new(MockEventPublisher::new());
    let clients = Arc::new(ConfiguredRealmClients::new(
        "-login-application",
        HashMap::from([(TENANT.to_string(), "s3cret".to_string())]),
    ));

    Fixture {
        service: AuthenticationService::new(
            endpoint.clone(),
            clients,
            repository.clone(),
            publisher.clone(),
        ),
        endpoint,
        repository,
        publisher,
    }
}

#[tokio::test]
async fn login_returns_both_tokens_with_expiry() {
    let f = fixture();
    let origin = RequestOrigin::new(Some("curl/8".to_string()), Some("10.0.0.9".to_string()));

    let tokens = f
        .service
        .login(TENANT, &LoginCredentials::new("jdoe", "secret"), &origin)
        .await
        .unwrap();

    assert_eq!(tokens.access_token.expiration_date.timestamp(), 1_700_000_300);
    assert_eq!(tokens.access_token.expires_in, 300);
    assert_eq!(tokens.refresh_token.expiration_date.timestamp(), 1_700_001_800);

    let exchanges = f.endpoint.exchanges.lock().unwrap().clone();
    assert_eq!(exchanges.len(), 1);
    let (realm, client, grant, forwarded) = &exchanges[0];
    assert_eq!(realm, TENANT);
    assert_eq!(client.client_id, "diku-login-application");
    assert_eq!(
        *grant,
        TokenGrant::Password {
            username: "jdoe".to_string(),
            password: "secret".to_string(),
        }
    );
    assert_eq!(forwarded, &origin);
}

#[tokio::test]
async fn login_by_user_id_resolves_the_username() {
    let f = fixture();

    f.service
        .login(
            TENANT,
            &LoginCredentials::for_user("user-1", "secret"),
            &RequestOrigin::default(),
        )
        .await
        .unwrap();

    let exchanges = f.endpoint.exchanges.lock().unwrap().clone();
    assert!(matches!(
        &exchanges[0].2,
        TokenGrant::Password { username, .. } if username == "jdoe"
    ));
}

#[tokio::test]
async fn login_for_unknown_user_id_fails() {
    let f = fixture();

    let result = f
        .service
        .login(
            TENANT,
            &LoginCredentials::for_user("nobody", "secret"),
            &RequestOrigin::default(),
        )
        .await;

    assert!(matches!(result, Err(DomainError::UserNotFound { .. })));
    assert!(f.endpoint.exchanges.lock().unwrap().is_empty());
}

#[tokio::test]
async fn rejected_login_is_a_token_request_failure() {
    let f = fixture();
    f.endpoint.set_should_fail(true);

    let result = f
        .service
        .login(
            TENANT,
            &LoginCredentials::new("jdoe", "wrong"),
            &RequestOrigin::default(),
        )
        .await;

    assert!(matches!(result, Err(DomainError::TokenRequestFailed { .. })));
}

#[tokio::test]
async fn login_for_unconfigured_tenant_fails() {
    let f = fixture();

    let result = f
        .service
        .login(
            "other",
            &LoginCredentials::new("jdoe", "secret"),
            &RequestOrigin::default(),
        )
        .await;

    assert!(matches!(result, Err(DomainError::Configuration { .. })));
}

#[tokio::test]
async fn code_exchange_requires_code_and_redirect_uri() {
    let f = fixture();
    let origin = RequestOrigin::default();

    assert!(matches!(
        f.service.token(TENANT, "", "https://app/cb", &origin).await,
        Err(DomainError::Validation { .. })
    ));
    assert!(matches!(
        f.service.token(TENANT, "code-1", " ", &origin).await,
        Err(DomainError::Validation { .. })
    ));

    f.service
        .token(TENANT, "code-1", "https://app/cb", &origin)
        .await
        .unwrap();
    let exchanges = f.endpoint.exchanges.lock().unwrap().clone();
    assert_eq!(exchanges[0].2.grant_type(), "authorization_code");
}

#[tokio::test]
async fn failed_refresh_is_unprocessable() {
    let f = fixture();
    f.endpoint.set_should_fail(true);

    let result = f.service.refresh_token(TENANT, "stale").await;

    match result {
        Err(DomainError::TokenRefreshFailed { reason }) => {
            assert_eq!(
                reason,
                "Authorization server unable to process token refresh request"
            );
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn logout_ends_the_session_and_publishes_it() {
    let f = fixture();
    let refresh_token = authentication().refresh_token;

    f.service
        .logout(TENANT, Some(&refresh_token), Some("user-1"))
        .await
        .unwrap();

    assert_eq!(*f.endpoint.logouts.lock().unwrap(), vec![refresh_token]);
    assert!(f.repository.logged_out.lock().unwrap().is_empty());

    let events = f.publisher.get_published_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, LogoutEventType::Logout);
    assert_eq!(events[0].session_id.as_deref(), Some("session-1"));
    assert_eq!(events[0].user_id.as_deref(), Some("user-1"));
    assert_eq!(events[0].tenant, TENANT);
}

#[tokio::test]
async fn logout_without_token_ends_every_session() {
    let f = fixture();

    f.service.logout(TENANT, None, Some("user-1")).await.unwrap();

    assert!(f.endpoint.logouts.lock().unwrap().is_empty());
    assert_eq!(*f.repository.logged_out.lock().unwrap(), vec!["kc-1".to_string()]);

    let events = f.publisher.get_published_events();
    assert_eq!(events[0].event_type, LogoutEventType::LogoutAll);
    assert_eq!(events[0].keycloak_user_id.as_deref(), Some("kc-1"));
}

#[tokio::test]
async fn logout_all_requires_a_user_id() {
    let f = fixture();

    let result = f.service.logout_all(TENANT, None).await;

    assert!(matches!(result, Err(DomainError::Validation { .. })));
    assert!(f.publisher.get_published_events().is_empty());
}

#[tokio::test]
async fn failed_logout_is_unprocessable() {
    let f = fixture();
    f.endpoint.set_should_fail(true);

    let result = f
        .service
        .logout(TENANT, Some("refresh"), Some("user-1"))
        .await;

    assert!(matches!(result, Err(DomainError::TokenLogoutFailed { .. })));
    assert!(f.publisher.get_published_events().is_empty());
}

#[tokio::test]
async fn logout_all_for_unknown_user_is_unprocessable() {
    let f = fixture();

    let result = f.service.logout_all(TENANT, Some("nobody")).await;

    assert!(matches!(result, Err(DomainError::TokenLogoutFailed { .. })));
}

#[tokio::test]
async fn publish_failure_does_not_fail_logout() {
    let f = fixture();
    f.publisher.set_should_fail(true);

    let result = f.service.logout_all(TENANT, Some("user-1")).await;

    assert!(result.is_ok());
    assert_eq!(f.repository.logged_out.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn unreadable_refresh_token_still_logs_out() {
    let f = fixture();

    f.service
        .logout(TENANT, Some("opaque-token"), None)
        .await
        .unwrap();

    let events = f.publisher.get_published_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].session_id, None);
}
