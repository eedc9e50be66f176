/*!
# Keycloak Login Domain

Domain layer of the Keycloak login front, laid out along hexagonal lines.

This crate provides:
- Domain models for principals, Keycloak events, audit log events and tokens
- Port definitions for Keycloak administration, events, token endpoints and configuration
- Application services: the audit event feed, login/logout, credentials, password
  actions, login attempts
- Infrastructure adapters backed by the Keycloak REST API

## Architecture

```text
┌─────────────────────────────────────────────────────────────┐
│                    Primary Adapters                         │
├─────────────────────────────────────────────────────────────┤
│              HTTP Server (Axum handlers, /authn)            │
└─────────────────────────────────────────────────────────────┘
                              │
┌─────────────────────────────────────────────────────────────┐
│                Application Layer                            │
├─────────────────────────────────────────────────────────────┤
│  • LogEventsService         • AuthenticationService         │
│  • CredentialsService       • LoginAttemptsService          │
│  • PasswordService                                          │
└─────────────────────────────────────────────────────────────┘
                              │
┌─────────────────────────────────────────────────────────────┐
│                 Domain Layer (Ports)                        │
├─────────────────────────────────────────────────────────────┤
│  • KeycloakRepository       • EventRepository               │
│  • TokenEndpoint            • RealmConfigurationProvider    │
│  • AdminTokenProvider       • EventPublisher                │
│  • PasswordActionRepository                                 │
└─────────────────────────────────────────────────────────────┘
                              │
┌─────────────────────────────────────────────────────────────┐
│              Infrastructure Layer (Adapters)                │
├─────────────────────────────────────────────────────────────┤
│  • KeycloakRestAdapter      • KeycloakTokenManager          │
│  • CachedAdminTokenProvider • ConfiguredRealmClients        │
│  • EnvConfigurationAdapter  • MemoryEventPublisher          │
│  • InMemoryPasswordActionRepository                         │
└─────────────────────────────────────────────────────────────┘
```

## Audit feed

`LogEventsService::get_log_events` merges Keycloak user activity events and
admin events into one newest-first feed. Only events of tracked types whose
subject carries a `user_id` attribute are kept, and the subject is reported by
that attribute value.

## Usage

```rust,ignore
use keycloak_login_domain::{EventWindow, LogEventsService};

let service = LogEventsService::new(adapter.clone(), adapter).with_batch_size(100);
let page = service.get_log_events("diku", EventWindow::new(0, 20)).await?;
```
*/

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::ports::*;
pub use application::services::{
    AuthenticationService, CredentialsService, EventSource, IdentityDirectory,
    LogEventsService, LoginAttemptsService, PasswordService,
};
pub use domain::entities::{
    Attributes, BruteForceStatus, Credential, CredentialsExistence, EventWindow,
    KeycloakAuthentication, LogEvent, LogEventCollection, LogEventType, LoginAttempts,
    LoginCredentials, PasswordCheck, PasswordCreateAction, PasswordResetAction, Principal,
    RawEventRecord, ResponseCreateAction, ResponseResetAction, Token, TokenContainer,
    UpdateCredentials, ValidPasswordResponse,
};
pub use domain::errors::*;
