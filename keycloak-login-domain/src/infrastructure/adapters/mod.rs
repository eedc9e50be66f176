pub mod env_config;
pub mod keycloak_rest;
pub mod keycloak_token_manager;
pub mod memory_event_publisher;
pub mod memory_password_actions;
pub mod realm_clients;

pub use env_config::*;
pub use keycloak_rest::*;
pub use keycloak_token_manager::*;
pub use memory_event_publisher::*;
pub use memory_password_actions::*;
pub use realm_clients::*;
