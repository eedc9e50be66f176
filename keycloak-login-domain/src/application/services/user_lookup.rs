use crate::{
    application::ports::KeycloakRepository,
    domain::{
        entities::{Principal, USER_ID_ATTR},
        errors::{DomainError, DomainResult},
    },
};
use tracing::debug;

/// Finds the single Keycloak user linked to a platform user id.
pub async fn find_by_user_id(
    repository: &dyn KeycloakRepository,
    realm: &str,
    user_id: &str,
) -> DomainResult<Principal> {
    let mut found = repository
        .find_users_by_attribute(realm, USER_ID_ATTR, user_id)
        .await?;

    match found.len() {
        0 => Err(DomainError::UserNotFound {
            user_id: user_id.to_string(),
            realm: realm.to_string(),
        }),
        1 => {
            let principal = found.remove(0);
            debug!(user_id, keycloak_user_id = %principal.id, "Resolved Keycloak user");
            Ok(principal)
        }
        _ => Err(DomainError::AmbiguousUser {
            user_id: user_id.to_string(),
        }),
    }
}

/// Finds a Keycloak user by exact username.
pub async fn find_by_username(
    repository: &dyn KeycloakRepository,
    realm: &str,
    username: &str,
) -> DomainResult<Principal> {
    repository
        .find_users_by_username(realm, username)
        .await?
        .into_iter()
        .find(|principal| principal.username.as_deref() == Some(username))
        .ok_or_else(|| DomainError::UsernameNotFound {
            username: username.to_string(),
            realm: realm.to_string(),
        })
}
