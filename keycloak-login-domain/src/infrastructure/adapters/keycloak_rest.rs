use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::application::ports::{
    auth::AdminTokenProvider,
    config::{HttpConfig, KeycloakConfig},
    repository::*,
};
use crate::domain::{entities::*, errors::*};

/// Builds the shared HTTP client used for every Keycloak call.
pub fn http_client(config: &HttpConfig) -> DomainResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.get_timeout())
        .connect_timeout(config.get_connect_timeout())
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| DomainError::Configuration {
            message: format!("Failed to build HTTP client: {e}"),
        })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRepresentation {
    id: Option<String>,
    username: Option<String>,
    #[serde(default)]
    attributes: Option<HashMap<String, Vec<String>>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialRepresentation {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(rename = "type")]
    type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temporary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_label: Option<String>,
}

/// Keycloak admin REST API adapter implementing the repository ports
pub struct KeycloakRestAdapter {
    config: KeycloakConfig,
    client: reqwest::Client,
    tokens: Arc<dyn AdminTokenProvider>,
}

impl KeycloakRestAdapter {
    pub fn new(
        config: KeycloakConfig,
        client: reqwest::Client,
        tokens: Arc<dyn AdminTokenProvider>,
    ) -> Self {
        Self {
            config,
            client,
            tokens,
        }
    }

    fn url(&self, realm: &str, path: &str) -> String {
        format!("{}/{}", self.config.get_realm_url(realm), path)
    }

    async fn request(&self, method: Method, url: &str) -> Result<RequestBuilder, RepositoryError> {
        let token = self
            .tokens
            .admin_token()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed {
                message: format!("Cannot obtain admin token: {e}"),
            })?;
        Ok(self
            .client
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, token.bearer()))
    }

    async fn send(
        &self,
        query: &str,
        request: RequestBuilder,
    ) -> Result<reqwest::Response, RepositoryError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RepositoryError::QueryFailed {
                    query: query.to_string(),
                    message: "request timed out".to_string(),
                }
            } else {
                RepositoryError::ConnectionFailed {
                    message: format!("{query}: {e}"),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::UnexpectedStatus {
                query: query.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        query: &str,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, RepositoryError> {
        let request = self.request(Method::GET, url).await?.query(params);
        let response = self.send(query, request).await?;
        response
            .json()
            .await
            .map_err(|e| RepositoryError::SerializationFailed {
                message: format!("{query}: {e}"),
            })
    }

    async fn list_principals(
        &self,
        query: &str,
        realm: &str,
        params: &[(&str, String)],
    ) -> DomainResult<Vec<Principal>> {
        let users: Vec<UserRepresentation> =
            self.get_json(query, &self.url(realm, "users"), params).await?;
        Ok(users.into_iter().filter_map(convert_user_from_keycloak).collect())
    }
}

#[async_trait]
impl KeycloakRepository for KeycloakRestAdapter {
    async fn count_users(&self, realm: &str) -> DomainResult<usize> {
        let count: usize = self
            .get_json("count users", &self.url(realm, "users/count"), &[])
            .await?;
        Ok(count)
    }

    async fn list_users(
        &self,
        realm: &str,
        first: usize,
        max: usize,
    ) -> DomainResult<Vec<Principal>> {
        let params = [
            ("first", first.to_string()),
            ("max", max.to_string()),
            ("briefRepresentation", "false".to_string()),
        ];
        self.list_principals("list users", realm, &params).await
    }

    async fn find_users_by_attribute(
        &self,
        realm: &str,
        key: &str,
        value: &str,
    ) -> DomainResult<Vec<Principal>> {
        let params = [
            ("q", format!("{key}:{value}")),
            ("exact", "true".to_string()),
            ("briefRepresentation", "false".to_string()),
        ];
        self.list_principals("find users by attribute", realm, &params)
            .await
    }

    async fn find_users_by_username(
        &self,
        realm: &str,
        username: &str,
    ) -> DomainResult<Vec<Principal>> {
        let params = [
            ("username", username.to_string()),
            ("exact", "true".to_string()),
        ];
        self.list_principals("find users by username", realm, &params)
            .await
    }

    async fn get_user_credentials(
        &self,
        realm: &str,
        user_id: &str,
    ) -> DomainResult<Vec<Credential>> {
        let credentials: Vec<CredentialRepresentation> = self
            .get_json(
                "get user credentials",
                &self.url(realm, &format!("users/{user_id}/credentials")),
                &[],
            )
            .await?;
        Ok(credentials
            .into_iter()
            .map(convert_credential_from_keycloak)
            .collect())
    }

    async fn reset_password(
        &self,
        realm: &str,
        user_id: &str,
        credential: &Credential,
    ) -> DomainResult<()> {
        let url = self.url(realm, &format!("users/{user_id}/reset-password"));
        let request = self
            .request(Method::PUT, &url)
            .await?
            .json(&convert_credential_to_keycloak(credential));
        self.send("reset password", request).await?;
        Ok(())
    }

    async fn delete_user_credential(
        &self,
        realm: &str,
        user_id: &str,
        credential_id: &str,
    ) -> DomainResult<()> {
        let url = self.url(realm, &format!("users/{user_id}/credentials/{credential_id}"));
        let request = self.request(Method::DELETE, &url).await?;
        self.send("delete user credential", request).await?;
        Ok(())
    }

    async fn logout_all_sessions(&self, realm: &str, user_id: &str) -> DomainResult<()> {
        let url = self.url(realm, &format!("users/{user_id}/logout"));
        let request = self.request(Method::POST, &url).await?;
        self.send("logout user", request).await?;
        Ok(())
    }

    async fn brute_force_status(
        &self,
        realm: &str,
        user_id: &str,
    ) -> DomainResult<BruteForceStatus> {
        let status = self
            .get_json(
                "brute force status",
                &self.url(realm, &format!("attack-detection/brute-force/users/{user_id}")),
                &[],
            )
            .await?;
        Ok(status)
    }
}

#[async_trait]
impl EventRepository for KeycloakRestAdapter {
    async fn list_user_events(
        &self,
        realm: &str,
        types: &[&str],
        first: usize,
        max: usize,
    ) -> DomainResult<Vec<UserEventRecord>> {
        let mut params: Vec<(&str, String)> =
            types.iter().map(|t| ("type", t.to_string())).collect();
        params.push(("first", first.to_string()));
        params.push(("max", max.to_string()));

        let page: Vec<serde_json::Value> = self
            .get_json("list events", &self.url(realm, "events"), &params)
            .await?;
        let events: Vec<UserEventRecord> = decode_records("user event", page);
        debug!(realm, first, count = events.len(), "Read user events page");
        Ok(events)
    }

    async fn list_admin_events(
        &self,
        realm: &str,
        operation_types: &[&str],
        first: usize,
        max: usize,
    ) -> DomainResult<Vec<AdminEventRecord>> {
        let mut params: Vec<(&str, String)> = operation_types
            .iter()
            .map(|t| ("operationTypes", t.to_string()))
            .collect();
        params.push(("first", first.to_string()));
        params.push(("max", max.to_string()));

        let page: Vec<serde_json::Value> = self
            .get_json("list admin events", &self.url(realm, "admin-events"), &params)
            .await?;
        let events: Vec<AdminEventRecord> = decode_records("admin event", page);
        debug!(realm, first, count = events.len(), "Read admin events page");
        Ok(events)
    }
}

/// Decodes each record of an event page on its own.
///
/// A malformed record becomes an empty record, which mapping discards. The page
/// keeps its length so paging still stops only on a genuinely short page.
fn decode_records<T>(kind: &str, page: Vec<serde_json::Value>) -> Vec<T>
where
    T: DeserializeOwned + Default,
{
    page.into_iter()
        .map(|record| {
            serde_json::from_value(record).unwrap_or_else(|e| {
                debug!(kind, error = %e, "Skipping malformed event record");
                T::default()
            })
        })
        .collect()
}

fn convert_user_from_keycloak(user: UserRepresentation) -> Option<Principal> {
    let Some(id) = user.id else {
        debug!("Skipping Keycloak user without id");
        return None;
    };
    Some(Principal {
        id,
        username: user.username,
        attributes: Attributes::from(user.attributes.unwrap_or_default()),
    })
}

fn convert_credential_from_keycloak(credential: CredentialRepresentation) -> Credential {
    Credential {
        id: credential.id,
        type_: credential.type_.unwrap_or_default(),
        value: credential.value,
        temporary: credential.temporary,
        created_date: credential
            .created_date
            .and_then(DateTime::from_timestamp_millis),
        user_label: credential.user_label,
    }
}

fn convert_credential_to_keycloak(credential: &Credential) -> CredentialRepresentation {
    CredentialRepresentation {
        id: credential.id.clone(),
        type_: Some(credential.type_.clone()),
        value: credential.value.clone(),
        temporary: credential.temporary,
        created_date: credential.created_date.map(|dt| dt.timestamp_millis()),
        user_label: credential.user_label.clone(),
    }
}
