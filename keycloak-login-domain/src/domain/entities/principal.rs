use serde::{Deserialize, Serialize};

use super::common::Attributes;

/// Attribute linking a Keycloak principal to the platform's own user id
pub const USER_ID_ATTR: &str = "user_id";

/// A Keycloak user as seen by the login service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub username: Option<String>,
    pub attributes: Attributes,
}

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            attributes: Attributes::new(),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Links the principal to a platform user id.
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.attributes
            .set_attribute(USER_ID_ATTR.to_string(), vec![external_id.into()]);
        self
    }

    /// Platform user id, present only for principals created through the platform.
    pub fn external_id(&self) -> Option<&str> {
        self.attributes
            .get_single_attribute(USER_ID_ATTR)
            .map(String::as_str)
    }
}
