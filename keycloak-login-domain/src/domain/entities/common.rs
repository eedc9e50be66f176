use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Principal attributes as key-value pairs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub attributes: HashMap<String, Vec<String>>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_attribute(&mut self, key: String, value: String) {
        self.attributes.entry(key).or_default().push(value);
    }

    pub fn set_attribute(&mut self, key: String, values: Vec<String>) {
        self.attributes.insert(key, values);
    }

    pub fn get_attribute(&self, key: &str) -> Option<&Vec<String>> {
        self.attributes.get(key)
    }

    pub fn get_single_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)?.first()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }
}

impl From<HashMap<String, Vec<String>>> for Attributes {
    fn from(attributes: HashMap<String, Vec<String>>) -> Self {
        Self { attributes }
    }
}

/// Stored credential of a Keycloak user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub id: Option<String>,
    pub type_: String,
    pub value: Option<String>,
    pub temporary: Option<bool>,
    pub created_date: Option<DateTime<Utc>>,
    pub user_label: Option<String>,
}

impl Credential {
    pub const PASSWORD: &'static str = "password";

    pub fn password(value: String, temporary: bool) -> Self {
        Self {
            id: None,
            type_: Self::PASSWORD.to_string(),
            value: Some(value),
            temporary: Some(temporary),
            created_date: None,
            user_label: None,
        }
    }

    pub fn is_password(&self) -> bool {
        self.type_ == Self::PASSWORD
    }

    pub fn is_temporary(&self) -> bool {
        self.temporary.unwrap_or(false)
    }
}
