use crate::{
    application::{ports::KeycloakRepository, services::pagination::fetch_up_to},
    domain::{entities::Principal, errors::DomainResult},
};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Snapshot of a realm's principals that carry a platform user id.
///
/// Built once per aggregation and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct IdentityDirectory {
    external_ids: HashMap<String, String>,
}

impl IdentityDirectory {
    /// Reads every user of `realm` in pages of `batch_size`.
    #[instrument(skip(repository), fields(realm = %realm))]
    pub async fn load(
        repository: &dyn KeycloakRepository,
        realm: &str,
        batch_size: usize,
    ) -> DomainResult<Self> {
        let count = repository.count_users(realm).await?;
        let principals = fetch_up_to(count, batch_size, |first, max| {
            repository.list_users(realm, first, max)
        })
        .await?;

        let directory = Self::from_principals(principals);
        debug!(
            users = count,
            known = directory.len(),
            "Loaded identity directory"
        );
        Ok(directory)
    }

    pub fn from_principals<I>(principals: I) -> Self
    where
        I: IntoIterator<Item = Principal>,
    {
        let external_ids = principals
            .into_iter()
            .filter_map(|principal| {
                let external_id = principal.external_id()?.to_string();
                Some((principal.id, external_id))
            })
            .collect();
        Self { external_ids }
    }

    pub fn is_known(&self, internal_id: &str) -> bool {
        self.external_ids.contains_key(internal_id)
    }

    pub fn external_id_of(&self, internal_id: &str) -> Option<&str> {
        self.external_ids.get(internal_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.external_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.external_ids.is_empty()
    }
}
