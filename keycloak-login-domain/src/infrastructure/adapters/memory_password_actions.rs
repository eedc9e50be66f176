use crate::application::ports::PasswordActionRepository;
use crate::domain::{entities::PasswordCreateAction, errors::DomainResult};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Process-local password action store; actions are lost on restart
#[derive(Default)]
pub struct InMemoryPasswordActionRepository {
    actions: RwLock<HashMap<String, HashMap<String, PasswordCreateAction>>>,
}

impl InMemoryPasswordActionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PasswordActionRepository for InMemoryPasswordActionRepository {
    async fn find_by_id(
        &self,
        tenant: &str,
        id: &str,
    ) -> DomainResult<Option<PasswordCreateAction>> {
        let actions = self.actions.read().await;
        Ok(actions.get(tenant).and_then(|tenant_actions| tenant_actions.get(id)).cloned())
    }

    async fn find_by_user_id(
        &self,
        tenant: &str,
        user_id: &str,
    ) -> DomainResult<Option<PasswordCreateAction>> {
        let actions = self.actions.read().await;
        Ok(actions.get(tenant).and_then(|tenant_actions| {
            tenant_actions
                .values()
                .find(|action| action.user_id == user_id)
                .cloned()
        }))
    }

    async fn save(&self, tenant: &str, action: PasswordCreateAction) -> DomainResult<()> {
        debug!(tenant, action_id = %action.id, "Storing password action");
        self.actions
            .write()
            .await
            .entry(tenant.to_string())
            .or_default()
            .insert(action.id.clone(), action);
        Ok(())
    }

    async fn delete(&self, tenant: &str, id: &str) -> DomainResult<()> {
        if let Some(tenant_actions) = self.actions.write().await.get_mut(tenant) {
            tenant_actions.remove(id);
        }
        Ok(())
    }
}
