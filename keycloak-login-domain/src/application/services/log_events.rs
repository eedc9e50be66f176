use crate::{
    application::ports::{EventRepository, KeycloakRepository},
    domain::{entities::*, errors::DomainResult},
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    event_mapping::EventSource, identity_directory::IdentityDirectory,
    pagination::DEFAULT_BATCH_SIZE,
};

/// Builds the audit feed of a tenant by merging Keycloak activity and admin events
pub struct LogEventsService {
    repository: Arc<dyn KeycloakRepository>,
    event_repository: Arc<dyn EventRepository>,
    batch_size: usize,
}

impl LogEventsService {
    pub fn new(
        repository: Arc<dyn KeycloakRepository>,
        event_repository: Arc<dyn EventRepository>,
    ) -> Self {
        Self {
            repository,
            event_repository,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Returns the `window` slice of the tenant's events, newest first.
    ///
    /// Both event streams are read down to `offset + length` records each and
    /// the user directory is read in full; the three run concurrently and the
    /// first failure aborts the call.
    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn get_log_events(
        &self,
        tenant: &str,
        window: EventWindow,
    ) -> DomainResult<LogEventCollection> {
        let max_records = window.max_records();

        let (directory, activity, admin) = tokio::try_join!(
            IdentityDirectory::load(self.repository.as_ref(), tenant, self.batch_size),
            EventSource::Activity.fetch(
                self.event_repository.as_ref(),
                tenant,
                max_records,
                self.batch_size
            ),
            EventSource::Admin.fetch(
                self.event_repository.as_ref(),
                tenant,
                max_records,
                self.batch_size
            ),
        )?;

        let activity = to_log_events(&activity, &directory, tenant);
        let admin = to_log_events(&admin, &directory, tenant);
        let events = merge_and_window(activity, admin, window);

        info!(
            offset = window.offset,
            length = window.length,
            returned = events.len(),
            "Served log events"
        );
        Ok(LogEventCollection::new(events))
    }
}

fn to_log_events(
    records: &[RawEventRecord],
    directory: &IdentityDirectory,
    tenant: &str,
) -> Vec<LogEvent> {
    records
        .iter()
        .filter_map(|record| record.to_log_event(directory, tenant))
        .collect()
}

/// Concatenates activity then admin events, sorts newest first and cuts `window`.
///
/// The sort is stable, so events sharing a timestamp keep activity-before-admin
/// order and then their upstream order.
pub fn merge_and_window(
    activity: Vec<LogEvent>,
    admin: Vec<LogEvent>,
    window: EventWindow,
) -> Vec<LogEvent> {
    let mut merged = activity;
    merged.extend(admin);
    merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let range = window.range(merged.len());
    merged.truncate(range.end);
    merged.drain(..range.start);
    merged
}
