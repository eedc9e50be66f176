use crate::{
    application::{ports::EventRepository, services::pagination::fetch_up_to},
    domain::{
        entities::*,
        errors::DomainResult,
    },
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::identity_directory::IdentityDirectory;

/// Activity event codes requested from Keycloak
pub const SUPPORTED_USER_EVENTS: [&str; 4] =
    ["LOGIN", "LOGIN_ERROR", "UPDATE_PASSWORD", "RESET_PASSWORD"];

/// Admin operation types requested from Keycloak
pub const ADMIN_EVENT_OPERATION_TYPES: [&str; 1] = ["ACTION"];

const USER_RESOURCE_TYPE: &str = "USER";
const RESET_PASSWORD_PATH: &str = "/reset-password";

static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        "[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
    )
    .expect("UUID pattern is valid")
});

/// Upstream event stream feeding the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    Activity,
    Admin,
}

impl EventSource {
    /// Reads at least `limit` records (or the whole stream) from this source.
    pub async fn fetch(
        self,
        repository: &dyn EventRepository,
        realm: &str,
        limit: usize,
        batch_size: usize,
    ) -> DomainResult<Vec<RawEventRecord>> {
        let records = match self {
            EventSource::Activity => fetch_up_to(limit, batch_size, |first, max| {
                repository.list_user_events(realm, &SUPPORTED_USER_EVENTS, first, max)
            })
            .await?
            .into_iter()
            .map(RawEventRecord::Activity)
            .collect::<Vec<_>>(),
            EventSource::Admin => fetch_up_to(limit, batch_size, |first, max| {
                repository.list_admin_events(realm, &ADMIN_EVENT_OPERATION_TYPES, first, max)
            })
            .await?
            .into_iter()
            .map(RawEventRecord::Admin)
            .collect::<Vec<_>>(),
        };

        debug!(source = ?self, count = records.len(), "Fetched raw events");
        Ok(records)
    }
}

impl RawEventRecord {
    /// Canonical event for this record, or `None` when its type is not tracked,
    /// its subject is not a platform user, or the record is malformed.
    pub fn to_log_event(&self, directory: &IdentityDirectory, tenant: &str) -> Option<LogEvent> {
        match self {
            RawEventRecord::Activity(record) => map_user_event(record, directory, tenant),
            RawEventRecord::Admin(record) => map_admin_event(record, directory, tenant),
        }
    }
}

pub fn user_event_type(code: &str) -> Option<LogEventType> {
    match code {
        "LOGIN" => Some(LogEventType::SuccessfulLoginAttempt),
        "LOGIN_ERROR" => Some(LogEventType::FailedLoginAttempt),
        "UPDATE_PASSWORD" => Some(LogEventType::PasswordChange),
        "RESET_PASSWORD" => Some(LogEventType::PasswordReset),
        _ => None,
    }
}

pub fn admin_event_type(record: &AdminEventRecord) -> Option<LogEventType> {
    let is_user = record.resource_type.as_deref() == Some(USER_RESOURCE_TYPE);
    let is_reset = record
        .resource_path
        .as_deref()
        .is_some_and(|path| path.contains(RESET_PASSWORD_PATH));
    (is_user && is_reset).then_some(LogEventType::PasswordReset)
}

/// First UUID-shaped substring of an admin resource path.
pub fn extract_first_uuid(resource_path: &str) -> Option<&str> {
    UUID_PATTERN.find(resource_path).map(|m| m.as_str())
}

fn map_user_event(
    record: &UserEventRecord,
    directory: &IdentityDirectory,
    tenant: &str,
) -> Option<LogEvent> {
    let event_type = user_event_type(record.type_.as_deref()?)?;

    let Some(subject) = record.user_id.as_deref() else {
        debug!(?event_type, "Skipping activity event without user id");
        return None;
    };
    let user_id = directory.external_id_of(subject)?;

    let Some(timestamp) = RawEventRecord::timestamp_of(record.time) else {
        debug!(subject, time = ?record.time, "Skipping activity event with invalid time");
        return None;
    };

    Some(LogEvent {
        event_type,
        user_id: user_id.to_string(),
        ip: record.ip_address.clone().unwrap_or_default(),
        tenant: tenant.to_string(),
        timestamp,
    })
}

fn map_admin_event(
    record: &AdminEventRecord,
    directory: &IdentityDirectory,
    tenant: &str,
) -> Option<LogEvent> {
    let event_type = admin_event_type(record)?;

    let path = record.resource_path.as_deref().unwrap_or_default();
    let Some(subject) = extract_first_uuid(path) else {
        debug!(path, "Skipping admin event without user id in resource path");
        return None;
    };
    let user_id = directory.external_id_of(subject)?;

    let Some(timestamp) = RawEventRecord::timestamp_of(record.time) else {
        debug!(subject, time = ?record.time, "Skipping admin event with invalid time");
        return None;
    };

    let ip = record
        .auth_details
        .as_ref()
        .and_then(|details| details.ip_address.clone())
        .unwrap_or_default();

    Some(LogEvent {
        event_type,
        user_id: user_id.to_string(),
        ip,
        tenant: tenant.to_string(),
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KC_ID: &str = "6f1e2b9c-3c2d-4a4e-9b8a-0d1c2e3f4a5b";

    fn directory() -> IdentityDirectory {
        IdentityDirectory::from_principals([
            Principal::new(KC_ID).with_external_id("ext-1"),
            Principal::new("kc-2").with_username("admin"),
        ])
    }

    fn login(user_id: &str, time: i64) -> UserEventRecord {
        UserEventRecord {
            time: Some(time),
            type_: Some("LOGIN".to_string()),
            user_id: Some(user_id.to_string()),
            ip_address: Some("10.0.0.1".to_string()),
            ..Default::default()
        }
    }

    fn reset(path: &str, time: i64) -> AdminEventRecord {
        AdminEventRecord {
            time: Some(time),
            operation_type: Some("ACTION".to_string()),
            resource_type: Some("USER".to_string()),
            resource_path: Some(path.to_string()),
            auth_details: Some(AuthDetails {
                ip_address: Some("192.168.1.1".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn activity_codes_map_to_event_types() {
        assert_eq!(user_event_type("LOGIN"), Some(LogEventType::SuccessfulLoginAttempt));
        assert_eq!(user_event_type("LOGIN_ERROR"), Some(LogEventType::FailedLoginAttempt));
        assert_eq!(user_event_type("UPDATE_PASSWORD"), Some(LogEventType::PasswordChange));
        assert_eq!(user_event_type("RESET_PASSWORD"), Some(LogEventType::PasswordReset));
        assert_eq!(user_event_type("LOGOUT"), None);
        assert_eq!(user_event_type("login"), None);
    }

    #[test]
    fn known_login_becomes_log_event() {
        let raw = RawEventRecord::Activity(login(KC_ID, 1_000));
        let event = raw.to_log_event(&directory(), "diku").unwrap();

        assert_eq!(event.event_type, LogEventType::SuccessfulLoginAttempt);
        assert_eq!(event.user_id, "ext-1");
        assert_eq!(event.ip, "10.0.0.1");
        assert_eq!(event.tenant, "diku");
        assert_eq!(event.timestamp.timestamp_millis(), 1_000);
    }

    #[test]
    fn unknown_subject_is_dropped() {
        let raw = RawEventRecord::Activity(login("kc-2", 1_000));
        assert!(raw.to_log_event(&directory(), "diku").is_none());
    }

    #[test]
    fn malformed_activity_records_are_dropped() {
        let mut no_time = login(KC_ID, 0);
        no_time.time = None;
        let mut no_subject = login(KC_ID, 0);
        no_subject.user_id = None;
        let mut no_type = login(KC_ID, 0);
        no_type.type_ = None;

        for record in [no_time, no_subject, no_type] {
            assert!(RawEventRecord::Activity(record)
                .to_log_event(&directory(), "diku")
                .is_none());
        }
    }

    #[test]
    fn missing_ip_becomes_empty() {
        let mut record = login(KC_ID, 1);
        record.ip_address = None;
        let event = RawEventRecord::Activity(record)
            .to_log_event(&directory(), "diku")
            .unwrap();
        assert_eq!(event.ip, "");
    }

    #[test]
    fn admin_reset_uses_uuid_from_path() {
        let raw = RawEventRecord::Admin(reset(&format!("users/{KC_ID}/reset-password"), 7));
        let event = raw.to_log_event(&directory(), "diku").unwrap();

        assert_eq!(event.event_type, LogEventType::PasswordReset);
        assert_eq!(event.user_id, "ext-1");
        assert_eq!(event.ip, "192.168.1.1");
    }

    #[test]
    fn admin_event_needs_user_resource_and_reset_path() {
        let mut client = reset(&format!("users/{KC_ID}/reset-password"), 7);
        client.resource_type = Some("CLIENT".to_string());
        assert_eq!(admin_event_type(&client), None);

        let other_action = reset(&format!("users/{KC_ID}/execute-actions-email"), 7);
        assert_eq!(admin_event_type(&other_action), None);
    }

    #[test]
    fn admin_event_without_uuid_is_dropped() {
        let raw = RawEventRecord::Admin(reset("users/not-a-uuid/reset-password", 7));
        assert!(raw.to_log_event(&directory(), "diku").is_none());
    }

    #[test]
    fn first_uuid_in_path_wins() {
        let path = "users/00000000-0000-0000-0000-000000000001/groups/00000000-0000-0000-0000-000000000002";
        assert_eq!(
            extract_first_uuid(path),
            Some("00000000-0000-0000-0000-000000000001")
        );
        assert_eq!(extract_first_uuid("users"), None);
    }
}
