pub mod authentication;
pub mod credentials;
pub mod event_mapping;
pub mod identity_directory;
pub mod log_events;
pub mod login_attempts;
pub mod pagination;
pub mod password;
pub mod token_parser;
pub mod user_lookup;

pub use authentication::*;
pub use credentials::*;
pub use event_mapping::EventSource;
pub use identity_directory::*;
pub use log_events::*;
pub use login_attempts::*;
pub use password::*;
pub use pagination::{fetch_up_to, DEFAULT_BATCH_SIZE};
