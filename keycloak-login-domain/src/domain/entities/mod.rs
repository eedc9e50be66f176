pub mod common;
pub mod credentials;
pub mod log_event;
pub mod password_action;
pub mod principal;
pub mod raw_event;
pub mod token;

pub use common::*;
pub use credentials::*;
pub use log_event::*;
pub use password_action::*;
pub use principal::*;
pub use raw_event::*;
pub use token::*;
