pub mod auth;
pub mod config;
pub mod events;
pub mod repository;

pub use auth::*;
pub use config::*;
pub use events::*;
pub use repository::*;
