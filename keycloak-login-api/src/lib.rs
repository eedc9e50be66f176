pub mod config;
pub mod cookies;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod state;

pub use config::Config;
pub use error::AppError;
pub use handlers::router;
pub use state::AppState;
