//! Core utilities, configuration, and common functionality

pub mod config;
pub mod error;
pub mod logging;
pub mod stats;
pub mod stats_reporter;
pub mod supervisor;
pub mod web_server;

// Re-exports for convenience
pub use error::{AppError, AppResult};
pub use logging::init_logger;
pub use supervisor::RuntimeStatus;
