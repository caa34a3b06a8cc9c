use thiserror::Error;

/// Centralized error types for the application
///
/// Errors that cross module boundaries are converted to this enum for
/// consistent handling. Uses `thiserror` for conversions and display
/// formatting.
#[derive(Error, Debug)]
pub enum AppError {
    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// IO errors (store file, asset file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
