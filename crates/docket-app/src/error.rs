use thiserror::Error;

/// Application-level errors (command line layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    RecurError(#[from] docket_recur::error::RecurError),

    #[error(transparent)]
    CoreError(#[from] docket_core::error::CoreError),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
