use thiserror::Error;

use crate::recur::adapter::AdapterError;
use crate::recur::expand::ExpansionError;

/// Recurrence crate errors
#[derive(Error, Debug)]
pub enum RecurError {
    #[error(transparent)]
    Expansion(#[from] ExpansionError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    CoreError(#[from] docket_core::error::CoreError),
}

pub type RecurResult<T> = std::result::Result<T, RecurError>;
