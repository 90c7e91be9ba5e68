//! Crate-wide error type

use crate::domain::ScanError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatusViewError>;

#[derive(Debug, Error)]
pub enum StatusViewError {
    /// Discovery failed wholesale; per-root problems never surface here.
    #[error("scan failed: {0}")]
    Scan(#[from] ScanError),

    /// A navigation operation was invoked while its precondition was unmet.
    /// This indicates a presentation-layer bug, not a runtime condition.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
