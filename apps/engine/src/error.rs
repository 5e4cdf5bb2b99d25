use thiserror::Error;

use crate::errors::domain::DomainError;

/// Top-level error for the binary edge and context building.
///
/// Library code returns `DomainError`; this type exists so the
/// simulator and bootstrap code can also carry config and IO failures.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }
}
