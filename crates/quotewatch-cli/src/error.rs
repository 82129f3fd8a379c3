use quotewatch_core::{FetchError, FetchErrorKind, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Fetch(error) => match error.kind() {
                FetchErrorKind::RateLimited => 4,
                _ => 3,
            },
            Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}
