use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Validation errors for symbols, dates, and configuration values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("date must be YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("configuration value {key}='{value}' is invalid: {reason}")]
    InvalidConfig {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Classification of a failed market-data fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The provider signalled throttling and the retry budget ran out.
    RateLimited,
    /// The provider answered with an explicit error message.
    ApiError,
    /// Network, status, or JSON parse failure after the retry budget ran out.
    TransportError,
    /// A well-formed response without the expected data section.
    NotFound,
    /// The data section was present but a field failed validation.
    Malformed,
}

/// Error raised by the fetch client and the normalizers.
///
/// `Display` yields only the human-readable message; that string is what ends
/// up in the dashboard error banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
}

impl FetchError {
    pub fn rate_limited() -> Self {
        Self {
            kind: FetchErrorKind::RateLimited,
            message: String::from("API rate limit reached. Please try again later."),
        }
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::ApiError,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::TransportError,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::NotFound,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Malformed,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchErrorKind::RateLimited => "fetch.rate_limited",
            FetchErrorKind::ApiError => "fetch.api_error",
            FetchErrorKind::TransportError => "fetch.transport_error",
            FetchErrorKind::NotFound => "fetch.not_found",
            FetchErrorKind::Malformed => "fetch.malformed",
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FetchError {}

impl From<ValidationError> for FetchError {
    fn from(error: ValidationError) -> Self {
        Self::malformed(error.to_string())
    }
}
