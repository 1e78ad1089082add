//! Error types for request configuration, execution and header parsing.

use cirrus_config::ConfigError;
use cirrus_core::FetchError;
use thiserror::Error;

/// Failure surfaced by a file request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Only one of the two background transfer parameters was supplied.
    #[error("incomplete background transfer configuration")]
    IncompleteBackgroundTransfer {
        /// Name of the parameter that is absent.
        missing: &'static str,
    },
    /// The file identifier is empty.
    #[error("file identifier must not be empty")]
    EmptyFileId,
    /// The client profile attached to the request failed validation.
    #[error("invalid client profile")]
    InvalidProfile {
        /// Profile field that failed validation, as `section.field`.
        field: String,
        /// Reason reported by the validator.
        reason: String,
    },
    /// The execution framework reported a failure.
    #[error("file fetch failed")]
    Fetch(#[from] FetchError),
    /// The execution task ended before delivering an outcome.
    #[error("request task ended without delivering an outcome")]
    Aborted,
}

impl RequestError {
    /// Whether the error was raised before anything was submitted.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::IncompleteBackgroundTransfer { .. }
                | Self::EmptyFileId
                | Self::InvalidProfile { .. }
        )
    }
}

impl From<ConfigError> for RequestError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::InvalidField {
                section,
                field,
                reason,
                ..
            } => Self::InvalidProfile {
                field: format!("{section}.{field}"),
                reason: reason.to_string(),
            },
            other => Self::InvalidProfile {
                field: "profile".to_string(),
                reason: other.to_string(),
            },
        }
    }
}

/// Convenience alias for request results.
pub type Result<T> = std::result::Result<T, RequestError>;

/// Failure to parse a representation hints header value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HintsHeaderError {
    /// Text outside a bracket group, or an unterminated group.
    #[error("malformed representation hints header")]
    Malformed {
        /// Byte offset where parsing stopped.
        position: usize,
    },
    /// A group entry that maps to no representation kind.
    #[error("unknown representation hint token")]
    UnknownToken {
        /// Offending token.
        token: String,
    },
}
