//! CLI error type and exit code mapping.

use std::fmt::{self, Display, Formatter};

use anyhow::anyhow;
use cirrus_config::ConfigError;
use cirrus_request::{HintsHeaderError, RequestError};

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::InvalidField {
                section,
                field,
                reason,
                ..
            } => Self::validation(format!("invalid profile {section}.{field}: {reason}")),
            ConfigError::Json { path, source } => Self::validation(format!(
                "profile {} is not valid JSON: {source}",
                path.display()
            )),
            io @ ConfigError::Io { .. } => Self::failure(io),
        }
    }
}

impl From<RequestError> for CliError {
    fn from(error: RequestError) -> Self {
        match error {
            RequestError::IncompleteBackgroundTransfer { missing } => Self::validation(format!(
                "background transfer needs both --associate-id and --directory ({missing} missing)"
            )),
            RequestError::EmptyFileId => Self::validation("file identifier must not be empty"),
            RequestError::InvalidProfile { field, reason } => {
                Self::validation(format!("invalid profile {field}: {reason}"))
            }
            other @ (RequestError::Fetch(_) | RequestError::Aborted) => Self::failure(other),
        }
    }
}

impl From<HintsHeaderError> for CliError {
    fn from(error: HintsHeaderError) -> Self {
        match error {
            HintsHeaderError::Malformed { position } => {
                Self::validation(format!("malformed hints header at byte {position}"))
            }
            HintsHeaderError::UnknownToken { token } => {
                Self::validation(format!("unknown hint token `{token}`"))
            }
        }
    }
}

pub(crate) fn json_failure(error: &serde_json::Error) -> CliError {
    CliError::failure(anyhow!("failed to format JSON: {error}"))
}
