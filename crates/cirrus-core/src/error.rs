//! Error types surfaced by the request execution framework.

use thiserror::Error;

/// Structured failure returned by a [`crate::RequestExecutor`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network or protocol level failure before a response was decoded.
    #[error("transport failure")]
    Transport {
        /// Transport supplied detail.
        message: String,
    },
    /// Credentials were missing, expired or rejected.
    #[error("authentication failed")]
    Unauthorized,
    /// The file does not exist or is not visible to the caller.
    #[error("file not found")]
    NotFound {
        /// Identifier that was requested.
        file_id: String,
    },
    /// The file exists but not in the requested namespace (live vs trash).
    #[error("file trash state mismatch")]
    TrashStateMismatch {
        /// Identifier that was requested.
        file_id: String,
        /// Whether the request targeted the trash namespace.
        requested_trashed: bool,
    },
    /// The current version matched one of the excluded entity tags.
    #[error("file not modified")]
    NotModified {
        /// Entity tag reported by the server, when present.
        etag: Option<String>,
    },
    /// Any other non-success response.
    #[error("unexpected response status")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server supplied message, when present.
        message: Option<String>,
    },
}

impl FetchError {
    /// Short machine readable label used in structured logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Unauthorized => "unauthorized",
            Self::NotFound { .. } => "not_found",
            Self::TrashStateMismatch { .. } => "trash_state_mismatch",
            Self::NotModified { .. } => "not_modified",
            Self::Status { .. } => "status",
        }
    }
}

/// Convenience alias for fetch results.
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_messages_are_constant() {
        let err = FetchError::NotFound {
            file_id: "99".to_string(),
        };
        assert_eq!(err.to_string(), "file not found");
        assert_eq!(err.kind(), "not_found");
        assert_eq!(
            FetchError::NotModified { etag: None }.kind(),
            "not_modified"
        );
    }
}
