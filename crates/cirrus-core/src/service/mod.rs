//! Collaborator traits implemented by the execution framework and the object cache.

use async_trait::async_trait;

use crate::error::FetchResult;
use crate::model::{FileObject, PreparedRequest};

/// Shared HTTP execution framework that performs prepared requests.
///
/// Implementations own transport, authentication, retries and, when
/// [`PreparedRequest::background`] is set, the background transfer session
/// keyed by its associate identifier.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Perform the request and decode the returned file object.
    async fn execute(&self, request: PreparedRequest) -> FetchResult<FileObject>;
}

/// Local object cache consulted by cache-then-refresh fetches.
#[async_trait]
pub trait FileCache: Send + Sync {
    /// Return the previously stored file object, if any.
    async fn fetch(&self, file_id: &str) -> anyhow::Result<Option<FileObject>>;

    /// Record the outcome of a live refresh; the default implementation keeps the cache as is.
    async fn update(&self, file_id: &str, outcome: &FetchResult<FileObject>) -> anyhow::Result<()> {
        let _ = (file_id, outcome);
        Ok(())
    }
}
