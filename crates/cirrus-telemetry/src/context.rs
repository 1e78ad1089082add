//! Fetch context propagation.
//!
//! # Design
//! - Keeps the active fetch identity in task-local storage so executors can correlate
//!   background transfers without threading extra parameters through their APIs.

use std::future::Future;
use std::sync::Arc;

/// Identity of the fetch currently executing on this task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchContext {
    /// Target file identifier.
    pub file_id: Arc<str>,
    /// Background transfer correlation key, when the fetch runs in the background.
    pub associate_id: Option<Arc<str>>,
}

impl FetchContext {
    /// Context for a fetch of `file_id`.
    #[must_use]
    pub fn new(file_id: impl Into<Arc<str>>, associate_id: Option<&str>) -> Self {
        Self {
            file_id: file_id.into(),
            associate_id: associate_id.map(Arc::from),
        }
    }
}

/// Retrieve the fetch context of the current task, if one is set.
#[must_use]
pub fn current_fetch_context() -> Option<FetchContext> {
    ACTIVE_FETCH_CONTEXT.try_with(Clone::clone).ok()
}

/// Retrieve the background transfer correlation key of the current task, if any.
#[must_use]
pub fn current_associate_id() -> Option<String> {
    ACTIVE_FETCH_CONTEXT
        .try_with(|ctx| ctx.associate_id.as_deref().map(ToString::to_string))
        .ok()
        .flatten()
}

/// Execute the provided future with the supplied fetch context available to downstream code.
pub async fn with_fetch_context<Fut, T>(context: FetchContext, fut: Fut) -> T
where
    Fut: Future<Output = T>,
{
    ACTIVE_FETCH_CONTEXT.scope(context, fut).await
}

tokio::task_local! {
    static ACTIVE_FETCH_CONTEXT: FetchContext;
}
