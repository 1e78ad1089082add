//! Scripted collaborators for execution tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use cirrus_core::{FetchError, FetchResult, FileCache, FileObject, PreparedRequest, RequestExecutor};
use cirrus_telemetry::{FetchContext, current_fetch_context};
use tokio::sync::{Mutex, Notify};

/// Executor that replays queued outcomes and records every request it receives.
///
/// Once the queue is drained every call fails with a `500` status.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    outcomes: Mutex<VecDeque<FetchResult<FileObject>>>,
    requests: Mutex<Vec<PreparedRequest>>,
    contexts: Mutex<Vec<Option<FetchContext>>>,
    delay: Option<Duration>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedExecutor {
    /// Executor with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `outcome` behind the already scripted ones.
    #[must_use]
    pub fn with_outcome(mut self, outcome: FetchResult<FileObject>) -> Self {
        self.outcomes.get_mut().push_back(outcome);
        self
    }

    /// Sleep for `delay` before answering each call.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Hold every call until `gate` is notified.
    #[must_use]
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Requests received so far, in call order.
    pub async fn requests(&self) -> Vec<PreparedRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of calls received so far.
    pub async fn calls(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// Fetch context active on the calling task for each call.
    pub async fn observed_contexts(&self) -> Vec<Option<FetchContext>> {
        self.contexts.lock().await.clone()
    }
}

#[async_trait]
impl RequestExecutor for ScriptedExecutor {
    async fn execute(&self, request: PreparedRequest) -> FetchResult<FileObject> {
        self.requests.lock().await.push(request);
        self.contexts.lock().await.push(current_fetch_context());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| {
                Err(FetchError::Status {
                    status: 500,
                    message: Some("no scripted outcome".to_string()),
                })
            })
    }
}

/// In-memory [`FileCache`] that records lookups and refresh updates.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, FileObject>>,
    lookups: Mutex<Vec<String>>,
    updates: Mutex<Vec<(String, FetchResult<FileObject>)>>,
    lookup_delay: Option<Duration>,
    unavailable: bool,
}

impl MemoryCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the cache with `file`, keyed by its identifier.
    #[must_use]
    pub fn with_entry(mut self, file: FileObject) -> Self {
        self.entries.get_mut().insert(file.id.clone(), file);
        self
    }

    /// Sleep for `delay` before answering each lookup.
    #[must_use]
    pub const fn with_lookup_delay(mut self, delay: Duration) -> Self {
        self.lookup_delay = Some(delay);
        self
    }

    /// Fail every lookup and update with a storage error.
    #[must_use]
    pub const fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Stored entry for `file_id`.
    pub async fn entry(&self, file_id: &str) -> Option<FileObject> {
        self.entries.lock().await.get(file_id).cloned()
    }

    /// Identifiers looked up so far, in call order.
    pub async fn lookups(&self) -> Vec<String> {
        self.lookups.lock().await.clone()
    }

    /// Refresh outcomes reported so far, in call order.
    pub async fn updates(&self) -> Vec<(String, FetchResult<FileObject>)> {
        self.updates.lock().await.clone()
    }
}

#[async_trait]
impl FileCache for MemoryCache {
    async fn fetch(&self, file_id: &str) -> anyhow::Result<Option<FileObject>> {
        self.lookups.lock().await.push(file_id.to_string());
        if let Some(delay) = self.lookup_delay {
            tokio::time::sleep(delay).await;
        }
        if self.unavailable {
            return Err(anyhow!("cache storage unavailable"));
        }
        Ok(self.entries.lock().await.get(file_id).cloned())
    }

    async fn update(&self, file_id: &str, outcome: &FetchResult<FileObject>) -> anyhow::Result<()> {
        self.updates
            .lock()
            .await
            .push((file_id.to_string(), outcome.clone()));
        if self.unavailable {
            return Err(anyhow!("cache storage unavailable"));
        }
        let mut entries = self.entries.lock().await;
        match outcome {
            Ok(file) => {
                entries.insert(file_id.to_string(), file.clone());
            }
            Err(FetchError::NotFound { .. }) => {
                entries.remove(file_id);
            }
            Err(_) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_file;

    fn request(file_id: &str) -> PreparedRequest {
        PreparedRequest {
            file_id: file_id.to_string(),
            path: format!("/2.0/files/{file_id}"),
            query: Vec::new(),
            headers: Vec::new(),
            background: None,
        }
    }

    #[tokio::test]
    async fn scripted_executor_replays_in_order_then_fails() {
        let executor = ScriptedExecutor::new()
            .with_outcome(Ok(sample_file("1")))
            .with_outcome(Err(FetchError::Unauthorized));

        assert!(executor.execute(request("1")).await.is_ok());
        assert_eq!(
            executor.execute(request("1")).await,
            Err(FetchError::Unauthorized)
        );
        assert!(matches!(
            executor.execute(request("1")).await,
            Err(FetchError::Status { status: 500, .. })
        ));
        assert_eq!(executor.calls().await, 3);
        assert_eq!(executor.observed_contexts().await, vec![None, None, None]);
    }

    #[tokio::test]
    async fn memory_cache_applies_refresh_outcomes() -> anyhow::Result<()> {
        let cache = MemoryCache::new().with_entry(sample_file("9"));
        assert!(cache.fetch("9").await?.is_some());

        let mut fresh = sample_file("9");
        fresh.etag = Some("2".to_string());
        cache.update("9", &Ok(fresh.clone())).await?;
        assert_eq!(cache.entry("9").await, Some(fresh));

        cache
            .update("9", &Err(FetchError::Transport { message: "reset".to_string() }))
            .await?;
        assert!(cache.entry("9").await.is_some());

        cache
            .update("9", &Err(FetchError::NotFound { file_id: "9".to_string() }))
            .await?;
        assert!(cache.entry("9").await.is_none());
        assert_eq!(cache.lookups().await, vec!["9".to_string()]);
        assert_eq!(cache.updates().await.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn unavailable_cache_reports_errors() {
        let cache = MemoryCache::new().with_entry(sample_file("3")).unavailable();
        assert!(cache.fetch("3").await.is_err());
        assert!(cache.update("3", &Ok(sample_file("3"))).await.is_err());
    }
}
