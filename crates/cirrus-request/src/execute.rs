//! Submission of file requests and delivery of their outcomes.
//!
//! # Design
//! - Submitting validates and prepares synchronously, then spawns one task on the
//!   tokio runtime and returns immediately.
//! - Outcomes travel over oneshot channels so each slot fires at most once.
//! - In cache-then-refresh mode the cache lookup and the live fetch run
//!   concurrently; the refresh outcome is released only after the cache leg has
//!   resolved.
//! - Failures from the executor pass through unchanged; nothing is retried here.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use cirrus_core::{FileCache, FileObject, PreparedRequest, RequestExecutor};
use cirrus_telemetry::{FetchContext, with_fetch_context};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{Instrument, Span, debug, info, info_span, warn};

use crate::error::{RequestError, Result};
use crate::request::FileRequest;

/// Lifecycle of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    /// Created but not yet handed to the executor.
    Configured,
    /// Handed to the executor.
    Submitted,
    /// A cached file object was delivered.
    CacheDelivered,
    /// The live fetch delivered a file object.
    Completed,
    /// The live fetch delivered a failure.
    Failed,
}

impl FetchPhase {
    /// Whether no further transition can happen.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Label used in structured logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configured => "configured",
            Self::Submitted => "submitted",
            Self::CacheDelivered => "cache_delivered",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// Value handed to the caller together with the time it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery<T> {
    /// Delivered value.
    pub value: T,
    /// Moment the value was produced.
    pub delivered_at: DateTime<Utc>,
}

impl<T> Delivery<T> {
    fn now(value: T) -> Self {
        Self {
            value,
            delivered_at: Utc::now(),
        }
    }
}

/// Terminal outcome of a live fetch.
pub type FetchDelivery = Delivery<Result<FileObject>>;

/// One delivery of a cache-then-refresh submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Previously stored file object; possibly stale.
    Cached(Delivery<FileObject>),
    /// Result of the live fetch.
    Refreshed(FetchDelivery),
}

/// Handle to a single-fetch submission.
#[derive(Debug)]
pub struct Submission {
    outcome: oneshot::Receiver<FetchDelivery>,
    phases: watch::Receiver<FetchPhase>,
}

impl Submission {
    /// Latest observed phase.
    #[must_use]
    pub fn phase(&self) -> FetchPhase {
        *self.phases.borrow()
    }

    /// Receiver notified on every phase transition.
    #[must_use]
    pub fn phases(&self) -> watch::Receiver<FetchPhase> {
        self.phases.clone()
    }

    /// Wait for the single terminal outcome.
    pub async fn completed(self) -> FetchDelivery {
        receive(self.outcome).await
    }

    /// Invoke `callback` exactly once with the terminal outcome.
    pub fn deliver<F>(self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(FetchDelivery) + Send + 'static,
    {
        tokio::spawn(async move { callback(self.completed().await) })
    }
}

/// Handle to a cache-then-refresh submission.
#[derive(Debug)]
pub struct CachedSubmission {
    cached: Option<oneshot::Receiver<Option<Delivery<FileObject>>>>,
    refreshed: Option<oneshot::Receiver<FetchDelivery>>,
    phases: watch::Receiver<FetchPhase>,
}

impl CachedSubmission {
    /// Latest observed phase.
    #[must_use]
    pub fn phase(&self) -> FetchPhase {
        *self.phases.borrow()
    }

    /// Receiver notified on every phase transition.
    #[must_use]
    pub fn phases(&self) -> watch::Receiver<FetchPhase> {
        self.phases.clone()
    }

    /// Next delivery: at most one cached object, then exactly one refresh, then `None`.
    pub async fn next_outcome(&mut self) -> Option<FetchOutcome> {
        if let Some(cached) = self.cached.take()
            && let Ok(Some(delivery)) = cached.await
        {
            return Some(FetchOutcome::Cached(delivery));
        }
        let refreshed = self.refreshed.take()?;
        Some(FetchOutcome::Refreshed(receive(refreshed).await))
    }

    /// Wait for the cache leg; `None` on a miss or once already consumed.
    pub async fn cached(&mut self) -> Option<Delivery<FileObject>> {
        let cached = self.cached.take()?;
        cached.await.ok().flatten()
    }

    /// Wait for the refresh outcome; `None` once already consumed through [`Self::next_outcome`].
    pub async fn refreshed(mut self) -> Option<FetchDelivery> {
        let refreshed = self.refreshed.take()?;
        Some(receive(refreshed).await)
    }

    /// Invoke `on_cached` on a cache hit, then `on_refreshed` exactly once.
    pub fn deliver<C, R>(mut self, on_cached: C, on_refreshed: R) -> JoinHandle<()>
    where
        C: FnOnce(Delivery<FileObject>) + Send + 'static,
        R: FnOnce(FetchDelivery) + Send + 'static,
    {
        tokio::spawn(async move {
            if let Some(delivery) = self.cached().await {
                on_cached(delivery);
            }
            if let Some(delivery) = self.refreshed().await {
                on_refreshed(delivery);
            }
        })
    }
}

impl FileRequest {
    /// Submit a single live fetch.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns the configuration errors of [`FileRequest::prepare`]; the executor
    /// is never called in that case.
    pub fn perform(self, executor: Arc<dyn RequestExecutor>) -> Result<Submission> {
        let prepared = self.prepare()?;
        let span = request_span(&prepared, "single");
        let context = fetch_context(&prepared);
        let (phase_tx, phases) = watch::channel(FetchPhase::Configured);
        let (outcome_tx, outcome) = oneshot::channel();

        tokio::spawn(
            async move {
                advance(&phase_tx, FetchPhase::Submitted);
                let result = with_fetch_context(context, executor.execute(prepared)).await;
                let delivery = Delivery::now(result.map_err(RequestError::from));
                finish(&phase_tx, &delivery);
                if outcome_tx.send(delivery).is_err() {
                    debug!("submission dropped before delivery");
                }
            }
            .instrument(span),
        );

        Ok(Submission { outcome, phases })
    }

    /// Submit a live fetch and consult `cache` for an immediate stale delivery.
    ///
    /// The refresh outcome is reported to [`FileCache::update`] before it is
    /// delivered. Cache failures are logged and never fail the fetch. Must be
    /// called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns the configuration errors of [`FileRequest::prepare`]; neither the
    /// cache nor the executor is called in that case.
    pub fn perform_with_cached(
        self,
        executor: Arc<dyn RequestExecutor>,
        cache: Arc<dyn FileCache>,
    ) -> Result<CachedSubmission> {
        let prepared = self.prepare()?;
        let span = request_span(&prepared, "cached");
        let context = fetch_context(&prepared);
        let file_id = prepared.file_id.clone();
        let (phase_tx, phases) = watch::channel(FetchPhase::Configured);
        let (cached_tx, cached) = oneshot::channel();
        let (refreshed_tx, refreshed) = oneshot::channel();

        tokio::spawn(
            async move {
                advance(&phase_tx, FetchPhase::Submitted);
                let cache_leg = async {
                    let hit = lookup(cache.as_ref(), &file_id).await;
                    if hit.is_some() {
                        advance(&phase_tx, FetchPhase::CacheDelivered);
                    }
                    if cached_tx.send(hit.map(Delivery::now)).is_err() {
                        debug!("cache delivery dropped by caller");
                    }
                };
                let fetch_leg = with_fetch_context(context, executor.execute(prepared));
                let ((), result) = tokio::join!(cache_leg, fetch_leg);

                if let Err(err) = cache.update(&file_id, &result).await {
                    warn!(error = %err, "cache update after refresh failed");
                }
                let delivery = Delivery::now(result.map_err(RequestError::from));
                finish(&phase_tx, &delivery);
                if refreshed_tx.send(delivery).is_err() {
                    debug!("submission dropped before refresh delivery");
                }
            }
            .instrument(span),
        );

        Ok(CachedSubmission {
            cached: Some(cached),
            refreshed: Some(refreshed),
            phases,
        })
    }
}

fn request_span(prepared: &PreparedRequest, mode: &'static str) -> Span {
    info_span!(
        "file_request",
        file_id = %prepared.file_id,
        path = %prepared.path,
        mode,
        associate_id = ?prepared
            .background
            .as_ref()
            .map(|transfer| transfer.associate_id.as_str()),
    )
}

fn fetch_context(prepared: &PreparedRequest) -> FetchContext {
    FetchContext::new(
        prepared.file_id.as_str(),
        prepared
            .background
            .as_ref()
            .map(|transfer| transfer.associate_id.as_str()),
    )
}

async fn lookup(cache: &dyn FileCache, file_id: &str) -> Option<FileObject> {
    match cache.fetch(file_id).await {
        Ok(Some(file)) => {
            debug!("cache hit");
            Some(file)
        }
        Ok(None) => {
            debug!("cache miss");
            None
        }
        Err(err) => {
            warn!(error = %err, "cache lookup failed; continuing without cached object");
            None
        }
    }
}

fn advance(phases: &watch::Sender<FetchPhase>, next: FetchPhase) {
    phases.send_modify(|phase| *phase = next);
    debug!(phase = next.as_str(), "file request phase changed");
}

fn finish(phases: &watch::Sender<FetchPhase>, delivery: &FetchDelivery) {
    match &delivery.value {
        Ok(file) => {
            advance(phases, FetchPhase::Completed);
            info!(
                etag = ?file.etag,
                representations = file.representations.len(),
                "file request completed"
            );
        }
        Err(err) => {
            advance(phases, FetchPhase::Failed);
            let kind = match err {
                RequestError::Fetch(source) => source.kind(),
                _ => "request",
            };
            warn!(error = %err, kind, "file request failed");
        }
    }
}

async fn receive(outcome: oneshot::Receiver<FetchDelivery>) -> FetchDelivery {
    outcome
        .await
        .unwrap_or_else(|_| Delivery::now(Err(RequestError::Aborted)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_completed_and_failed_are_terminal() {
        let terminal: Vec<FetchPhase> = [
            FetchPhase::Configured,
            FetchPhase::Submitted,
            FetchPhase::CacheDelivered,
            FetchPhase::Completed,
            FetchPhase::Failed,
        ]
        .into_iter()
        .filter(|phase| phase.is_terminal())
        .collect();
        assert_eq!(terminal, vec![FetchPhase::Completed, FetchPhase::Failed]);
        assert_eq!(FetchPhase::CacheDelivered.as_str(), "cache_delivered");
    }

    #[test]
    fn delivery_is_timestamped() {
        let before = Utc::now();
        let delivery = Delivery::now(7);
        assert!(delivery.delivered_at >= before);
        assert_eq!(delivery.value, 7);
    }

    #[tokio::test]
    async fn dropped_sender_resolves_to_aborted() {
        let (tx, rx) = oneshot::channel::<FetchDelivery>();
        drop(tx);
        assert_eq!(receive(rx).await.value, Err(RequestError::Aborted));
    }
}
