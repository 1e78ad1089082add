use std::sync::Arc;
use std::time::Duration;

use cirrus_config::ClientProfile;
use cirrus_core::{FetchError, RepresentationKind, RepresentationSet};
use cirrus_request::{FetchOutcome, FetchPhase, FileRequest, RequestError};
use cirrus_test_support::fixtures::{file_with_representations, sample_file};
use cirrus_test_support::{MemoryCache, ScriptedExecutor};
use tokio::sync::{Notify, mpsc};

#[tokio::test]
async fn single_fetch_delivers_once_with_prepared_request() -> anyhow::Result<()> {
    let executor = Arc::new(ScriptedExecutor::new().with_outcome(Ok(sample_file("42"))));
    let mut request = FileRequest::new("42");
    request
        .add_representation_options(RepresentationKind::Pdf)
        .set_not_matching_etags(["0"]);

    let submission = request.perform(Arc::clone(&executor) as _)?;
    let mut phases = submission.phases();
    let delivery = submission.completed().await;

    assert_eq!(delivery.value, Ok(sample_file("42")));
    assert_eq!(*phases.borrow_and_update(), FetchPhase::Completed);
    let requests = executor.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/2.0/files/42");
    assert_eq!(requests[0].header("X-Rep-Hints"), Some("[pdf]"));
    assert_eq!(requests[0].header("If-None-Match"), Some("\"0\""));
    Ok(())
}

#[tokio::test]
async fn executor_failures_pass_through_unchanged() -> anyhow::Result<()> {
    let failure = FetchError::TrashStateMismatch {
        file_id: "42".to_string(),
        requested_trashed: true,
    };
    let executor = Arc::new(ScriptedExecutor::new().with_outcome(Err(failure.clone())));

    let submission = FileRequest::with_trashed("42", true).perform(Arc::clone(&executor) as _)?;
    let phases = submission.phases();
    let delivery = submission.completed().await;

    assert_eq!(delivery.value, Err(RequestError::Fetch(failure)));
    assert_eq!(*phases.borrow(), FetchPhase::Failed);
    assert_eq!(executor.requests().await[0].path, "/2.0/files/42/trash");
    Ok(())
}

#[tokio::test]
async fn single_callback_fires_exactly_once() -> anyhow::Result<()> {
    let executor = Arc::new(ScriptedExecutor::new().with_outcome(Err(FetchError::Unauthorized)));
    let (tx, mut rx) = mpsc::unbounded_channel();

    let handle = FileRequest::new("1")
        .perform(Arc::clone(&executor) as _)?
        .deliver(move |delivery| {
            let _ = tx.send(delivery.value);
        });
    handle.await?;

    assert_eq!(
        rx.recv().await,
        Some(Err(RequestError::Fetch(FetchError::Unauthorized)))
    );
    assert_eq!(rx.recv().await, None);
    Ok(())
}

#[tokio::test]
async fn partial_background_configuration_is_rejected_before_any_call() {
    let executor = Arc::new(ScriptedExecutor::new().with_outcome(Ok(sample_file("1"))));
    let cache = Arc::new(MemoryCache::new().with_entry(sample_file("1")));

    let mut request = FileRequest::new("1");
    request.set_associate_id("assoc-1");
    let rejected = request.clone().perform(Arc::clone(&executor) as _);
    assert!(matches!(
        rejected,
        Err(RequestError::IncompleteBackgroundTransfer {
            missing: "request_directory_path"
        })
    ));

    let rejected = request.perform_with_cached(Arc::clone(&executor) as _, Arc::clone(&cache) as _);
    assert!(matches!(
        rejected,
        Err(RequestError::IncompleteBackgroundTransfer { .. })
    ));

    assert_eq!(executor.calls().await, 0);
    assert!(cache.lookups().await.is_empty());
}

#[tokio::test]
async fn invalid_profile_is_rejected_before_any_call() {
    let executor = Arc::new(ScriptedExecutor::new().with_outcome(Ok(sample_file("3"))));
    let cache = Arc::new(MemoryCache::new().with_entry(sample_file("3")));
    let mut profile = ClientProfile::default();
    profile
        .hints
        .preference
        .retain(|kind| *kind != RepresentationKind::Jpg);

    let mut request = FileRequest::new("3").with_profile(Arc::new(profile));
    request.add_representation_options([RepresentationKind::Pdf, RepresentationKind::Jpg]);
    let rejected = request.clone().perform(Arc::clone(&executor) as _);
    assert!(matches!(
        rejected,
        Err(RequestError::InvalidProfile { ref field, .. }) if field == "hints.preference"
    ));

    let rejected = request.perform_with_cached(Arc::clone(&executor) as _, Arc::clone(&cache) as _);
    assert!(rejected.is_err_and(|err| err.is_configuration()));

    assert_eq!(executor.calls().await, 0);
    assert!(cache.lookups().await.is_empty());
}

#[tokio::test]
async fn background_fetch_exposes_associate_id_to_executor() -> anyhow::Result<()> {
    let executor = Arc::new(ScriptedExecutor::new().with_outcome(Ok(sample_file("9"))));
    let dir = std::env::temp_dir().join("cirrus-payloads");

    let mut request = FileRequest::new("9");
    request
        .set_associate_id("assoc-9")
        .set_request_directory_path(&dir);
    let delivery = request.perform(Arc::clone(&executor) as _)?.completed().await;
    assert!(delivery.value.is_ok());

    let requests = executor.requests().await;
    let background = requests[0].background.clone();
    assert_eq!(
        background.map(|transfer| (transfer.associate_id, transfer.directory)),
        Some(("assoc-9".to_string(), dir))
    );
    let contexts = executor.observed_contexts().await;
    let context = contexts[0].clone().ok_or_else(|| anyhow::anyhow!("no fetch context"))?;
    assert_eq!(&*context.file_id, "9");
    assert_eq!(context.associate_id.as_deref(), Some("assoc-9"));
    Ok(())
}

#[tokio::test]
async fn matching_mode_sends_single_best_hint() -> anyhow::Result<()> {
    let executor = Arc::new(ScriptedExecutor::new().with_outcome(Ok(file_with_representations(
        "5",
        &["jpg?dimensions=2048x2048"],
    ))));
    let mut request = FileRequest::new("5");
    request
        .add_representation_options([
            RepresentationKind::Pdf,
            RepresentationKind::Jpg,
            RepresentationKind::Thumbnail,
        ])
        .set_match_supported_representation(true)
        .set_supported_representations(RepresentationSet::from([
            RepresentationKind::Thumbnail,
            RepresentationKind::Jpg,
        ]));

    let delivery = request.perform(Arc::clone(&executor) as _)?.completed().await;
    assert!(delivery.value.is_ok());
    assert_eq!(
        executor.requests().await[0].header("X-Rep-Hints"),
        Some("[jpg?dimensions=2048x2048]")
    );
    Ok(())
}

#[tokio::test]
async fn unsupported_selection_still_returns_metadata() -> anyhow::Result<()> {
    let executor = Arc::new(ScriptedExecutor::new().with_outcome(Ok(sample_file("6"))));
    let mut request = FileRequest::new("6");
    request
        .add_representation_options([RepresentationKind::Mp4, RepresentationKind::Dicom])
        .set_match_supported_representation(true)
        .set_supported_representations(RepresentationSet::from([RepresentationKind::Pdf]));
    assert_eq!(request.format_representation_header(), "");

    let delivery = request.perform(Arc::clone(&executor) as _)?.completed().await;
    let file = delivery.value?;
    assert!(file.representations.is_empty());
    let sent = &executor.requests().await[0];
    assert!(sent.header("X-Rep-Hints").is_none());
    assert!(sent.query_param("fields").is_none());
    Ok(())
}

#[tokio::test]
async fn empty_cache_delivers_refresh_only() -> anyhow::Result<()> {
    let executor = Arc::new(ScriptedExecutor::new().with_outcome(Ok(sample_file("7"))));
    let cache = Arc::new(MemoryCache::new());

    let mut submission =
        FileRequest::new("7").perform_with_cached(Arc::clone(&executor) as _, Arc::clone(&cache) as _)?;

    match submission.next_outcome().await {
        Some(FetchOutcome::Refreshed(delivery)) => assert_eq!(delivery.value, Ok(sample_file("7"))),
        other => panic!("expected refresh first, got {other:?}"),
    }
    assert!(submission.next_outcome().await.is_none());
    assert_eq!(submission.phase(), FetchPhase::Completed);
    assert_eq!(cache.lookups().await, vec!["7".to_string()]);
    assert_eq!(cache.entry("7").await, Some(sample_file("7")));
    Ok(())
}

#[tokio::test]
async fn populated_cache_and_failed_refresh_deliver_both() -> anyhow::Result<()> {
    let mut stale = sample_file("8");
    stale.etag = Some("old".to_string());
    let failure = FetchError::Transport {
        message: "connection reset".to_string(),
    };
    let executor = Arc::new(ScriptedExecutor::new().with_outcome(Err(failure.clone())));
    let cache = Arc::new(MemoryCache::new().with_entry(stale.clone()));

    let mut submission =
        FileRequest::new("8").perform_with_cached(Arc::clone(&executor) as _, Arc::clone(&cache) as _)?;

    let cached_at = match submission.next_outcome().await {
        Some(FetchOutcome::Cached(delivery)) => {
            assert_eq!(delivery.value, stale);
            delivery.delivered_at
        }
        other => panic!("expected cached delivery, got {other:?}"),
    };
    match submission.next_outcome().await {
        Some(FetchOutcome::Refreshed(delivery)) => {
            assert_eq!(delivery.value, Err(RequestError::Fetch(failure.clone())));
            assert!(delivery.delivered_at >= cached_at);
        }
        other => panic!("expected refresh delivery, got {other:?}"),
    }
    assert!(submission.next_outcome().await.is_none());
    assert_eq!(submission.phase(), FetchPhase::Failed);

    let updates = cache.updates().await;
    assert_eq!(updates, vec![("8".to_string(), Err(failure))]);
    assert_eq!(cache.entry("8").await, Some(stale));
    Ok(())
}

#[tokio::test]
async fn cached_object_arrives_while_fetch_is_in_flight() -> anyhow::Result<()> {
    let gate = Arc::new(Notify::new());
    let executor = Arc::new(
        ScriptedExecutor::new()
            .with_outcome(Ok(sample_file("3")))
            .with_gate(Arc::clone(&gate)),
    );
    let cache = Arc::new(MemoryCache::new().with_entry(sample_file("3")));

    let mut submission =
        FileRequest::new("3").perform_with_cached(Arc::clone(&executor) as _, Arc::clone(&cache) as _)?;

    let cached = submission.cached().await;
    assert!(cached.is_some());
    assert_eq!(submission.phase(), FetchPhase::CacheDelivered);
    assert!(!submission.phase().is_terminal());

    gate.notify_one();
    let refreshed = submission
        .refreshed()
        .await
        .ok_or_else(|| anyhow::anyhow!("refresh missing"))?;
    assert_eq!(refreshed.value, Ok(sample_file("3")));
    Ok(())
}

#[tokio::test]
async fn slow_cache_still_precedes_refresh() -> anyhow::Result<()> {
    let executor = Arc::new(ScriptedExecutor::new().with_outcome(Ok(sample_file("4"))));
    let cache = Arc::new(
        MemoryCache::new()
            .with_entry(sample_file("4"))
            .with_lookup_delay(Duration::from_millis(50)),
    );
    let (tx, mut rx) = mpsc::unbounded_channel();
    let cached_tx = tx.clone();

    let handle = FileRequest::new("4")
        .perform_with_cached(Arc::clone(&executor) as _, Arc::clone(&cache) as _)?
        .deliver(
            move |_| {
                let _ = cached_tx.send("cached");
            },
            move |_| {
                let _ = tx.send("refreshed");
            },
        );
    handle.await?;

    assert_eq!(rx.recv().await, Some("cached"));
    assert_eq!(rx.recv().await, Some("refreshed"));
    assert_eq!(rx.recv().await, None);
    Ok(())
}

#[tokio::test]
async fn unavailable_cache_never_fails_the_fetch() -> anyhow::Result<()> {
    let executor = Arc::new(ScriptedExecutor::new().with_outcome(Ok(sample_file("2"))));
    let cache = Arc::new(MemoryCache::new().with_entry(sample_file("2")).unavailable());

    let mut submission =
        FileRequest::new("2").perform_with_cached(Arc::clone(&executor) as _, Arc::clone(&cache) as _)?;

    match submission.next_outcome().await {
        Some(FetchOutcome::Refreshed(delivery)) => assert!(delivery.value.is_ok()),
        other => panic!("expected refresh only, got {other:?}"),
    }
    assert_eq!(cache.updates().await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn options_accumulate_across_calls() -> anyhow::Result<()> {
    let executor = Arc::new(ScriptedExecutor::new().with_outcome(Ok(sample_file("11"))));
    let mut request = FileRequest::new("11");
    request
        .add_representation_options(RepresentationKind::Thumbnail)
        .add_representation_options(RepresentationKind::ExtractedText);
    assert_eq!(
        request.representation_options(),
        RepresentationSet::from([
            RepresentationKind::Thumbnail,
            RepresentationKind::ExtractedText
        ])
    );

    let delivery = request.perform(Arc::clone(&executor) as _)?.completed().await;
    assert!(delivery.value.is_ok());
    assert_eq!(
        executor.requests().await[0].header("X-Rep-Hints"),
        Some("[jpg?dimensions=320x320][extracted_text]")
    );
    Ok(())
}
