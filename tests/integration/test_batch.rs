use super::helpers::FakeBackend;
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use voicenote_sync::{
    application::{
        batch::{BatchRequestScheduler, SchedulerConfig},
        feed::{FeedHydrator, FeedItem, SharedItemsTracker},
        toggle::ToggleInteractionController,
    },
    domain::interaction::{InteractionKind, InteractionState, InteractionStatus, InteractionSubject},
    domain::session::Session,
    infrastructure::monitoring::SyncMetrics,
};

fn scheduler(backend: &Arc<FakeBackend>, metrics: &Arc<SyncMetrics>) -> BatchRequestScheduler {
    BatchRequestScheduler::with_metrics(
        backend.clone(),
        SchedulerConfig::new(5, Duration::from_millis(100)),
        metrics.clone(),
    )
}

#[tokio::test]
async fn concurrent_initial_loads_share_one_window() {
    let backend = Arc::new(FakeBackend::new());
    backend.seed(InteractionKind::Like, "note-a", true, 8);
    backend.seed(InteractionKind::Like, "note-b", false, 2);
    backend.seed(InteractionKind::Share, "note-c", true, 1);
    let metrics = Arc::new(SyncMetrics::new());
    let scheduler = scheduler(&backend, &metrics);

    let controllers: Vec<ToggleInteractionController> = [
        InteractionSubject::like("note-a"),
        InteractionSubject::like("note-b"),
        InteractionSubject::share("note-c"),
    ]
    .into_iter()
    .map(|subject| {
        ToggleInteractionController::new(
            subject,
            backend.clone(),
            Session::authenticated("user-1"),
            InteractionStatus::default(),
        )
    })
    .collect();

    join_all(controllers.iter().map(|c| c.initialize_with(&scheduler))).await;

    assert_eq!(controllers[0].state(), InteractionState::seeded(true, 8));
    assert_eq!(controllers[1].state(), InteractionState::seeded(false, 2));
    assert_eq!(controllers[2].state(), InteractionState::seeded(true, 1));
    assert_eq!(backend.read_calls(), 3);
    assert_eq!(metrics.snapshot().batch_windows, 1);
}

#[tokio::test]
async fn failed_reads_keep_feed_values() {
    let backend = Arc::new(FakeBackend::new());
    backend.seed(InteractionKind::Like, "note-ok", true, 30);
    backend.seed(InteractionKind::Share, "note-ok", false, 4);
    backend.fail_reads_for("note-down");
    let metrics = Arc::new(SyncMetrics::new());
    let hydrator = FeedHydrator::new(
        backend.clone(),
        scheduler(&backend, &metrics),
        Session::authenticated("user-1"),
    )
    .with_metrics(metrics.clone());

    let mut down = FeedItem::new("note-down");
    down.likes = InteractionStatus::new(true, 12);
    down.shares = InteractionStatus::new(false, 6);
    let cards = hydrator.load(&[FeedItem::new("note-ok"), down]).await;

    assert_eq!(cards[0].like.state(), InteractionState::seeded(true, 30));
    assert_eq!(cards[0].share.state(), InteractionState::seeded(false, 4));
    assert_eq!(cards[1].like.state(), InteractionState::seeded(true, 12));
    assert_eq!(cards[1].share.state(), InteractionState::seeded(false, 6));

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.degraded_reads, 2);
    assert_eq!(snapshot.initial_load_failures, 2);
}

#[tokio::test]
async fn anonymous_feed_refreshes_counts_but_not_flags() {
    let backend = Arc::new(FakeBackend::new());
    backend.seed(InteractionKind::Like, "note-1", true, 21);
    backend.seed(InteractionKind::Share, "note-1", true, 3);
    let metrics = Arc::new(SyncMetrics::new());
    let hydrator = FeedHydrator::new(
        backend.clone(),
        scheduler(&backend, &metrics),
        Session::anonymous(),
    );

    let cards = hydrator.load(&[FeedItem::new("note-1")]).await;

    assert_eq!(cards[0].like.state().status(), InteractionStatus::new(false, 21));
    assert_eq!(cards[0].share.state().status(), InteractionStatus::new(false, 3));
    assert_eq!(metrics.snapshot().degraded_reads, 0);
}

#[tokio::test(start_paused = true)]
async fn large_feed_is_split_into_throttled_windows() {
    let backend = Arc::new(FakeBackend::new());
    let metrics = Arc::new(SyncMetrics::new());
    let hydrator = FeedHydrator::new(
        backend.clone(),
        scheduler(&backend, &metrics),
        Session::authenticated("user-1"),
    );
    let items: Vec<FeedItem> = (0..6).map(|i| FeedItem::new(format!("note-{i}"))).collect();

    let started = tokio::time::Instant::now();
    let cards = hydrator.load(&items).await;

    assert_eq!(cards.len(), 6);
    assert_eq!(backend.read_calls(), 12);
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.batch_windows, 3);
    assert_eq!(snapshot.batched_requests, 12);
    assert!(started.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn shared_items_follow_share_toggles() {
    let backend = Arc::new(FakeBackend::new());
    backend.seed(InteractionKind::Share, "note-x", true, 5);
    let metrics = Arc::new(SyncMetrics::new());
    let tracker = Arc::new(SharedItemsTracker::new(["note-x"]));
    let hydrator = FeedHydrator::new(
        backend.clone(),
        scheduler(&backend, &metrics),
        Session::authenticated("user-1"),
    )
    .with_shared_items(tracker.clone());

    let cards = hydrator.load(&[FeedItem::new("note-x")]).await;
    assert!(tracker.contains("note-x"));

    cards[0].share.toggle().await.expect("unshare commits");

    assert!(!tracker.contains("note-x"));
    assert_eq!(cards[0].share.state(), InteractionState::seeded(false, 4));
}
