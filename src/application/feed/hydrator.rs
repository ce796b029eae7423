use super::shared_items::SharedItemsTracker;
use crate::application::batch::BatchRequestScheduler;
use crate::application::toggle::{InteractionNotifier, ToggleInteractionController};
use crate::domain::interaction::{
    InteractionError, InteractionKind, InteractionStatus, InteractionSubject,
    RemoteInteractionService,
};
use crate::domain::session::Session;
use crate::infrastructure::monitoring::metrics::SyncMetrics;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// A note as it arrives from the list query, with the counts it carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub subject_id: String,
    pub likes: InteractionStatus,
    pub shares: InteractionStatus,
}

impl FeedItem {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            likes: InteractionStatus::default(),
            shares: InteractionStatus::default(),
        }
    }
}

/// Controllers backing one rendered card.
#[derive(Clone)]
pub struct FeedCard {
    pub subject_id: String,
    pub like: Arc<ToggleInteractionController>,
    pub share: Arc<ToggleInteractionController>,
}

impl FeedCard {
    pub fn controllers(&self) -> [&Arc<ToggleInteractionController>; 2] {
        [&self.like, &self.share]
    }

    pub fn teardown(&self) {
        self.like.teardown();
        self.share.teardown();
    }
}

/// Builds controllers for a page of notes and loads their initial status
/// through the shared scheduler as one batch.
pub struct FeedHydrator {
    service: Arc<dyn RemoteInteractionService>,
    scheduler: BatchRequestScheduler,
    session: Session,
    notifier: Option<Arc<dyn InteractionNotifier>>,
    metrics: Option<Arc<SyncMetrics>>,
    shared_items: Option<Arc<SharedItemsTracker>>,
}

impl FeedHydrator {
    pub fn new(
        service: Arc<dyn RemoteInteractionService>,
        scheduler: BatchRequestScheduler,
        session: Session,
    ) -> Self {
        Self {
            service,
            scheduler,
            session,
            notifier: None,
            metrics: None,
            shared_items: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn InteractionNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<SyncMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_shared_items(mut self, tracker: Arc<SharedItemsTracker>) -> Self {
        self.shared_items = Some(tracker);
        self
    }

    pub fn build_cards(&self, items: &[FeedItem]) -> Vec<FeedCard> {
        items
            .iter()
            .map(|item| FeedCard {
                subject_id: item.subject_id.clone(),
                like: Arc::new(
                    self.controller(InteractionSubject::like(&item.subject_id), item.likes),
                ),
                share: Arc::new(
                    self.controller(InteractionSubject::share(&item.subject_id), item.shares),
                ),
            })
            .collect()
    }

    /// Loads authoritative status for every controller on the cards.
    /// Failed reads leave that controller on its seed values.
    pub async fn hydrate(&self, cards: &[FeedCard]) {
        let controllers: Vec<&Arc<ToggleInteractionController>> =
            cards.iter().flat_map(FeedCard::controllers).collect();
        if controllers.is_empty() {
            return;
        }

        let tickets: Vec<_> = controllers.iter().map(|c| c.begin_loading()).collect();
        let requests = controllers.iter().map(|c| c.status_request()).collect();
        debug!(cards = cards.len(), requests = controllers.len(), "hydrating feed");

        let mut results = self.scheduler.check(requests).await.into_iter();
        let mut degraded = 0usize;
        for (controller, ticket) in controllers.into_iter().zip(tickets) {
            let result = match results.next() {
                Some(result) => result.outcome.into_result(),
                None => Err(InteractionError::Degraded(
                    "no status returned for request".to_string(),
                )),
            };
            if result.is_err() {
                degraded += 1;
            }
            controller.apply_initial_status(ticket, result);
        }
        info!(cards = cards.len(), degraded, "feed hydrated");
    }

    pub async fn load(&self, items: &[FeedItem]) -> Vec<FeedCard> {
        let cards = self.build_cards(items);
        self.hydrate(&cards).await;
        cards
    }

    fn controller(
        &self,
        subject: InteractionSubject,
        seed: InteractionStatus,
    ) -> ToggleInteractionController {
        let mut controller = ToggleInteractionController::new(
            subject.clone(),
            self.service.clone(),
            self.session.clone(),
            seed,
        );
        if let Some(notifier) = &self.notifier {
            controller = controller.with_notifier(notifier.clone());
        }
        if let Some(metrics) = &self.metrics {
            controller = controller.with_metrics(metrics.clone());
        }
        if let (Some(tracker), InteractionKind::Share) = (&self.shared_items, subject.kind) {
            controller = controller.with_listener(tracker.listener_for(subject.subject_id));
        }
        controller
    }
}
