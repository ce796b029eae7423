use super::notice::{InteractionNotifier, Notice};
use crate::application::batch::{BatchRequestScheduler, StatusRequest};
use crate::domain::interaction::{
    CheckKind, ControllerPhase, InteractionError, InteractionState, InteractionStatus,
    InteractionSubject, RemoteInteractionService, ToggleSnapshot,
};
use crate::domain::session::Session;
use crate::infrastructure::monitoring::metrics::SyncMetrics;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Called with `(active, count)` after every visible state change.
pub type ChangeListener = Arc<dyn Fn(bool, u64) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The server accepted the toggle; state now mirrors its response.
    Committed(InteractionStatus),
    /// Another toggle was already in flight, nothing was sent.
    Skipped,
    /// The controller was torn down before the response arrived.
    Discarded,
}

/// Identifies one initial-status load so late answers can be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    epoch: u64,
    seq: u64,
    check: CheckKind,
}

impl LoadTicket {
    pub fn check(&self) -> CheckKind {
        self.check
    }
}

/// Keeps one subject's like or share state in step with the server while
/// answering taps immediately.
pub struct ToggleInteractionController {
    subject: InteractionSubject,
    service: Arc<dyn RemoteInteractionService>,
    session: Session,
    state: watch::Sender<InteractionState>,
    epoch: AtomicU64,
    load_seq: AtomicU64,
    initialized: AtomicBool,
    listener: Option<ChangeListener>,
    notifier: Option<Arc<dyn InteractionNotifier>>,
    metrics: Option<Arc<SyncMetrics>>,
}

impl ToggleInteractionController {
    /// Seeds state synchronously so the first render already shows the
    /// values the caller had on hand.
    pub fn new(
        subject: InteractionSubject,
        service: Arc<dyn RemoteInteractionService>,
        session: Session,
        seed: InteractionStatus,
    ) -> Self {
        let (state, _) = watch::channel(InteractionState::seeded(seed.active, seed.count));
        Self {
            subject,
            service,
            session,
            state,
            epoch: AtomicU64::new(0),
            load_seq: AtomicU64::new(0),
            initialized: AtomicBool::new(false),
            listener: None,
            notifier: None,
            metrics: None,
        }
    }

    pub fn with_listener(mut self, listener: ChangeListener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn InteractionNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<SyncMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn subject(&self) -> &InteractionSubject {
        &self.subject
    }

    pub fn state(&self) -> InteractionState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<InteractionState> {
        self.state.subscribe()
    }

    pub fn phase(&self) -> ControllerPhase {
        let state = self.state();
        if !state.is_processing && !self.initialized.load(Ordering::Acquire) {
            return ControllerPhase::Uninitialized;
        }
        state.phase()
    }

    /// Stops any in-flight work from touching this controller again.
    pub fn teardown(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        debug!(subject = %self.subject, "controller torn down");
    }

    /// Read used for the first load: full status for a signed-in viewer,
    /// count only otherwise.
    pub fn initial_check(&self) -> CheckKind {
        if self.session.is_authenticated() {
            self.subject.kind.status_check()
        } else {
            self.subject.kind.count_check()
        }
    }

    pub fn status_request(&self) -> StatusRequest {
        StatusRequest {
            subject_id: self.subject.subject_id.clone(),
            check: self.initial_check(),
            user_id: self.session.user_id().map(str::to_string),
        }
    }

    /// Fetches authoritative status directly from the service.
    pub async fn initialize(&self) {
        let ticket = self.begin_loading();
        let result = ticket
            .check
            .run(
                self.service.as_ref(),
                &self.subject.subject_id,
                self.session.user_id(),
            )
            .await;
        self.apply_initial_status(ticket, result);
    }

    /// Fetches authoritative status through the shared batch scheduler.
    pub async fn initialize_with(&self, scheduler: &BatchRequestScheduler) {
        let ticket = self.begin_loading();
        let result = scheduler
            .check(vec![self.status_request()])
            .await
            .pop()
            .map(|result| result.outcome.into_result())
            .unwrap_or_else(|| {
                Err(InteractionError::Degraded(
                    "scheduler returned no result".to_string(),
                ))
            });
        self.apply_initial_status(ticket, result);
    }

    /// Marks the controller as loading and hands out the ticket the eventual
    /// result must present.
    pub fn begin_loading(&self) -> LoadTicket {
        self.initialized.store(true, Ordering::Release);
        let ticket = LoadTicket {
            epoch: self.epoch.load(Ordering::Acquire),
            seq: self.load_seq.fetch_add(1, Ordering::AcqRel) + 1,
            check: self.initial_check(),
        };
        self.state.send_if_modified(|state| {
            let changed = !state.is_loading;
            state.is_loading = true;
            changed
        });
        ticket
    }

    /// Applies an initial-status answer. Failures keep the seed values.
    pub fn apply_initial_status(
        &self,
        ticket: LoadTicket,
        result: Result<InteractionStatus, InteractionError>,
    ) {
        if ticket.epoch != self.epoch.load(Ordering::Acquire)
            || ticket.seq != self.load_seq.load(Ordering::Acquire)
        {
            debug!(subject = %self.subject, "dropping stale initial status");
            return;
        }

        let status = match result {
            Ok(status) => Some(status),
            Err(err) => {
                warn!(subject = %self.subject, error = %err, "initial status load failed, keeping seed values");
                if let Some(metrics) = &self.metrics {
                    metrics.record_initial_load_failed();
                }
                None
            }
        };

        let mut visible_change = false;
        self.state.send_if_modified(|state| {
            let before = *state;
            state.is_loading = false;
            // A toggle in flight reconciles with the server on its own.
            if let (Some(status), false) = (status, state.is_processing) {
                if ticket.check.requires_user() {
                    state.active = status.active;
                }
                state.count = status.count;
            }
            visible_change = before.status() != state.status();
            before != *state
        });

        if visible_change {
            self.emit_change();
        }
    }

    /// Flips the interaction optimistically, then reconciles with the
    /// server or rolls back.
    pub async fn toggle(&self) -> Result<ToggleOutcome, InteractionError> {
        if !self.session.is_authenticated() {
            let err = InteractionError::Unauthenticated;
            warn!(subject = %self.subject, "toggle refused without a signed-in user");
            self.raise(&err);
            return Err(err);
        }

        let epoch = self.epoch.load(Ordering::Acquire);
        let mut snapshot = None;
        self.state.send_if_modified(|state| {
            snapshot = state.begin_toggle();
            snapshot.is_some()
        });
        let Some(snapshot) = snapshot else {
            debug!(subject = %self.subject, "toggle already in flight, ignoring tap");
            if let Some(metrics) = &self.metrics {
                metrics.record_toggle_skipped();
            }
            return Ok(ToggleOutcome::Skipped);
        };
        self.emit_change();

        let mut pending = PendingToggle {
            controller: self,
            snapshot,
            epoch,
            settled: false,
        };

        let result = self
            .subject
            .kind
            .toggle_via(self.service.as_ref(), &self.subject.subject_id)
            .await;
        pending.settled = true;

        if epoch != self.epoch.load(Ordering::Acquire) {
            debug!(subject = %self.subject, "discarding toggle response for torn-down controller");
            return result.map(|_| ToggleOutcome::Discarded);
        }

        match result {
            Ok(status) => {
                self.state.send_modify(|state| state.commit(status));
                self.emit_change();
                if let Some(metrics) = &self.metrics {
                    metrics.record_toggle_committed();
                }
                info!(
                    subject = %self.subject,
                    active = status.active,
                    count = status.count,
                    "toggle committed"
                );
                Ok(ToggleOutcome::Committed(status))
            }
            Err(err) => {
                self.state.send_modify(|state| state.rollback(snapshot));
                self.emit_change();
                if let Some(metrics) = &self.metrics {
                    metrics.record_toggle_rolled_back();
                }
                warn!(subject = %self.subject, error = %err, "toggle failed, rolled back");
                self.raise(&err);
                Err(err)
            }
        }
    }

    fn emit_change(&self) {
        if let Some(listener) = &self.listener {
            let state = self.state();
            listener(state.active, state.count);
        }
    }

    fn raise(&self, err: &InteractionError) {
        if let Some(notifier) = &self.notifier {
            notifier.notify(Notice::from_error(self.subject.clone(), err));
        }
    }
}

/// Restores the snapshot if the toggle future is dropped before the
/// response is handled.
struct PendingToggle<'a> {
    controller: &'a ToggleInteractionController,
    snapshot: ToggleSnapshot,
    epoch: u64,
    settled: bool,
}

impl Drop for PendingToggle<'_> {
    fn drop(&mut self) {
        if self.settled || self.epoch != self.controller.epoch.load(Ordering::Acquire) {
            return;
        }
        debug!(subject = %self.controller.subject, "toggle abandoned mid-flight, rolling back");
        let snapshot = self.snapshot;
        self.controller
            .state
            .send_modify(|state| state.rollback(snapshot));
        self.controller.emit_change();
    }
}
