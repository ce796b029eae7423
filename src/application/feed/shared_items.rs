use crate::application::toggle::ChangeListener;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// The viewer's "my shares" list, kept current from share controllers'
/// change notifications instead of re-querying the server.
pub struct SharedItemsTracker {
    items: watch::Sender<Vec<String>>,
}

impl SharedItemsTracker {
    pub fn new<I, S>(initial: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut items: Vec<String> = Vec::new();
        for id in initial.into_iter().map(Into::into) {
            if !items.contains(&id) {
                items.push(id);
            }
        }
        let (items, _) = watch::channel(items);
        Self { items }
    }

    pub fn items(&self) -> Vec<String> {
        self.items.borrow().clone()
    }

    pub fn contains(&self, subject_id: &str) -> bool {
        self.items.borrow().iter().any(|id| id == subject_id)
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<String>> {
        self.items.subscribe()
    }

    /// Records the latest shared flag for `subject_id`.
    pub fn apply(&self, subject_id: &str, shared: bool) {
        let changed = self.items.send_if_modified(|items| {
            let position = items.iter().position(|id| id == subject_id);
            match (shared, position) {
                (true, None) => {
                    items.push(subject_id.to_string());
                    true
                }
                (false, Some(index)) => {
                    items.remove(index);
                    true
                }
                _ => false,
            }
        });
        if changed {
            debug!(subject_id, shared, "shared items updated");
        }
    }

    /// Listener to attach to the share controller of `subject_id`.
    pub fn listener_for(self: &Arc<Self>, subject_id: impl Into<String>) -> ChangeListener {
        let tracker = Arc::clone(self);
        let subject_id = subject_id.into();
        Arc::new(move |active, _count| tracker.apply(&subject_id, active))
    }
}
