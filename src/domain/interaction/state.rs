use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Authoritative `{active, count}` pair as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InteractionStatus {
    pub active: bool,
    pub count: u64,
}

impl InteractionStatus {
    pub fn new(active: bool, count: u64) -> Self {
        Self { active, count }
    }

    /// Builds a status from a raw server count, clamping anything below zero.
    pub fn from_server(active: bool, count: i64) -> Self {
        Self {
            active,
            count: u64::try_from(count).unwrap_or(0),
        }
    }
}

/// Pre-toggle values kept for rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleSnapshot {
    pub active: bool,
    pub count: u64,
}

/// Observable per-subject state rendered by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InteractionState {
    pub active: bool,
    pub count: u64,
    pub is_loading: bool,
    pub is_processing: bool,
}

impl InteractionState {
    pub fn seeded(active: bool, count: u64) -> Self {
        Self {
            active,
            count,
            is_loading: false,
            is_processing: false,
        }
    }

    pub fn status(&self) -> InteractionStatus {
        InteractionStatus::new(self.active, self.count)
    }

    /// Applies the optimistic flip and marks the toggle in flight.
    ///
    /// Returns `None` without touching anything when a toggle is already
    /// in flight.
    pub fn begin_toggle(&mut self) -> Option<ToggleSnapshot> {
        if self.is_processing {
            return None;
        }
        let snapshot = ToggleSnapshot {
            active: self.active,
            count: self.count,
        };
        self.active = !snapshot.active;
        self.count = if snapshot.active {
            snapshot.count.saturating_sub(1)
        } else {
            snapshot.count.saturating_add(1)
        };
        self.is_processing = true;
        Some(snapshot)
    }

    /// Server wins: the optimistic guess is discarded, never merged.
    pub fn commit(&mut self, status: InteractionStatus) {
        self.active = status.active;
        self.count = status.count;
        self.is_processing = false;
    }

    pub fn rollback(&mut self, snapshot: ToggleSnapshot) {
        self.active = snapshot.active;
        self.count = snapshot.count;
        self.is_processing = false;
    }

    pub fn phase(&self) -> ControllerPhase {
        if self.is_processing {
            ControllerPhase::Processing
        } else if self.is_loading {
            ControllerPhase::Loading
        } else {
            ControllerPhase::Idle
        }
    }
}

/// Lifecycle of a toggle controller. `Processing` always returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ControllerPhase {
    Uninitialized,
    Loading,
    Idle,
    Processing,
}
