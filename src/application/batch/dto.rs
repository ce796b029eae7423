use crate::domain::interaction::{CheckKind, InteractionError, InteractionStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type BatchId = Uuid;

/// Receives every result of one `enqueue` call, exactly once.
pub type BatchCallback = Box<dyn FnOnce(Vec<StatusCheckResult>) + Send + 'static>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRequest {
    pub subject_id: String,
    pub check: CheckKind,
    pub user_id: Option<String>,
}

impl StatusRequest {
    pub fn new(subject_id: impl Into<String>, check: CheckKind, user_id: Option<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            check,
            user_id,
        }
    }
}

/// A request sitting in the shared queue, tagged with the batch it came from.
#[derive(Debug, Clone)]
pub(crate) struct PendingBatchRequest {
    pub request: StatusRequest,
    pub batch_id: BatchId,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Resolved(InteractionStatus),
    /// The read failed; `fallback` is the safe value to render instead.
    Degraded {
        fallback: InteractionStatus,
        error: InteractionError,
    },
}

impl CheckOutcome {
    pub fn degraded(error: InteractionError) -> Self {
        Self::Degraded {
            fallback: InteractionStatus::default(),
            error,
        }
    }

    /// Status to display whether or not the read succeeded.
    pub fn status(&self) -> InteractionStatus {
        match self {
            Self::Resolved(status) => *status,
            Self::Degraded { fallback, .. } => *fallback,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn into_result(self) -> Result<InteractionStatus, InteractionError> {
        match self {
            Self::Resolved(status) => Ok(status),
            Self::Degraded { error, .. } => Err(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCheckResult {
    pub subject_id: String,
    pub check: CheckKind,
    pub outcome: CheckOutcome,
}
