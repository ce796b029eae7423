use crate::domain::interaction::{InteractionError, InteractionSubject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum NoticeKind {
    Unauthenticated,
    RateLimited,
    Failed,
}

/// Short-lived, dismissable message raised when a toggle could not be applied.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Notice {
    pub subject: InteractionSubject,
    pub kind: NoticeKind,
    pub message: String,
    pub issued_at: DateTime<Utc>,
}

impl Notice {
    pub fn from_error(subject: InteractionSubject, err: &InteractionError) -> Self {
        let kind = match err {
            InteractionError::Unauthenticated => NoticeKind::Unauthenticated,
            InteractionError::RateLimited => NoticeKind::RateLimited,
            InteractionError::Transient(_) | InteractionError::Degraded(_) => NoticeKind::Failed,
        };
        Self {
            subject,
            kind,
            message: err.user_message().to_string(),
            issued_at: Utc::now(),
        }
    }
}

/// Sink for toggle failure notices (a toast in the mobile client).
pub trait InteractionNotifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
