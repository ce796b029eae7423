use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum InteractionError {
    #[error("Unauthenticated")]
    Unauthenticated,
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("Transient error: {0}")]
    Transient(String),
    #[error("Degraded read: {0}")]
    Degraded(String),
}

impl InteractionError {
    /// Whether the user can simply try the same action again.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Unauthenticated)
    }

    /// Message shown in the transient notification for a failed toggle.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "Please sign in to continue",
            Self::RateLimited => "You're doing that too fast. Please wait a moment",
            Self::Transient(_) | Self::Degraded(_) => "Something went wrong. Please try again",
        }
    }
}
