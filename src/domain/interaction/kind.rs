use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// The two togglable interactions a viewer can have with a voice note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum InteractionKind {
    Like,
    Share,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Share => "share",
        }
    }

    /// Status read that returns both the viewer flag and the aggregate count.
    pub fn status_check(&self) -> CheckKind {
        match self {
            Self::Like => CheckKind::LikeStatus,
            Self::Share => CheckKind::ShareStatus,
        }
    }

    /// Count-only read, usable without a signed-in viewer.
    pub fn count_check(&self) -> CheckKind {
        match self {
            Self::Like => CheckKind::LikeCount,
            Self::Share => CheckKind::ShareCount,
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A voice note paired with the interaction being tracked on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InteractionSubject {
    pub subject_id: String,
    pub kind: InteractionKind,
}

impl InteractionSubject {
    pub fn new(subject_id: impl Into<String>, kind: InteractionKind) -> Self {
        Self {
            subject_id: subject_id.into(),
            kind,
        }
    }

    pub fn like(subject_id: impl Into<String>) -> Self {
        Self::new(subject_id, InteractionKind::Like)
    }

    pub fn share(subject_id: impl Into<String>) -> Self {
        Self::new(subject_id, InteractionKind::Share)
    }
}

impl fmt::Display for InteractionSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.subject_id)
    }
}

/// Individual status read the batch scheduler knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CheckKind {
    LikeStatus,
    LikeCount,
    ShareStatus,
    ShareCount,
}

impl CheckKind {
    pub fn interaction(&self) -> InteractionKind {
        match self {
            Self::LikeStatus | Self::LikeCount => InteractionKind::Like,
            Self::ShareStatus | Self::ShareCount => InteractionKind::Share,
        }
    }

    /// Whether the read needs the viewer's user id.
    pub fn requires_user(&self) -> bool {
        matches!(self, Self::LikeStatus | Self::ShareStatus)
    }
}
