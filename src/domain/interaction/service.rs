use super::{
    errors::InteractionError,
    kind::{CheckKind, InteractionKind},
    state::InteractionStatus,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub liked: bool,
    pub like_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareStatus {
    pub shared: bool,
    pub share_count: i64,
}

impl From<LikeStatus> for InteractionStatus {
    fn from(status: LikeStatus) -> Self {
        InteractionStatus::from_server(status.liked, status.like_count)
    }
}

impl From<ShareStatus> for InteractionStatus {
    fn from(status: ShareStatus) -> Self {
        InteractionStatus::from_server(status.shared, status.share_count)
    }
}

/// Remote store holding likes and shares for voice notes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteInteractionService: Send + Sync {
    async fn get_like_status(
        &self,
        subject_id: &str,
        user_id: &str,
    ) -> Result<LikeStatus, InteractionError>;
    async fn toggle_like(&self, subject_id: &str) -> Result<LikeStatus, InteractionError>;
    async fn get_share_status(
        &self,
        subject_id: &str,
        user_id: &str,
    ) -> Result<ShareStatus, InteractionError>;
    async fn toggle_share(&self, subject_id: &str) -> Result<ShareStatus, InteractionError>;
    async fn get_like_count(&self, subject_id: &str) -> Result<i64, InteractionError>;
    async fn get_share_count(&self, subject_id: &str) -> Result<i64, InteractionError>;
}

impl InteractionKind {
    /// Runs the toggle endpoint for this kind and normalizes the response.
    pub async fn toggle_via(
        &self,
        service: &dyn RemoteInteractionService,
        subject_id: &str,
    ) -> Result<InteractionStatus, InteractionError> {
        match self {
            Self::Like => service.toggle_like(subject_id).await.map(Into::into),
            Self::Share => service.toggle_share(subject_id).await.map(Into::into),
        }
    }
}

impl CheckKind {
    /// Runs this read against the service. Count-only reads report `active = false`.
    pub async fn run(
        &self,
        service: &dyn RemoteInteractionService,
        subject_id: &str,
        user_id: Option<&str>,
    ) -> Result<InteractionStatus, InteractionError> {
        match self {
            Self::LikeStatus => {
                let user_id = user_id.ok_or(InteractionError::Unauthenticated)?;
                service
                    .get_like_status(subject_id, user_id)
                    .await
                    .map(Into::into)
            }
            Self::ShareStatus => {
                let user_id = user_id.ok_or(InteractionError::Unauthenticated)?;
                service
                    .get_share_status(subject_id, user_id)
                    .await
                    .map(Into::into)
            }
            Self::LikeCount => service
                .get_like_count(subject_id)
                .await
                .map(|count| InteractionStatus::from_server(false, count)),
            Self::ShareCount => service
                .get_share_count(subject_id)
                .await
                .map(|count| InteractionStatus::from_server(false, count)),
        }
    }
}
