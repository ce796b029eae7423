use super::errors::classify_status;
use crate::domain::interaction::{
    InteractionError, InteractionKind, LikeStatus, RemoteInteractionService, ShareStatus,
};
use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: i64,
}

/// `RemoteInteractionService` backed by the REST pass-through in front of
/// the managed store.
///
/// Routes, relative to the base URL:
/// - `GET  notes/{id}/likes/status?userId=` / `GET notes/{id}/shares/status?userId=`
/// - `POST notes/{id}/like` / `POST notes/{id}/share`
/// - `GET  notes/{id}/likes/count` / `GET notes/{id}/shares/count`
pub struct HttpInteractionService {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpInteractionService {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| anyhow::anyhow!("Invalid interaction API URL {}: {}", base_url, e))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Interaction API URL cannot be used as a base: {}", base_url);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn endpoint(
        &self,
        subject_id: &str,
        tail: &[&str],
        user_id: Option<&str>,
    ) -> Result<Url, InteractionError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| InteractionError::Transient("invalid base url".into()))?
            .pop_if_empty()
            .push("notes")
            .push(subject_id)
            .extend(tail);
        if let Some(user_id) = user_id {
            url.query_pairs_mut().append_pair("userId", user_id);
        }
        Ok(url)
    }

    async fn call<T: DeserializeOwned>(&self, method: Method, url: Url) -> Result<T, InteractionError> {
        debug!(method = %method, url = %url, "interaction request");
        let mut request = self.client.request(method, url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        response.json::<T>().await.map_err(|e| {
            warn!(error = %e, "undecodable interaction response");
            InteractionError::Transient(format!("malformed response: {}", e))
        })
    }

    async fn status<T: DeserializeOwned>(
        &self,
        kind: InteractionKind,
        subject_id: &str,
        user_id: &str,
    ) -> Result<T, InteractionError> {
        let url = self.endpoint(subject_id, &[plural(kind), "status"], Some(user_id))?;
        self.call(Method::GET, url).await
    }

    async fn count(&self, kind: InteractionKind, subject_id: &str) -> Result<i64, InteractionError> {
        let url = self.endpoint(subject_id, &[plural(kind), "count"], None)?;
        let body: CountResponse = self.call(Method::GET, url).await?;
        Ok(body.count)
    }

    async fn toggle<T: DeserializeOwned>(
        &self,
        kind: InteractionKind,
        subject_id: &str,
    ) -> Result<T, InteractionError> {
        let url = self.endpoint(subject_id, &[kind.as_str()], None)?;
        self.call(Method::POST, url).await
    }
}

fn plural(kind: InteractionKind) -> &'static str {
    match kind {
        InteractionKind::Like => "likes",
        InteractionKind::Share => "shares",
    }
}

#[async_trait]
impl RemoteInteractionService for HttpInteractionService {
    async fn get_like_status(
        &self,
        subject_id: &str,
        user_id: &str,
    ) -> Result<LikeStatus, InteractionError> {
        self.status(InteractionKind::Like, subject_id, user_id).await
    }

    async fn toggle_like(&self, subject_id: &str) -> Result<LikeStatus, InteractionError> {
        self.toggle(InteractionKind::Like, subject_id).await
    }

    async fn get_share_status(
        &self,
        subject_id: &str,
        user_id: &str,
    ) -> Result<ShareStatus, InteractionError> {
        self.status(InteractionKind::Share, subject_id, user_id).await
    }

    async fn toggle_share(&self, subject_id: &str) -> Result<ShareStatus, InteractionError> {
        self.toggle(InteractionKind::Share, subject_id).await
    }

    async fn get_like_count(&self, subject_id: &str) -> Result<i64, InteractionError> {
        self.count(InteractionKind::Like, subject_id).await
    }

    async fn get_share_count(&self, subject_id: &str) -> Result<i64, InteractionError> {
        self.count(InteractionKind::Share, subject_id).await
    }
}
