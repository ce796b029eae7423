use serde::{Deserialize, Serialize};

/// Viewer identity as far as interaction sync is concerned.
///
/// Token storage lives elsewhere; only the presence of a user id matters here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Option<String>,
}

impl Session {
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref().filter(|id| !id.trim().is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id().is_some()
    }
}
