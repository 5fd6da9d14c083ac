//! Session state: the loaded user list and the currently selected user
//!
//! Both live behind one lock so the current user is always a member of the
//! user list readers observe.

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::entities::{User, UserId};
use crate::domain::errors::{ClientError, ClientResult};

#[derive(Debug, Default)]
struct SessionInner {
    users: Vec<User>,
    current: Option<UserId>,
}

#[derive(Debug, Default)]
pub struct SessionState {
    inner: RwLock<SessionInner>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the user list after a successful `/users` fetch.
    ///
    /// The current user is kept if still listed; otherwise the first listed
    /// user becomes current, or nobody when the list is empty.
    pub async fn replace_users(&self, users: Vec<User>) -> Option<UserId> {
        let mut inner = self.inner.write().await;
        let keep = inner
            .current
            .filter(|id| users.iter().any(|u| u.id == *id));
        inner.current = keep.or_else(|| users.first().map(|u| u.id));
        inner.users = users;

        debug!("Loaded {} users, current user: {:?}", inner.users.len(), inner.current);
        inner.current
    }

    /// Make `user_id` the session user. Fails if it is not in the loaded list.
    pub async fn set_user(&self, user_id: UserId) -> ClientResult<UserId> {
        let mut inner = self.inner.write().await;
        if !inner.users.iter().any(|u| u.id == user_id) {
            return Err(ClientError::user_not_found(user_id.0));
        }
        if inner.current != Some(user_id) {
            info!("Session user changed: {:?} -> {}", inner.current, user_id);
        }
        inner.current = Some(user_id);
        Ok(user_id)
    }

    pub async fn current_user(&self) -> Option<UserId> {
        self.inner.read().await.current
    }

    /// Current user, or `InvalidSession` when none is selected
    pub async fn require_user(&self) -> ClientResult<UserId> {
        self.current_user().await.ok_or(ClientError::InvalidSession)
    }

    pub async fn is_current(&self, user_id: UserId) -> bool {
        self.current_user().await == Some(user_id)
    }
}
