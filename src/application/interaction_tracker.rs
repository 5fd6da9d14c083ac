//! Implicit-feedback recorder
//!
//! Views and cart additions are posted to `/history/{user}` on a detached
//! task. Delivery is best effort: failures are logged and otherwise ignored.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::application::session::SessionState;
use crate::domain::catalog_api::CatalogApi;
use crate::domain::entities::{ActionType, InteractionEvent};
use crate::domain::product::ProductId;

pub struct InteractionTracker {
    api: Arc<dyn CatalogApi>,
    session: Arc<SessionState>,
}

impl InteractionTracker {
    pub fn new(api: Arc<dyn CatalogApi>, session: Arc<SessionState>) -> Self {
        Self { api, session }
    }

    /// Post `action` for the session user without waiting for the response.
    ///
    /// Returns `None` when no user is selected (nothing is sent). The handle
    /// is only useful to callers that want to observe delivery, such as tests.
    pub async fn record(&self, product_id: ProductId, action_type: ActionType) -> Option<JoinHandle<()>> {
        let Some(user_id) = self.session.current_user().await else {
            debug!("No session user, skipping {action_type} of product {product_id}");
            return None;
        };

        let api = Arc::clone(&self.api);
        let event = InteractionEvent {
            product_id,
            action_type,
        };

        Some(tokio::spawn(async move {
            match api.record_interaction(user_id, &event).await {
                Ok(()) => debug!("Recorded {action_type} of product {product_id} for user {user_id}"),
                Err(e) => warn!("Error tracking action: {e}"),
            }
        }))
    }
}
