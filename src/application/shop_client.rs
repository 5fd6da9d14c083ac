//! Shopping client orchestrator
//!
//! Owns the session, catalog store, tracker and rating widget, turns
//! `UserIntent`s into backend calls, and pushes projected view-models to the
//! presenter. Every fetch that feeds a grid is guarded against stale
//! responses: catalog loads by ticket (see `CatalogStore::load`),
//! recommendations by the user id they were issued for.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::application::catalog_store::{CatalogLoad, CatalogStore};
use crate::application::interaction_tracker::InteractionTracker;
use crate::application::presenter::Presenter;
use crate::application::rating_widget::{RatingWidget, RatingWidgetState};
use crate::application::session::SessionState;
use crate::application::view_model::{FAILED_TO_LOAD_DETAILS, HistoryRow, ViewModelProjector};
use crate::domain::catalog_api::CatalogApi;
use crate::domain::entities::{
    ActionType, CatalogStats, RatingRecord, RatingSubmission, RatingValue, UserId,
    UserPreferences,
};
use crate::domain::errors::ClientResult;
use crate::domain::events::{CartControl, GridTarget, UserIntent};
use crate::domain::filter::FilterCriteria;
use crate::domain::product::ProductId;
use crate::infrastructure::config::AppConfig;

pub const SELECT_USER_TO_RATE: &str = "Please select a user to rate products";
pub const SELECT_USER_FOR_HISTORY: &str = "Please select a user to view history";
pub const RATING_FAILED: &str = "Failed to submit rating";

/// Tunables taken from `AppConfig` at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub recommendation_limit: u32,
    pub history_limit: u32,
    pub cart_feedback: Duration,
}

impl From<&AppConfig> for ClientSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            recommendation_limit: config.api.recommendation_limit,
            history_limit: config.api.history_limit,
            cart_feedback: config.ui.cart_feedback(),
        }
    }
}

pub struct ShopClient {
    session_id: Uuid,
    api: Arc<dyn CatalogApi>,
    presenter: Arc<dyn Presenter>,
    projector: ViewModelProjector,
    session: Arc<SessionState>,
    catalog: CatalogStore,
    tracker: InteractionTracker,
    widget: Mutex<RatingWidget>,
    settings: ClientSettings,
}

impl ShopClient {
    pub fn new(api: Arc<dyn CatalogApi>, presenter: Arc<dyn Presenter>, config: &AppConfig) -> Self {
        let session = Arc::new(SessionState::new());
        let session_id = Uuid::new_v4();
        info!("Creating shop client session {}", session_id);

        Self {
            session_id,
            catalog: CatalogStore::new(Arc::clone(&api)),
            tracker: InteractionTracker::new(Arc::clone(&api), Arc::clone(&session)),
            api,
            presenter,
            projector: ViewModelProjector::new(&config.ui),
            session,
            widget: Mutex::new(RatingWidget::new()),
            settings: ClientSettings::from(config),
        }
    }

    pub const fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub async fn current_user(&self) -> Option<UserId> {
        self.session.current_user().await
    }

    pub const fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub async fn rating_state(&self) -> RatingWidgetState {
        self.widget.lock().await.state()
    }

    /// Initial load: users (and the first user's recommendations), then
    /// categories, then the unfiltered catalog. Each step renders its own
    /// failure state; a failed step does not stop the next one.
    pub async fn startup(&self) {
        let span = info_span!("startup", session_id = %self.session_id);
        async {
            if let Err(e) = self.load_users().await {
                error!("Error loading users: {}", e);
            }
            if let Err(e) = self.load_categories().await {
                error!("Error loading categories: {}", e);
            }
            if let Err(e) = self.load_products().await {
                error!("Error loading products: {}", e);
            }
            info!("Startup complete");
        }
        .instrument(span)
        .await;
    }

    /// Fetch the user list, render the selector and refresh recommendations
    /// for whoever is current afterwards
    pub async fn load_users(&self) -> ClientResult<()> {
        let users = self.api.list_users().await?;
        let options = ViewModelProjector::user_options(&users);
        let current = self.session.replace_users(users).await;

        let selected = current.map(|id| id.to_string());
        self.presenter.render_users(&options, selected.as_deref());

        match current {
            Some(_) => self.load_recommendations().await,
            None => {
                info!("No users available, skipping recommendations");
                Ok(())
            }
        }
    }

    pub async fn load_categories(&self) -> ClientResult<()> {
        let categories = self.catalog.load_categories().await?;
        self.presenter
            .render_categories(&ViewModelProjector::category_options(&categories));
        Ok(())
    }

    /// Unfiltered catalog load
    pub async fn load_products(&self) -> ClientResult<()> {
        self.refresh_catalog(None).await
    }

    pub async fn apply_filters(&self, criteria: FilterCriteria) -> ClientResult<()> {
        self.refresh_catalog(Some(&criteria)).await
    }

    /// Re-run the active filters with `text` as the search term; blank text
    /// drops the search constraint only
    pub async fn search_products(&self, text: &str) -> ClientResult<()> {
        let criteria = self.catalog.active_criteria().await.with_search(text);
        self.refresh_catalog(Some(&criteria)).await
    }

    /// Reset every criterion and reload the unfiltered catalog
    pub async fn clear_filters(&self) -> ClientResult<()> {
        self.refresh_catalog(None).await
    }

    async fn refresh_catalog(&self, criteria: Option<&FilterCriteria>) -> ClientResult<()> {
        let filtered = criteria.is_some_and(|c| !c.is_unconstrained());

        match self.catalog.load(criteria).await {
            Ok(CatalogLoad::Applied(snapshot)) => {
                let view = self.projector.grid(GridTarget::Products, snapshot.products());
                self.presenter.render_grid(GridTarget::Products, &view);
                Ok(())
            }
            Ok(CatalogLoad::Superseded) => Ok(()),
            Err(e) => {
                error!("Error loading products: {}", e);
                let view = ViewModelProjector::failed_grid(GridTarget::Products, filtered);
                self.presenter.render_grid(GridTarget::Products, &view);
                Err(e)
            }
        }
    }

    /// Switch the session user and reload recommendations for them
    pub async fn select_user(&self, user_id: UserId) -> ClientResult<()> {
        self.session.set_user(user_id).await?;
        self.load_recommendations().await
    }

    /// Fetch recommendations for the session user.
    ///
    /// The response is dropped without rendering if the session user changed
    /// while the request was in flight.
    pub async fn load_recommendations(&self) -> ClientResult<()> {
        let Some(user_id) = self.session.current_user().await else {
            debug!("No session user, not requesting recommendations");
            return Ok(());
        };

        let result = self
            .api
            .get_recommendations(user_id, self.settings.recommendation_limit)
            .await;

        if !self.session.is_current(user_id).await {
            debug!("Discarding recommendations for user {}: session user changed", user_id);
            return Ok(());
        }

        match result {
            Ok(products) => {
                debug!("Received {} recommendations for user {}", products.len(), user_id);
                let view = self.projector.grid(GridTarget::Recommendations, &products);
                self.presenter.render_grid(GridTarget::Recommendations, &view);
                Ok(())
            }
            Err(e) => {
                error!("Error loading recommendations: {}", e);
                let view = ViewModelProjector::failed_grid(GridTarget::Recommendations, false);
                self.presenter.render_grid(GridTarget::Recommendations, &view);
                Err(e)
            }
        }
    }

    /// Fetch one product, record the view and open the detail with its rating widget
    pub async fn show_product_detail(&self, product_id: ProductId) -> ClientResult<()> {
        let product = match self.api.get_product(product_id).await {
            Ok(product) => product,
            Err(e) => {
                error!("Error loading product details: {}", e);
                self.presenter.show_advisory(FAILED_TO_LOAD_DETAILS);
                return Err(e);
            }
        };

        self.tracker.record(product_id, ActionType::View).await;
        self.widget.lock().await.open(product_id);
        self.presenter.render_detail(&self.projector.detail(&product));
        Ok(())
    }

    pub async fn close_detail(&self) {
        self.widget.lock().await.close();
        self.presenter.close_detail();
    }

    /// Preview highlight only; never touches the network
    pub async fn hover_star(&self, stars: u8) {
        let preview = self.widget.lock().await.hover(stars);
        if let Some(count) = preview {
            self.presenter.render_star_preview(count);
        }
    }

    pub async fn leave_stars(&self) {
        let preview = self.widget.lock().await.leave();
        if let Some(count) = preview {
            self.presenter.render_star_preview(count);
        }
    }

    /// Like `rate_product`, for raw star counts from non-UI callers
    pub async fn rate_product_stars(&self, stars: u8) -> ClientResult<()> {
        let rating = RatingValue::new(stars)?;
        self.rate_product(rating).await
    }

    /// Submit `rating` for the product open in the detail view.
    ///
    /// On success, in order: thank the shopper, close the detail view, reload
    /// the catalog with the active criteria, reload recommendations. On
    /// failure the detail view stays open and nothing is reloaded.
    pub async fn rate_product(&self, rating: RatingValue) -> ClientResult<()> {
        let current = self.session.current_user().await;
        let begun = self.widget.lock().await.begin_submit(rating, current);
        let (user_id, product_id) = match begun {
            Ok(ids) => ids,
            Err(e) if e.needs_user_selection() => {
                self.presenter.prompt_user_selection(SELECT_USER_TO_RATE);
                return Err(e);
            }
            Err(e) => {
                warn!("Rating refused: {}", e);
                return Err(e);
            }
        };

        let submission = RatingSubmission {
            user_id,
            product_id,
            rating,
            review: None,
        };
        if let Err(e) = self.api.submit_rating(&submission).await {
            error!("Error rating product: {}", e);
            self.widget.lock().await.complete(product_id, false);
            self.presenter.show_advisory(RATING_FAILED);
            return Err(e);
        }

        info!("User {} rated product {} with {} stars", user_id, product_id, rating);
        self.presenter
            .show_advisory(&format!("Thank you for rating this product {rating} stars!"));
        // a detail opened while the rating was in flight stays open
        if self.widget.lock().await.complete(product_id, true) {
            self.presenter.close_detail();
        }

        let criteria = self.catalog.active_criteria().await;
        if let Err(e) = self.refresh_catalog(Some(&criteria)).await {
            warn!("Catalog reload after rating failed: {}", e);
        }
        if let Err(e) = self.load_recommendations().await {
            warn!("Recommendations reload after rating failed: {}", e);
        }
        Ok(())
    }

    /// Record the cart addition and flash the "added" feedback on `control`.
    ///
    /// The returned handle resolves once the feedback has been reset.
    pub async fn add_to_cart(&self, control: CartControl) -> JoinHandle<()> {
        self.tracker
            .record(control.product_id, ActionType::AddToCart)
            .await;
        self.presenter.show_added_to_cart_feedback(control);

        let presenter = Arc::clone(&self.presenter);
        let delay = self.settings.cart_feedback;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            presenter.reset_cart_feedback(control);
        })
    }

    /// Most recent history rows for the session user, newest first
    pub async fn recent_history(&self) -> ClientResult<Vec<HistoryRow>> {
        let user_id = match self.session.require_user().await {
            Ok(user_id) => user_id,
            Err(e) => {
                self.presenter.prompt_user_selection(SELECT_USER_FOR_HISTORY);
                return Err(e);
            }
        };
        let entries = self
            .api
            .get_history(user_id, self.settings.history_limit)
            .await?;
        Ok(ViewModelProjector::history_rows(&entries))
    }

    pub async fn product_reviews(&self, product_id: ProductId) -> ClientResult<Vec<RatingRecord>> {
        self.api.get_product_ratings(product_id).await
    }

    pub async fn catalog_stats(&self) -> ClientResult<CatalogStats> {
        self.api.get_stats().await
    }

    pub async fn user_preferences(&self) -> ClientResult<UserPreferences> {
        let user_id = self.session.require_user().await?;
        self.api.get_preferences(user_id).await
    }

    pub async fn update_user_preferences(&self, preferences: &UserPreferences) -> ClientResult<UserPreferences> {
        let user_id = self.session.require_user().await?;
        let saved = self.api.update_preferences(user_id, preferences).await?;
        info!("Updated preferences for user {}", user_id);
        Ok(saved)
    }

    /// Route one shopper intent to its handler.
    ///
    /// Failures have already been rendered by the handler; the error is
    /// returned for callers that want to log or count it.
    pub async fn dispatch(&self, intent: UserIntent) -> ClientResult<()> {
        let span = info_span!("intent", session_id = %self.session_id, intent = intent.name());
        async {
            debug!("Dispatching {:?}", intent);
            match intent {
                UserIntent::SelectUser(user_id) => self.select_user(user_id).await,
                UserIntent::Search(text) => self.search_products(&text).await,
                UserIntent::ApplyFilters(criteria) => self.apply_filters(criteria).await,
                UserIntent::ClearFilters => self.clear_filters().await,
                UserIntent::ShowProduct(product_id) => self.show_product_detail(product_id).await,
                UserIntent::CloseDetail => {
                    self.close_detail().await;
                    Ok(())
                }
                UserIntent::HoverStar(stars) => {
                    self.hover_star(stars).await;
                    Ok(())
                }
                UserIntent::LeaveStars => {
                    self.leave_stars().await;
                    Ok(())
                }
                UserIntent::Rate(rating) => self.rate_product(rating).await,
                UserIntent::AddToCart(control) => {
                    // feedback reset runs detached
                    drop(self.add_to_cart(control).await);
                    Ok(())
                }
            }
        }
        .instrument(span)
        .await
    }
}
