//! Test utilities
//!
//! An in-memory `CatalogApi` with a call log, scriptable failures and
//! response gates, a `Presenter` that records every push, and sample data.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::application::presenter::Presenter;
use crate::application::view_model::{ProductCard, ProductDetailView, SelectOption};
use crate::domain::catalog_api::CatalogApi;
use crate::domain::entities::{
    CatalogStats, HistoryEntry, InteractionEvent, RatingRecord, RatingSubmission, User, UserId,
    UserPreferences,
};
use crate::domain::errors::{ClientError, ClientResult, Resource};
use crate::domain::events::{CartControl, GridTarget};
use crate::domain::filter::QueryParameters;
use crate::domain::product::{Category, Product, ProductId};

pub fn sample_product(id: u32, name: &str, category: &str, price: f64) -> Product {
    Product {
        id: ProductId(id),
        name: name.to_string(),
        category: category.to_string(),
        subcategory: None,
        brand: Some("Acme".to_string()),
        price,
        rating: 4.0,
        num_ratings: 10,
        image_url: Some(format!("https://img.example.com/{id}.jpg")),
        description: Some(format!("{name} description")),
        features: Vec::new(),
        stock: Some(5),
    }
}

pub fn sample_user(id: u32, name: &str) -> User {
    User {
        id: UserId(id),
        name: name.to_string(),
        email: None,
        preferences: serde_json::Value::Null,
    }
}

/// Five products over three categories; two of them are Electronics
pub fn sample_catalog() -> Vec<Product> {
    vec![
        sample_product(42, "Wireless Headphones", "Electronics", 199.99),
        sample_product(7, "Smart Watch", "Electronics", 249.0),
        sample_product(3, "Desk Lamp", "Home", 39.5),
        sample_product(4, "Coffee Mug", "Home", 12.0),
        sample_product(5, "Yoga Mat", "Sports", 25.0),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    ListUsers,
    GetUser(UserId),
    GetPreferences(UserId),
    UpdatePreferences(UserId),
    ListCategories,
    ListProducts(Vec<(String, String)>),
    GetProduct(ProductId),
    GetStats,
    GetRecommendations(UserId, u32),
    SubmitRating(RatingSubmission),
    GetProductRatings(ProductId),
    RecordInteraction(UserId, InteractionEvent),
    GetHistory(UserId, u32),
}

#[derive(Default)]
struct FakeState {
    users: Vec<User>,
    categories: Vec<Category>,
    products: Vec<Product>,
    recommendations: HashMap<UserId, Vec<Product>>,
    ratings: Vec<RatingRecord>,
    history: Vec<HistoryEntry>,
    preferences: HashMap<UserId, UserPreferences>,
    failing: HashSet<Resource>,
    calls: Vec<ApiCall>,
    held_recommendations: HashMap<UserId, Arc<Notify>>,
    held_products: Option<Arc<Notify>>,
    held_rating: Option<Arc<Notify>>,
}

/// Backend double. Products are filtered and sorted roughly the way the
/// real backend does so query-building paths produce meaningful results.
#[derive(Default)]
pub struct FakeCatalogApi {
    state: Mutex<FakeState>,
}

impl FakeCatalogApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        self.state.lock().unwrap().users = users;
        self
    }

    pub fn with_categories(self, categories: &[&str]) -> Self {
        self.state.lock().unwrap().categories = categories.iter().map(ToString::to_string).collect();
        self
    }

    pub fn with_products(self, products: Vec<Product>) -> Self {
        self.state.lock().unwrap().products = products;
        self
    }

    pub fn with_recommendations(self, user_id: UserId, products: Vec<Product>) -> Self {
        self.state
            .lock()
            .unwrap()
            .recommendations
            .insert(user_id, products);
        self
    }

    pub fn with_history(self, entries: Vec<HistoryEntry>) -> Self {
        self.state.lock().unwrap().history = entries;
        self
    }

    pub fn with_ratings(self, ratings: Vec<RatingRecord>) -> Self {
        self.state.lock().unwrap().ratings = ratings;
        self
    }

    /// Make every call addressed to `resource` fail
    pub fn fail(&self, resource: Resource) {
        self.state.lock().unwrap().failing.insert(resource);
    }

    pub fn recover(&self, resource: Resource) {
        self.state.lock().unwrap().failing.remove(&resource);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Hold the next recommendations response for `user_id` until the
    /// returned handle is notified
    pub fn hold_recommendations(&self, user_id: UserId) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state
            .lock()
            .unwrap()
            .held_recommendations
            .insert(user_id, Arc::clone(&gate));
        gate
    }

    /// Hold the next products response until the returned handle is notified
    pub fn hold_next_products(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state.lock().unwrap().held_products = Some(Arc::clone(&gate));
        gate
    }

    /// Hold the next rating submission until the returned handle is notified
    pub fn hold_next_rating(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state.lock().unwrap().held_rating = Some(Arc::clone(&gate));
        gate
    }

    fn log(&self, call: ApiCall) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn check(&self, resource: Resource) -> ClientResult<()> {
        if self.state.lock().unwrap().failing.contains(&resource) {
            Err(ClientError::request_failed(resource, "HTTP 500 Internal Server Error"))
        } else {
            Ok(())
        }
    }

    fn filter_products(&self, query: &QueryParameters) -> Vec<Product> {
        let products = self.state.lock().unwrap().products.clone();
        let search = query.get("search").map(str::to_lowercase);
        let min = query.get("min_price").and_then(|v| v.parse::<f64>().ok());
        let max = query.get("max_price").and_then(|v| v.parse::<f64>().ok());

        let mut matching: Vec<Product> = products
            .into_iter()
            .filter(|p| {
                search.as_ref().is_none_or(|s| {
                    p.name.to_lowercase().contains(s)
                        || p.description.as_ref().is_some_and(|d| d.to_lowercase().contains(s))
                })
            })
            .filter(|p| query.get("category").is_none_or(|c| p.category == c))
            .filter(|p| min.is_none_or(|m| p.price >= m))
            .filter(|p| max.is_none_or(|m| p.price <= m))
            .collect();

        match query.get("sort_by") {
            Some("price_asc") => matching.sort_by(|a, b| a.price.total_cmp(&b.price)),
            Some("price_desc") => matching.sort_by(|a, b| b.price.total_cmp(&a.price)),
            Some("rating") => matching.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            _ => matching.sort_by(|a, b| a.name.cmp(&b.name)),
        }
        matching
    }
}

#[async_trait]
impl CatalogApi for FakeCatalogApi {
    async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.log(ApiCall::ListUsers);
        self.check(Resource::Users)?;
        Ok(self.state.lock().unwrap().users.clone())
    }

    async fn get_user(&self, user_id: UserId) -> ClientResult<User> {
        self.log(ApiCall::GetUser(user_id));
        self.check(Resource::User)?;
        self.state
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| ClientError::request_failed(Resource::User, "HTTP 404 Not Found"))
    }

    async fn get_preferences(&self, user_id: UserId) -> ClientResult<UserPreferences> {
        self.log(ApiCall::GetPreferences(user_id));
        self.check(Resource::Preferences)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .preferences
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_preferences(&self, user_id: UserId, preferences: &UserPreferences) -> ClientResult<UserPreferences> {
        self.log(ApiCall::UpdatePreferences(user_id));
        self.check(Resource::Preferences)?;
        self.state
            .lock()
            .unwrap()
            .preferences
            .insert(user_id, preferences.clone());
        Ok(preferences.clone())
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.log(ApiCall::ListCategories);
        self.check(Resource::Categories)?;
        Ok(self.state.lock().unwrap().categories.clone())
    }

    async fn list_products(&self, query: &QueryParameters) -> ClientResult<Vec<Product>> {
        self.log(ApiCall::ListProducts(
            query.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        ));
        let gate = self.state.lock().unwrap().held_products.take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.check(Resource::Products)?;
        Ok(self.filter_products(query))
    }

    async fn get_product(&self, product_id: ProductId) -> ClientResult<Product> {
        self.log(ApiCall::GetProduct(product_id));
        self.check(Resource::Product)?;
        self.state
            .lock()
            .unwrap()
            .products
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
            .ok_or_else(|| ClientError::request_failed(Resource::Product, "HTTP 404 Not Found"))
    }

    async fn get_stats(&self) -> ClientResult<CatalogStats> {
        self.log(ApiCall::GetStats);
        self.check(Resource::Stats)?;
        let state = self.state.lock().unwrap();
        let mut stats = CatalogStats {
            total_products: state.products.len() as u64,
            total_users: state.users.len() as u64,
            total_ratings: state.ratings.len() as u64,
            ..Default::default()
        };
        for product in &state.products {
            *stats.categories.entry(product.category.clone()).or_default() += 1;
        }
        Ok(stats)
    }

    async fn get_recommendations(&self, user_id: UserId, limit: u32) -> ClientResult<Vec<Product>> {
        self.log(ApiCall::GetRecommendations(user_id, limit));
        let gate = self.state.lock().unwrap().held_recommendations.remove(&user_id);
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.check(Resource::Recommendations)?;
        let mut products = self
            .state
            .lock()
            .unwrap()
            .recommendations
            .get(&user_id)
            .cloned()
            .unwrap_or_default();
        products.truncate(limit as usize);
        Ok(products)
    }

    async fn submit_rating(&self, submission: &RatingSubmission) -> ClientResult<()> {
        self.log(ApiCall::SubmitRating(submission.clone()));
        let gate = self.state.lock().unwrap().held_rating.take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.check(Resource::Ratings)
    }

    async fn get_product_ratings(&self, product_id: ProductId) -> ClientResult<Vec<RatingRecord>> {
        self.log(ApiCall::GetProductRatings(product_id));
        self.check(Resource::Ratings)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .ratings
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn record_interaction(&self, user_id: UserId, event: &InteractionEvent) -> ClientResult<()> {
        self.log(ApiCall::RecordInteraction(user_id, *event));
        self.check(Resource::History)
    }

    async fn get_history(&self, user_id: UserId, limit: u32) -> ClientResult<Vec<HistoryEntry>> {
        self.log(ApiCall::GetHistory(user_id, limit));
        self.check(Resource::History)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .history
            .iter()
            .filter(|h| h.user_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresenterCall {
    List(GridTarget, Vec<u32>),
    Empty(GridTarget, String),
    Error(GridTarget, String),
    Detail(u32),
    CloseDetail,
    StarPreview(u8),
    CartFeedback(CartControl),
    CartReset(CartControl),
    Users(Vec<String>, Option<String>),
    Categories(Vec<String>),
    Advisory(String),
    PromptUser(String),
}

impl PresenterCall {
    pub const fn target(&self) -> Option<GridTarget> {
        match self {
            Self::List(target, _) | Self::Empty(target, _) | Self::Error(target, _) => Some(*target),
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct RecordingPresenter {
    calls: Mutex<Vec<PresenterCall>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<PresenterCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Most recent list/empty/error push for `target`
    pub fn last_grid(&self, target: GridTarget) -> Option<PresenterCall> {
        self.calls()
            .into_iter()
            .rev()
            .find(|c| c.target() == Some(target))
    }

    fn push(&self, call: PresenterCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Presenter for RecordingPresenter {
    fn render_list(&self, target: GridTarget, cards: &[ProductCard]) {
        self.push(PresenterCall::List(target, cards.iter().map(|c| c.id).collect()));
    }

    fn render_empty(&self, target: GridTarget, message: &str) {
        self.push(PresenterCall::Empty(target, message.to_string()));
    }

    fn render_error(&self, target: GridTarget, message: &str) {
        self.push(PresenterCall::Error(target, message.to_string()));
    }

    fn render_detail(&self, detail: &ProductDetailView) {
        self.push(PresenterCall::Detail(detail.id));
    }

    fn close_detail(&self) {
        self.push(PresenterCall::CloseDetail);
    }

    fn render_star_preview(&self, count: u8) {
        self.push(PresenterCall::StarPreview(count));
    }

    fn show_added_to_cart_feedback(&self, control: CartControl) {
        self.push(PresenterCall::CartFeedback(control));
    }

    fn reset_cart_feedback(&self, control: CartControl) {
        self.push(PresenterCall::CartReset(control));
    }

    fn render_users(&self, options: &[SelectOption], selected: Option<&str>) {
        self.push(PresenterCall::Users(
            options.iter().map(|o| o.label.clone()).collect(),
            selected.map(ToString::to_string),
        ));
    }

    fn render_categories(&self, options: &[SelectOption]) {
        self.push(PresenterCall::Categories(
            options.iter().map(|o| o.value.clone()).collect(),
        ));
    }

    fn show_advisory(&self, message: &str) {
        self.push(PresenterCall::Advisory(message.to_string()));
    }

    fn prompt_user_selection(&self, message: &str) {
        self.push(PresenterCall::PromptUser(message.to_string()));
    }
}
