//! Backend interface for the catalog, recommendation, rating and history resources
//!
//! Every operation returns the decoded payload or `ClientError::RequestFailed`
//! naming the resource. Implementations never retry.

use async_trait::async_trait;

use crate::domain::entities::{
    CatalogStats, HistoryEntry, InteractionEvent, RatingRecord, RatingSubmission, User, UserId,
    UserPreferences,
};
use crate::domain::errors::ClientResult;
use crate::domain::filter::QueryParameters;
use crate::domain::product::{Category, Product, ProductId};

#[async_trait]
pub trait CatalogApi: Send + Sync {
    // Users
    async fn list_users(&self) -> ClientResult<Vec<User>>;
    async fn get_user(&self, user_id: UserId) -> ClientResult<User>;
    async fn get_preferences(&self, user_id: UserId) -> ClientResult<UserPreferences>;
    async fn update_preferences(&self, user_id: UserId, preferences: &UserPreferences) -> ClientResult<UserPreferences>;

    // Catalog
    async fn list_categories(&self) -> ClientResult<Vec<Category>>;
    async fn list_products(&self, query: &QueryParameters) -> ClientResult<Vec<Product>>;
    async fn get_product(&self, product_id: ProductId) -> ClientResult<Product>;
    async fn get_stats(&self) -> ClientResult<CatalogStats>;

    // Personalization
    async fn get_recommendations(&self, user_id: UserId, limit: u32) -> ClientResult<Vec<Product>>;

    // Feedback
    async fn submit_rating(&self, submission: &RatingSubmission) -> ClientResult<()>;
    async fn get_product_ratings(&self, product_id: ProductId) -> ClientResult<Vec<RatingRecord>>;
    async fn record_interaction(&self, user_id: UserId, event: &InteractionEvent) -> ClientResult<()>;
    async fn get_history(&self, user_id: UserId, limit: u32) -> ClientResult<Vec<HistoryEntry>>;
}
