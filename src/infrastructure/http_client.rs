//! HTTP implementation of the catalog backend contract
//!
//! One request per operation, no retries. Transport errors, non-success
//! statuses and undecodable bodies all collapse into
//! `ClientError::RequestFailed` for the resource being addressed.

use async_trait::async_trait;
use reqwest::{
    Client, Method, RequestBuilder,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::domain::catalog_api::CatalogApi;
use crate::domain::entities::{
    CatalogStats, HistoryEntry, InteractionEvent, RatingRecord, RatingSubmission, User, UserId,
    UserPreferences,
};
use crate::domain::errors::{ClientError, ClientResult, Resource};
use crate::domain::filter::QueryParameters;
use crate::domain::product::{Category, Product, ProductId};
use crate::infrastructure::config::ApiConfig;

/// HTTP client configuration
#[derive(Debug, Clone, serde::Serialize)]
pub struct HttpClientConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for HttpClientConfig {
    fn from(api: &ApiConfig) -> Self {
        Self {
            base_url: api.base_url.clone(),
            user_agent: api.user_agent.clone(),
            timeout_seconds: api.timeout_seconds,
        }
    }
}

// Response envelopes. List endpoints also send a `count`, which is ignored.

#[derive(Deserialize)]
struct UsersResponse {
    users: Vec<User>,
}

#[derive(Deserialize)]
struct CategoriesResponse {
    categories: Vec<Category>,
}

#[derive(Deserialize)]
struct ProductsResponse {
    products: Vec<Product>,
}

#[derive(Deserialize)]
struct RecommendationsResponse {
    recommendations: Vec<Product>,
}

#[derive(Deserialize)]
struct HistoryResponse {
    history: Vec<HistoryEntry>,
}

#[derive(Deserialize)]
struct RatingsResponse {
    ratings: Vec<RatingRecord>,
}

#[derive(Deserialize)]
struct PreferencesResponse {
    #[serde(default)]
    preferences: UserPreferences,
}

#[derive(Serialize)]
struct PreferencesRequest<'a> {
    preferences: &'a UserPreferences,
}

pub struct HttpCatalogApi {
    client: Client,
    base_url: Url,
}

impl HttpCatalogApi {
    pub fn new(config: &HttpClientConfig) -> anyhow::Result<Self> {
        use anyhow::Context;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid API base URL: {}", config.base_url))?;
        anyhow::ensure!(
            !base_url.cannot_be_a_base(),
            "API base URL cannot carry paths: {}",
            config.base_url
        );

        Ok(Self { client, base_url })
    }

    /// Join path segments onto the base URL, percent-encoding each one
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Per-user listing capped at `limit` rows (`/recommendations/{id}`, `/history/{id}`)
    pub fn endpoint_with_limit(&self, segments: &[&str], limit: u32) -> Url {
        let mut url = self.endpoint(segments);
        url.query_pairs_mut().append_pair("limit", &limit.to_string());
        url
    }

    pub fn endpoint_with_query(&self, segments: &[&str], query: &QueryParameters) -> Url {
        let mut url = self.endpoint(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.iter() {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    async fn send(&self, resource: Resource, request: RequestBuilder) -> ClientResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::request_failed(resource, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::request_failed(resource, format!("HTTP {status}")));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, resource: Resource, url: Url) -> ClientResult<T> {
        debug!("GET {url}");
        let response = self.send(resource, self.client.get(url)).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::request_failed(resource, e))
    }

    /// POST a JSON body; the response body is not inspected
    async fn post_json<B: Serialize + ?Sized>(&self, resource: Resource, url: Url, body: &B) -> ClientResult<reqwest::Response> {
        debug!("POST {url}");
        self.send(resource, self.client.request(Method::POST, url).json(body))
            .await
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn list_users(&self) -> ClientResult<Vec<User>> {
        let url = self.endpoint(&["users"]);
        let body: UsersResponse = self.get_json(Resource::Users, url).await?;
        Ok(body.users)
    }

    async fn get_user(&self, user_id: UserId) -> ClientResult<User> {
        let url = self.endpoint(&["users", &user_id.to_string()]);
        self.get_json(Resource::User, url).await
    }

    async fn get_preferences(&self, user_id: UserId) -> ClientResult<UserPreferences> {
        let url = self.endpoint(&["users", &user_id.to_string(), "preferences"]);
        let body: PreferencesResponse = self.get_json(Resource::Preferences, url).await?;
        Ok(body.preferences)
    }

    async fn update_preferences(&self, user_id: UserId, preferences: &UserPreferences) -> ClientResult<UserPreferences> {
        let url = self.endpoint(&["users", &user_id.to_string(), "preferences"]);
        let response = self
            .post_json(Resource::Preferences, url, &PreferencesRequest { preferences })
            .await?;
        let body: PreferencesResponse = response
            .json()
            .await
            .map_err(|e| ClientError::request_failed(Resource::Preferences, e))?;
        Ok(body.preferences)
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        let url = self.endpoint(&["categories"]);
        let body: CategoriesResponse = self.get_json(Resource::Categories, url).await?;
        Ok(body.categories)
    }

    async fn list_products(&self, query: &QueryParameters) -> ClientResult<Vec<Product>> {
        let url = self.endpoint_with_query(&["products"], query);
        let body: ProductsResponse = self.get_json(Resource::Products, url).await?;
        Ok(body.products)
    }

    async fn get_product(&self, product_id: ProductId) -> ClientResult<Product> {
        let url = self.endpoint(&["products", &product_id.to_string()]);
        self.get_json(Resource::Product, url).await
    }

    async fn get_stats(&self) -> ClientResult<CatalogStats> {
        self.get_json(Resource::Stats, self.endpoint(&["stats"])).await
    }

    async fn get_recommendations(&self, user_id: UserId, limit: u32) -> ClientResult<Vec<Product>> {
        let url = self.endpoint_with_limit(&["recommendations", &user_id.to_string()], limit);
        let body: RecommendationsResponse = self.get_json(Resource::Recommendations, url).await?;
        Ok(body.recommendations)
    }

    async fn submit_rating(&self, submission: &RatingSubmission) -> ClientResult<()> {
        let url = self.endpoint(&["ratings"]);
        self.post_json(Resource::Ratings, url, submission).await?;
        Ok(())
    }

    async fn get_product_ratings(&self, product_id: ProductId) -> ClientResult<Vec<RatingRecord>> {
        let url = self.endpoint(&["ratings", &product_id.to_string()]);
        let body: RatingsResponse = self.get_json(Resource::Ratings, url).await?;
        Ok(body.ratings)
    }

    async fn record_interaction(&self, user_id: UserId, event: &InteractionEvent) -> ClientResult<()> {
        let url = self.endpoint(&["history", &user_id.to_string()]);
        self.post_json(Resource::History, url, event).await?;
        Ok(())
    }

    async fn get_history(&self, user_id: UserId, limit: u32) -> ClientResult<Vec<HistoryEntry>> {
        let url = self.endpoint_with_limit(&["history", &user_id.to_string()], limit);
        let body: HistoryResponse = self.get_json(Resource::History, url).await?;
        Ok(body.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::{FilterCriteria, SortKey};

    fn client(base: &str) -> HttpCatalogApi {
        HttpCatalogApi::new(&HttpClientConfig {
            base_url: base.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_under_base_path() {
        let api = client("http://localhost:5000/api");
        assert_eq!(
            api.endpoint(&["products", "42"]).as_str(),
            "http://localhost:5000/api/products/42"
        );

        let trailing = client("http://localhost:5000/api/");
        assert_eq!(
            trailing.endpoint(&["users"]).as_str(),
            "http://localhost:5000/api/users"
        );
    }

    #[test]
    fn test_per_user_listings_carry_limit() {
        let api = client("http://localhost:5000/api");
        assert_eq!(
            api.endpoint_with_limit(&["recommendations", &UserId(3).to_string()], 8).as_str(),
            "http://localhost:5000/api/recommendations/3?limit=8"
        );
        assert_eq!(
            api.endpoint_with_limit(&["history", &UserId(3).to_string()], 50).as_str(),
            "http://localhost:5000/api/history/3?limit=50"
        );
    }

    #[test]
    fn test_query_is_encoded_in_builder_order() {
        let api = client("http://localhost:5000/api");
        let criteria = FilterCriteria::default()
            .with_search("desk lamp")
            .with_category("Home & Garden")
            .with_sort(SortKey::PriceAsc);

        let url = api.endpoint_with_query(&["products"], &criteria.to_query());

        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/products?search=desk+lamp&category=Home+%26+Garden&sort_by=price_asc"
        );
    }

    #[test]
    fn test_unfiltered_products_url_has_no_query() {
        let api = client("http://localhost:5000/api");
        let url = api.endpoint_with_query(&["products"], &FilterCriteria::cleared().to_query());
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let config = HttpClientConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(HttpCatalogApi::new(&config).is_err());
    }

    #[test]
    fn test_envelopes_ignore_count() {
        let body: ProductsResponse =
            serde_json::from_str(r#"{"products": [], "count": 0}"#).unwrap();
        assert!(body.products.is_empty());

        let prefs: PreferencesResponse = serde_json::from_str(r#"{"message": "ok"}"#).unwrap();
        assert!(prefs.preferences.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_backend_maps_to_request_failed() {
        let api = HttpCatalogApi::new(&HttpClientConfig {
            base_url: "http://127.0.0.1:1/api".to_string(),
            timeout_seconds: 2,
            ..Default::default()
        })
        .unwrap();

        let err = api.list_users().await.unwrap_err();
        assert!(matches!(err, ClientError::RequestFailed { resource: Resource::Users, .. }));
    }
}
