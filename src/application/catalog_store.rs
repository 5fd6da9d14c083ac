//! Catalog store
//!
//! Holds the last successfully fetched product list together with its
//! id and category indexes, plus the category list fetched at startup.
//! A snapshot is built completely before it is swapped in, so readers see
//! either the old set or the new one, never a mix. A failed fetch leaves
//! the previous snapshot in place.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::catalog_api::CatalogApi;
use crate::domain::errors::{ClientError, ClientResult};
use crate::domain::filter::FilterCriteria;
use crate::domain::product::{Category, Product, ProductId};

/// Immutable product set from one `/products` response
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    ticket: u64,
    criteria: FilterCriteria,
    products: Vec<Product>,
    by_id: HashMap<ProductId, usize>,
    by_category: BTreeMap<Category, Vec<ProductId>>,
}

impl CatalogSnapshot {
    fn new(ticket: u64, criteria: FilterCriteria, products: Vec<Product>) -> Self {
        let mut by_id = HashMap::with_capacity(products.len());
        let mut by_category: BTreeMap<Category, Vec<ProductId>> = BTreeMap::new();
        for (idx, product) in products.iter().enumerate() {
            by_id.insert(product.id, idx);
            by_category
                .entry(product.category.clone())
                .or_default()
                .push(product.id);
        }

        Self {
            ticket,
            criteria,
            products,
            by_id,
            by_category,
        }
    }

    /// Products in backend order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, product_id: ProductId) -> Option<&Product> {
        self.by_id.get(&product_id).map(|&idx| &self.products[idx])
    }

    pub fn in_category(&self, category: &str) -> Vec<&Product> {
        self.by_category
            .get(category)
            .map(|ids| ids.iter().filter_map(|id| self.get(*id)).collect())
            .unwrap_or_default()
    }

    /// Criteria this snapshot was fetched with
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Outcome of a catalog fetch that did not report an error
#[derive(Debug, Clone)]
pub enum CatalogLoad {
    /// The response became the current snapshot
    Applied(Arc<CatalogSnapshot>),
    /// A newer request superseded this one; its outcome was dropped
    Superseded,
}

pub struct CatalogStore {
    api: Arc<dyn CatalogApi>,
    snapshot: RwLock<Arc<CatalogSnapshot>>,
    categories: RwLock<Vec<Category>>,
    active_criteria: RwLock<FilterCriteria>,
    next_ticket: AtomicU64,
}

impl CatalogStore {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            snapshot: RwLock::new(Arc::new(CatalogSnapshot::default())),
            categories: RwLock::new(Vec::new()),
            active_criteria: RwLock::new(FilterCriteria::default()),
            next_ticket: AtomicU64::new(0),
        }
    }

    /// Fetch the catalog, unfiltered when `criteria` is `None`.
    ///
    /// Each call is tagged with an increasing ticket. Only the most recently
    /// issued call may settle the view: once a later call has been issued,
    /// this one's success or failure is dropped as `Superseded`.
    pub async fn load(&self, criteria: Option<&FilterCriteria>) -> ClientResult<CatalogLoad> {
        let criteria = criteria.cloned().unwrap_or_default();
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        *self.active_criteria.write().await = criteria.clone();

        let query = criteria.to_query();
        debug!("Catalog load #{ticket} with {} query parameters", query.len());

        let products = match self.api.list_products(&query).await {
            Ok(products) => products,
            Err(e) if self.next_ticket.load(Ordering::SeqCst) != ticket => {
                debug!("Catalog load #{ticket} failed after a newer load was issued: {e}");
                return Ok(CatalogLoad::Superseded);
            }
            Err(e) => return Err(e),
        };
        let fresh = Arc::new(CatalogSnapshot::new(ticket, criteria, products));

        let mut current = self.snapshot.write().await;
        let latest = self.next_ticket.load(Ordering::SeqCst);
        if latest != ticket {
            debug!("Catalog load #{ticket} superseded by #{latest}");
            return Ok(CatalogLoad::Superseded);
        }
        *current = Arc::clone(&fresh);
        info!("Catalog snapshot #{ticket} applied: {} products", fresh.len());

        Ok(CatalogLoad::Applied(fresh))
    }

    /// Lookup in the current snapshot. Never fetches, so the result may be stale.
    pub async fn get(&self, product_id: ProductId) -> ClientResult<Product> {
        self.snapshot
            .read()
            .await
            .get(product_id)
            .cloned()
            .ok_or_else(|| ClientError::product_not_found(product_id.0))
    }

    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }

    /// Criteria of the most recently issued load, whether or not it succeeded
    pub async fn active_criteria(&self) -> FilterCriteria {
        self.active_criteria.read().await.clone()
    }

    pub async fn load_categories(&self) -> ClientResult<Vec<Category>> {
        let categories = self.api.list_categories().await?;
        *self.categories.write().await = categories.clone();
        debug!("Loaded {} categories", categories.len());
        Ok(categories)
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.categories.read().await.clone()
    }
}
