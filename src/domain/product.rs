use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned product identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ProductId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Category label. The full set is fetched once per session.
pub type Category = String;

/// Catalog item as returned by `/products`, `/products/{id}` and `/recommendations/{user}`.
///
/// The client only ever holds a read-only snapshot of these records; display
/// fallbacks (brand, image) are applied by the projector and never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    pub price: f64,
    /// Average rating in `[0.0, 5.0]`
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_ratings: u32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub stock: Option<u32>,
}

impl Product {
    /// Brand as stored, treating an empty string the same as a missing one.
    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref().filter(|b| !b.trim().is_empty())
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|u| !u.trim().is_empty())
    }
}
