//! Filter criteria and query-parameter encoding for `GET /products`
//!
//! Only fields that actually constrain the result are encoded; an omitted
//! parameter means "no constraint". An empty criteria set therefore encodes to
//! the same (empty) query as the unfiltered startup load.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Ordering the backend applies to the product list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Name,
    PriceAsc,
    PriceDesc,
    Rating,
}

impl SortKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::Rating => "rating",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "name" => Ok(Self::Name),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "rating" => Ok(Self::Rating),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

/// Encoded `(key, value)` pairs, in a stable order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters(Vec<(&'static str, String)>);

impl QueryParameters {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    fn push(&mut self, key: &'static str, value: String) {
        self.0.push((key, value));
    }
}

/// Search / category / sort / price-range intent for the catalog grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: SortKey,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl FilterCriteria {
    /// Criteria with every field at its default
    pub fn cleared() -> Self {
        Self::default()
    }

    /// Build criteria from the raw text of the filter controls.
    ///
    /// Blank inputs are dropped. A price that does not parse as a
    /// non-negative number is dropped with a warning, matching how the
    /// backend ignores an unparsable price parameter.
    pub fn from_inputs(search: &str, category: &str, sort: &str, min_price: &str, max_price: &str) -> Self {
        let sort = sort.parse().unwrap_or_else(|e: String| {
            warn!("{e}, falling back to name");
            SortKey::Name
        });

        Self {
            search: non_blank(search),
            category: non_blank(category),
            sort,
            min_price: parse_price("min_price", min_price),
            max_price: parse_price("max_price", max_price),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = non_blank(&search.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_blank(&category.into());
        self
    }

    pub const fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub const fn with_price_range(mut self, min_price: Option<f64>, max_price: Option<f64>) -> Self {
        self.min_price = min_price;
        self.max_price = max_price;
        self
    }

    /// True when no field constrains the result
    pub fn is_unconstrained(&self) -> bool {
        self.to_query().is_empty()
    }

    /// Encode into query parameters, omitting empty and default fields
    pub fn to_query(&self) -> QueryParameters {
        let mut query = QueryParameters::default();

        if let Some(search) = self.search.as_deref().and_then(non_blank) {
            query.push("search", search);
        }
        if let Some(category) = self.category.as_deref().and_then(non_blank) {
            query.push("category", category);
        }
        if self.sort != SortKey::default() {
            query.push("sort_by", self.sort.as_str().to_string());
        }
        if let Some(min) = self.min_price.filter(|p| p.is_finite()) {
            query.push("min_price", format_price_param(min));
        }
        if let Some(max) = self.max_price.filter(|p| p.is_finite()) {
            query.push("max_price", format_price_param(max));
        }

        query
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_price(field: &str, raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => {
            warn!("Ignoring invalid {field}: {raw:?}");
            None
        }
    }
}

// 10.0 -> "10", 9.5 -> "9.5"
fn format_price_param(value: f64) -> String {
    format!("{value}")
}
