//! Domain entities
//!
//! Users, ratings, interaction events and the read-side records the backend
//! hands back for history, reviews and statistics.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::errors::ClientError;
use crate::domain::product::{Product, ProductId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for UserId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub preferences: serde_json::Value,
}

/// Free-form preference document stored per user (preferred categories, brands, ...)
pub type UserPreferences = serde_json::Map<String, serde_json::Value>;

/// A star count the rating control can produce: 1 through 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RatingValue(u8);

impl RatingValue {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(stars: u8) -> Result<Self, ClientError> {
        if (Self::MIN..=Self::MAX).contains(&stars) {
            Ok(Self(stars))
        } else {
            Err(ClientError::InvalidRating(stars))
        }
    }

    pub const fn stars(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for RatingValue {
    type Error = ClientError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RatingValue> for u8 {
    fn from(value: RatingValue) -> Self {
        value.0
    }
}

impl fmt::Display for RatingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body of `POST /ratings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSubmission {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub rating: RatingValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
}

/// Implicit-feedback action kinds understood by `/history`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    View,
    Click,
    AddToCart,
    Purchase,
    #[serde(other)]
    Other,
}

impl ActionType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Click => "click",
            Self::AddToCart => "add_to_cart",
            Self::Purchase => "purchase",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /history/{user_id}`. User and timestamp are implicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub product_id: ProductId,
    pub action_type: ActionType,
}

/// One row of `GET /history/{user_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub action_type: ActionType,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub product: Option<Product>,
}

/// One row of `GET /ratings/{product_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub id: u64,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub rating: f64,
    #[serde(default)]
    pub review: Option<String>,
    pub timestamp: NaiveDateTime,
}

/// `GET /stats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_products: u64,
    pub total_users: u64,
    pub total_ratings: u64,
    #[serde(default)]
    pub categories: BTreeMap<String, u64>,
}
