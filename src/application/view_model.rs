//! View-model projection
//!
//! Pure mapping from backend records to display-ready structures. No I/O and
//! no mutation of the source records: display fallbacks (brand, image) live
//! only in the projected values.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::domain::entities::{HistoryEntry, RatingValue, User};
use crate::domain::events::GridTarget;
use crate::domain::product::{Category, Product};
use crate::infrastructure::config::UiConfig;

pub const FULL_STAR: char = '★';
pub const HALF_STAR: char = '⯨';
pub const EMPTY_STAR: char = '☆';
pub const STAR_SLOTS: u8 = 5;

/// Displayed when a product has no brand
pub const GENERIC_BRAND: &str = "Generic";

pub const NO_MATCHING_PRODUCTS: &str = "No products found matching your criteria";
pub const NO_RECOMMENDATIONS_YET: &str =
    "No recommendations yet. Browse products to get personalized suggestions!";
pub const FAILED_TO_LOAD_PRODUCTS: &str = "Failed to load products";
pub const FAILED_TO_FILTER_PRODUCTS: &str = "Failed to filter products";
pub const FAILED_TO_LOAD_RECOMMENDATIONS: &str = "Failed to load recommendations";
pub const FAILED_TO_LOAD_DETAILS: &str = "Failed to load product details";

/// Five-slot star rendering of an average rating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StarRating {
    pub full: u8,
    pub half: bool,
    pub empty: u8,
    pub glyphs: String,
}

/// Project a rating in `[0, 5]` onto exactly five glyphs.
///
/// Out-of-range input is clamped; a non-finite rating renders as zero stars.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn render_stars(rating: f64) -> StarRating {
    let rating = if rating.is_finite() {
        rating.clamp(0.0, f64::from(STAR_SLOTS))
    } else {
        0.0
    };

    let full = rating.floor() as u8;
    let half = full < STAR_SLOTS && rating.fract() >= 0.5;
    let empty = STAR_SLOTS - full - u8::from(half);

    let mut glyphs = String::with_capacity(usize::from(STAR_SLOTS) * 3);
    glyphs.extend(std::iter::repeat_n(FULL_STAR, usize::from(full)));
    if half {
        glyphs.push(HALF_STAR);
    }
    glyphs.extend(std::iter::repeat_n(EMPTY_STAR, usize::from(empty)));

    StarRating {
        full,
        half,
        empty,
        glyphs,
    }
}

/// Product card in a grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductCard {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub brand: String,
    pub stars: StarRating,
    pub rating_count_label: String,
    pub price: String,
    /// Primary image, or the placeholder when the record has none
    pub image_url: String,
    /// Substitute for `image_url` if it fails to load
    pub fallback_image_url: String,
}

/// Full product detail view, including the rating control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDetailView {
    pub id: u32,
    pub title: String,
    pub category: String,
    pub brand: String,
    pub stars: StarRating,
    pub rating_count_label: String,
    pub price: String,
    pub image_url: String,
    pub fallback_image_url: String,
    pub description: String,
    pub features: Vec<String>,
    pub rating_choices: Vec<u8>,
    pub rating_prompt: String,
}

/// What a grid should show: cards, the "nothing here" state, or the failure state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum GridView {
    Cards { cards: Vec<ProductCard> },
    Empty { message: String },
    Failed { message: String },
}

impl GridView {
    pub const fn is_empty_state(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Entry of a `<select>`-style control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HistoryRow {
    pub product: String,
    pub action: String,
    pub timestamp: String,
}

/// Maps records to view-models using the configured currency and placeholder image
#[derive(Debug, Clone)]
pub struct ViewModelProjector {
    currency_symbol: String,
    placeholder_image_url: String,
}

impl ViewModelProjector {
    pub fn new(ui: &UiConfig) -> Self {
        Self {
            currency_symbol: ui.currency_symbol.clone(),
            placeholder_image_url: ui.placeholder_image_url.clone(),
        }
    }

    pub fn format_price(&self, price: f64) -> String {
        format!("{}{price:.2}", self.currency_symbol)
    }

    pub fn display_brand(product: &Product) -> String {
        product.brand().unwrap_or(GENERIC_BRAND).to_string()
    }

    fn image_url(&self, product: &Product) -> String {
        product
            .image_url()
            .unwrap_or(&self.placeholder_image_url)
            .to_string()
    }

    pub fn placeholder_image_url(&self) -> &str {
        &self.placeholder_image_url
    }

    pub fn card(&self, product: &Product) -> ProductCard {
        ProductCard {
            id: product.id.0,
            name: product.name.clone(),
            category: product.category.clone(),
            brand: Self::display_brand(product),
            stars: render_stars(product.rating),
            rating_count_label: format!("({})", product.num_ratings),
            price: self.format_price(product.price),
            image_url: self.image_url(product),
            fallback_image_url: self.placeholder_image_url.clone(),
        }
    }

    pub fn detail(&self, product: &Product) -> ProductDetailView {
        ProductDetailView {
            id: product.id.0,
            title: product.name.clone(),
            category: product.category.clone(),
            brand: Self::display_brand(product),
            stars: render_stars(product.rating),
            rating_count_label: format!("({} ratings)", product.num_ratings),
            price: self.format_price(product.price),
            image_url: self.image_url(product),
            fallback_image_url: self.placeholder_image_url.clone(),
            description: product.description.clone().unwrap_or_default(),
            features: product.features.clone(),
            rating_choices: (RatingValue::MIN..=RatingValue::MAX).collect(),
            rating_prompt: "Click to rate this product".to_string(),
        }
    }

    /// Project a successfully fetched list for `target`
    pub fn grid(&self, target: GridTarget, products: &[Product]) -> GridView {
        if products.is_empty() {
            let message = match target {
                GridTarget::Products => NO_MATCHING_PRODUCTS,
                GridTarget::Recommendations => NO_RECOMMENDATIONS_YET,
            };
            return GridView::Empty {
                message: message.to_string(),
            };
        }

        GridView::Cards {
            cards: products.iter().map(|p| self.card(p)).collect(),
        }
    }

    /// Failure state for `target`; `filtered` distinguishes a filter request from a plain load
    pub fn failed_grid(target: GridTarget, filtered: bool) -> GridView {
        let message = match (target, filtered) {
            (GridTarget::Products, false) => FAILED_TO_LOAD_PRODUCTS,
            (GridTarget::Products, true) => FAILED_TO_FILTER_PRODUCTS,
            (GridTarget::Recommendations, _) => FAILED_TO_LOAD_RECOMMENDATIONS,
        };
        GridView::Failed {
            message: message.to_string(),
        }
    }

    pub fn user_options(users: &[User]) -> Vec<SelectOption> {
        users
            .iter()
            .map(|u| SelectOption {
                value: u.id.to_string(),
                label: u.name.clone(),
            })
            .collect()
    }

    /// Category choices, led by the "All Categories" entry that clears the constraint
    pub fn category_options(categories: &[Category]) -> Vec<SelectOption> {
        std::iter::once(SelectOption {
            value: String::new(),
            label: "All Categories".to_string(),
        })
        .chain(categories.iter().map(|c| SelectOption {
            value: c.clone(),
            label: c.clone(),
        }))
        .collect()
    }

    pub fn history_rows(entries: &[HistoryEntry]) -> Vec<HistoryRow> {
        entries
            .iter()
            .map(|e| HistoryRow {
                product: e
                    .product
                    .as_ref()
                    .map_or_else(|| format!("#{}", e.product_id), |p| p.name.clone()),
                action: e.action_type.to_string(),
                timestamp: e.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            })
            .collect()
    }
}

impl Default for ViewModelProjector {
    fn default() -> Self {
        Self::new(&UiConfig::default())
    }
}
