//! User intents and presentation targets
//!
//! The rendering layer translates raw input (clicks, key presses, selection
//! changes) into `UserIntent`s and hands them to the client; nothing in the
//! core refers to markup or callbacks.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::entities::{RatingValue, UserId};
use crate::domain::filter::FilterCriteria;
use crate::domain::product::ProductId;

/// Which product grid a list render is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridTarget {
    Products,
    Recommendations,
}

impl GridTarget {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Recommendations => "recommendations",
        }
    }
}

impl fmt::Display for GridTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque handle of the "add to cart" control that was activated.
///
/// The presenter owns the mapping from handle to widget; the core only passes
/// it back when showing and later resetting the "added" feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartControl {
    pub product_id: ProductId,
    pub location: ControlLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlLocation {
    Grid(GridTarget),
    Detail,
}

impl CartControl {
    pub const fn in_grid(product_id: ProductId, grid: GridTarget) -> Self {
        Self {
            product_id,
            location: ControlLocation::Grid(grid),
        }
    }

    pub const fn in_detail(product_id: ProductId) -> Self {
        Self {
            product_id,
            location: ControlLocation::Detail,
        }
    }
}

/// Everything a shopper can ask the client to do
#[derive(Debug, Clone, PartialEq)]
pub enum UserIntent {
    SelectUser(UserId),
    /// Replace only the search term, keeping the other active filters
    Search(String),
    ApplyFilters(FilterCriteria),
    ClearFilters,
    ShowProduct(ProductId),
    CloseDetail,
    HoverStar(u8),
    LeaveStars,
    Rate(RatingValue),
    AddToCart(CartControl),
}

impl UserIntent {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SelectUser(_) => "select_user",
            Self::Search(_) => "search",
            Self::ApplyFilters(_) => "apply_filters",
            Self::ClearFilters => "clear_filters",
            Self::ShowProduct(_) => "show_product",
            Self::CloseDetail => "close_detail",
            Self::HoverStar(_) => "hover_star",
            Self::LeaveStars => "leave_stars",
            Self::Rate(_) => "rate",
            Self::AddToCart(_) => "add_to_cart",
        }
    }
}
