//! Domain module - records, intents and the backend contract
//!
//! Pure types only: nothing here performs I/O or holds mutable state.

pub mod catalog_api;
pub mod entities;
pub mod errors;
pub mod events;
pub mod filter;
pub mod product;

// Re-export commonly used items
pub use catalog_api::CatalogApi;
pub use entities::{
    ActionType, CatalogStats, HistoryEntry, InteractionEvent, RatingRecord, RatingSubmission,
    RatingValue, User, UserId, UserPreferences,
};
pub use errors::{ClientError, ClientResult, Resource};
pub use events::{CartControl, ControlLocation, GridTarget, UserIntent};
pub use filter::{FilterCriteria, QueryParameters, SortKey};
pub use product::{Category, Product, ProductId};
