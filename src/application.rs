//! Application layer module
//!
//! Stateful components (session, catalog store, rating widget), the
//! interaction tracker, the view-model projector and the orchestrating
//! `ShopClient` that ties them to a `Presenter`.

pub mod catalog_store;
pub mod interaction_tracker;
pub mod presenter;
pub mod rating_widget;
pub mod session;
pub mod shop_client;
pub mod view_model;

// Re-export commonly used items
pub use catalog_store::{CatalogLoad, CatalogSnapshot, CatalogStore};
pub use interaction_tracker::InteractionTracker;
pub use presenter::Presenter;
pub use rating_widget::{RatingWidget, RatingWidgetState};
pub use session::SessionState;
pub use shop_client::{ClientSettings, ShopClient};
pub use view_model::{GridView, ProductCard, ProductDetailView, ViewModelProjector};
