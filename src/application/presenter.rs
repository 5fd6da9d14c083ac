//! Presentation boundary
//!
//! The client pushes finished view-models through this trait and never reads
//! anything back from the rendering layer.

use crate::application::view_model::{GridView, ProductCard, ProductDetailView, SelectOption};
use crate::domain::events::{CartControl, GridTarget};

pub trait Presenter: Send + Sync {
    fn render_list(&self, target: GridTarget, cards: &[ProductCard]);
    fn render_empty(&self, target: GridTarget, message: &str);
    fn render_error(&self, target: GridTarget, message: &str);

    fn render_detail(&self, detail: &ProductDetailView);
    fn close_detail(&self);

    /// Highlight the first `count` rating stars; zero clears the highlight
    fn render_star_preview(&self, count: u8);

    fn show_added_to_cart_feedback(&self, control: CartControl);
    fn reset_cart_feedback(&self, control: CartControl);

    fn render_users(&self, options: &[SelectOption], selected: Option<&str>);
    fn render_categories(&self, options: &[SelectOption]);

    /// One-off notice (rating thanks, submission failure, ...)
    fn show_advisory(&self, message: &str);
    /// Ask the shopper to pick a user before retrying an action
    fn prompt_user_selection(&self, message: &str);

    /// Dispatch a projected grid to the matching render call
    fn render_grid(&self, target: GridTarget, view: &GridView) {
        match view {
            GridView::Cards { cards } => self.render_list(target, cards),
            GridView::Empty { message } => self.render_empty(target, message),
            GridView::Failed { message } => self.render_error(target, message),
        }
    }
}
