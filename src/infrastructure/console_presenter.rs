//! Headless presenter that renders view-models as log lines
//!
//! Used by the console binary. Human-readable summaries go out at `info`;
//! the full view-model JSON follows at `debug` for front-end debugging.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::application::presenter::Presenter;
use crate::application::view_model::{ProductCard, ProductDetailView, STAR_SLOTS, SelectOption};
use crate::domain::events::{CartControl, ControlLocation, GridTarget};

const TARGET: &str = "presenter";

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePresenter;

impl ConsolePresenter {
    pub const fn new() -> Self {
        Self
    }

    fn dump<T: Serialize + ?Sized>(label: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => debug!(target: TARGET, "{label}: {json}"),
            Err(e) => warn!(target: TARGET, "Failed to serialize {label}: {e}"),
        }
    }

    fn card_line(card: &ProductCard) -> String {
        format!(
            "#{:<4} {:<32} {:<14} {} {} {:>10}  [{}]",
            card.id,
            card.name,
            card.category,
            card.stars.glyphs,
            card.rating_count_label,
            card.price,
            card.brand
        )
    }

    fn control_label(control: CartControl) -> String {
        match control.location {
            ControlLocation::Grid(grid) => format!("product {} in {grid}", control.product_id),
            ControlLocation::Detail => format!("product {} in detail view", control.product_id),
        }
    }
}

impl Presenter for ConsolePresenter {
    fn render_list(&self, target: GridTarget, cards: &[ProductCard]) {
        info!(target: TARGET, "── {} ({}) ──", target, cards.len());
        for card in cards {
            info!(target: TARGET, "{}", Self::card_line(card));
        }
        Self::dump(target.as_str(), cards);
    }

    fn render_empty(&self, target: GridTarget, message: &str) {
        info!(target: TARGET, "── {} ── {}", target, message);
    }

    fn render_error(&self, target: GridTarget, message: &str) {
        warn!(target: TARGET, "── {} ── {}", target, message);
    }

    fn render_detail(&self, detail: &ProductDetailView) {
        info!(target: TARGET, "┌ {} (#{})", detail.title, detail.id);
        info!(target: TARGET, "│ {} · {}", detail.brand, detail.category);
        info!(target: TARGET, "│ {} {}  {}", detail.stars.glyphs, detail.rating_count_label, detail.price);
        if !detail.description.is_empty() {
            info!(target: TARGET, "│ {}", detail.description);
        }
        for feature in &detail.features {
            info!(target: TARGET, "│  • {}", feature);
        }
        info!(target: TARGET, "└ {} (rate 1-{})", detail.rating_prompt, STAR_SLOTS);
        Self::dump("detail", detail);
    }

    fn close_detail(&self) {
        info!(target: TARGET, "Detail view closed");
    }

    fn render_star_preview(&self, count: u8) {
        let lit = usize::from(count.min(STAR_SLOTS));
        let preview: String = std::iter::repeat_n('★', lit)
            .chain(std::iter::repeat_n('☆', usize::from(STAR_SLOTS) - lit))
            .collect();
        info!(target: TARGET, "Rating preview: {}", preview);
    }

    fn show_added_to_cart_feedback(&self, control: CartControl) {
        info!(target: TARGET, "✓ Added! ({})", Self::control_label(control));
    }

    fn reset_cart_feedback(&self, control: CartControl) {
        debug!(target: TARGET, "Cart feedback reset for {}", Self::control_label(control));
    }

    fn render_users(&self, options: &[SelectOption], selected: Option<&str>) {
        for option in options {
            let marker = if Some(option.value.as_str()) == selected { '*' } else { ' ' };
            info!(target: TARGET, "{} user {}: {}", marker, option.value, option.label);
        }
    }

    fn render_categories(&self, options: &[SelectOption]) {
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        info!(target: TARGET, "Categories: {}", labels.join(", "));
    }

    fn show_advisory(&self, message: &str) {
        info!(target: TARGET, "» {}", message);
    }

    fn prompt_user_selection(&self, message: &str) {
        warn!(target: TARGET, "» {} (use `user <id>`)", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::view_model::ViewModelProjector;
    use crate::domain::product::ProductId;
    use crate::test_utils::sample_product;

    #[test]
    fn test_card_line_contains_price_and_stars() {
        let card = ViewModelProjector::default().card(&sample_product(3, "Desk Lamp", "Home", 39.5));
        let line = ConsolePresenter::card_line(&card);
        assert!(line.contains("Desk Lamp"));
        assert!(line.contains("$39.50"));
        assert!(line.contains("★★★★☆"));
    }

    #[test]
    fn test_control_label_names_location() {
        let label = ConsolePresenter::control_label(CartControl::in_detail(ProductId(9)));
        assert_eq!(label, "product 9 in detail view");
        let label =
            ConsolePresenter::control_label(CartControl::in_grid(ProductId(9), GridTarget::Recommendations));
        assert_eq!(label, "product 9 in recommendations");
    }
}
