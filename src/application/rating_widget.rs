//! Rating widget state machine
//!
//! ```text
//! Closed --open--> Open(p) --hover(n)--> Hovering(p, n) --leave--> Open(p)
//!                    |                        |
//!                    +------begin_submit------+--> Submitting(p, n)
//!                                                   |-- success --> Closed
//!                                                   '-- failure --> Open(p)
//! ```
//!
//! Transitions are synchronous and never touch the network; the client
//! drives the actual submission between `begin_submit` and `complete`.

use tracing::debug;

use crate::domain::entities::{RatingValue, UserId};
use crate::domain::errors::{ClientError, ClientResult};
use crate::domain::product::ProductId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatingWidgetState {
    #[default]
    Closed,
    Open {
        product: ProductId,
    },
    Hovering {
        product: ProductId,
        stars: u8,
    },
    Submitting {
        product: ProductId,
        rating: RatingValue,
    },
}

#[derive(Debug, Default)]
pub struct RatingWidget {
    state: RatingWidgetState,
}

impl RatingWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn state(&self) -> RatingWidgetState {
        self.state
    }

    pub const fn is_submitting(&self) -> bool {
        matches!(self.state, RatingWidgetState::Submitting { .. })
    }

    /// Show the widget for `product`, discarding any previous hover
    pub fn open(&mut self, product: ProductId) {
        self.state = RatingWidgetState::Open { product };
    }

    pub fn close(&mut self) {
        self.state = RatingWidgetState::Closed;
    }

    /// Pointer entered star `stars`. Returns the preview count to render,
    /// or `None` when the widget is not accepting input.
    pub fn hover(&mut self, stars: u8) -> Option<u8> {
        if stars == 0 {
            return self.leave();
        }
        let stars = stars.min(RatingValue::MAX);
        match self.state {
            RatingWidgetState::Open { product } | RatingWidgetState::Hovering { product, .. } => {
                self.state = RatingWidgetState::Hovering { product, stars };
                Some(stars)
            }
            RatingWidgetState::Closed | RatingWidgetState::Submitting { .. } => None,
        }
    }

    /// Pointer left the rating control: back to no highlighted stars
    pub fn leave(&mut self) -> Option<u8> {
        match self.state {
            RatingWidgetState::Open { .. } => Some(0),
            RatingWidgetState::Hovering { product, .. } => {
                self.state = RatingWidgetState::Open { product };
                Some(0)
            }
            RatingWidgetState::Closed | RatingWidgetState::Submitting { .. } => None,
        }
    }

    /// Commit `rating` for the open product on behalf of `user`.
    ///
    /// Refused with the state unchanged when there is no session user,
    /// nothing is open, or a submission is already in flight.
    pub fn begin_submit(&mut self, rating: RatingValue, user: Option<UserId>) -> ClientResult<(UserId, ProductId)> {
        let user = user.ok_or(ClientError::InvalidSession)?;
        let product = match self.state {
            RatingWidgetState::Closed => return Err(ClientError::RatingWidgetClosed),
            RatingWidgetState::Submitting { product, .. } => {
                return Err(ClientError::RatingInProgress(product.0));
            }
            RatingWidgetState::Open { product } | RatingWidgetState::Hovering { product, .. } => product,
        };

        self.state = RatingWidgetState::Submitting { product, rating };
        Ok((user, product))
    }

    /// Finish an in-flight submission. Returns `false`, leaving the state
    /// alone, if the widget was closed or reopened on another product meanwhile.
    pub fn complete(&mut self, product: ProductId, success: bool) -> bool {
        match self.state {
            RatingWidgetState::Submitting { product: p, .. } if p == product => {
                self.state = if success {
                    RatingWidgetState::Closed
                } else {
                    RatingWidgetState::Open { product }
                };
                true
            }
            other => {
                debug!("Ignoring completion for product {product} in state {other:?}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five() -> RatingValue {
        RatingValue::new(5).unwrap()
    }

    #[test]
    fn test_hover_and_leave_cycle() {
        let mut widget = RatingWidget::new();
        widget.open(ProductId(42));

        assert_eq!(widget.hover(3), Some(3));
        assert_eq!(
            widget.state(),
            RatingWidgetState::Hovering {
                product: ProductId(42),
                stars: 3
            }
        );
        assert_eq!(widget.leave(), Some(0));
        assert_eq!(widget.state(), RatingWidgetState::Open { product: ProductId(42) });
    }

    #[test]
    fn test_hover_is_ignored_when_closed() {
        let mut widget = RatingWidget::new();
        assert_eq!(widget.hover(4), None);
        assert_eq!(widget.leave(), None);
        assert_eq!(widget.state(), RatingWidgetState::Closed);
    }

    #[test]
    fn test_hover_clamps_to_five() {
        let mut widget = RatingWidget::new();
        widget.open(ProductId(1));
        assert_eq!(widget.hover(9), Some(5));
        assert_eq!(widget.hover(0), Some(0));
        assert_eq!(widget.state(), RatingWidgetState::Open { product: ProductId(1) });
    }

    #[test]
    fn test_submit_requires_user() {
        let mut widget = RatingWidget::new();
        widget.open(ProductId(42));
        widget.hover(5);

        assert_eq!(widget.begin_submit(five(), None), Err(ClientError::InvalidSession));
        assert_eq!(
            widget.state(),
            RatingWidgetState::Hovering {
                product: ProductId(42),
                stars: 5
            }
        );
    }

    #[test]
    fn test_missing_user_reported_before_closed_widget() {
        let mut widget = RatingWidget::new();
        assert_eq!(widget.begin_submit(five(), None), Err(ClientError::InvalidSession));
    }

    #[test]
    fn test_submit_requires_open_widget() {
        let mut widget = RatingWidget::new();
        assert_eq!(
            widget.begin_submit(five(), Some(UserId(1))),
            Err(ClientError::RatingWidgetClosed)
        );
    }

    #[test]
    fn test_success_closes_failure_reopens() {
        let mut widget = RatingWidget::new();
        widget.open(ProductId(42));

        assert_eq!(
            widget.begin_submit(five(), Some(UserId(1))),
            Ok((UserId(1), ProductId(42)))
        );
        assert!(widget.is_submitting());
        assert_eq!(
            widget.begin_submit(five(), Some(UserId(1))),
            Err(ClientError::RatingInProgress(42))
        );

        assert!(widget.complete(ProductId(42), false));
        assert_eq!(widget.state(), RatingWidgetState::Open { product: ProductId(42) });

        widget.begin_submit(five(), Some(UserId(1))).unwrap();
        assert!(widget.complete(ProductId(42), true));
        assert_eq!(widget.state(), RatingWidgetState::Closed);
    }

    #[test]
    fn test_completion_after_reopen_is_ignored() {
        let mut widget = RatingWidget::new();
        widget.open(ProductId(42));
        widget.begin_submit(five(), Some(UserId(1))).unwrap();
        widget.open(ProductId(7));

        assert!(!widget.complete(ProductId(42), true));
        assert_eq!(widget.state(), RatingWidgetState::Open { product: ProductId(7) });
    }
}
