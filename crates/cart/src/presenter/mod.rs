//! Redraws every registered UI surface from the current cart.
//!
//! # Architecture
//!
//! A page registers one [`RenderTarget`] describing which surfaces it has:
//!
//! - badge - the unit counter on the cart icon
//! - list - the cart modal with per-line controls
//! - summary - the checkout page's order summary with shipping and totals
//!
//! The presenter asks each target which surfaces exist and only draws those,
//! so a page without a checkout summary is never asked to show one.
//!
//! Rendering always starts from the snapshot it is handed and overwrites
//! whatever the surface showed before. There is no diffing: calling
//! [`CartPresenter::render`] twice with the same input leaves the surfaces in
//! the same state as calling it once.

mod text;
mod view;

use std::cell::RefCell;
use std::rc::Rc;

use crewlab_core::LineItem;
use tracing::trace;

use crate::totals::{ShippingSelection, TotalsCalculator};

pub use text::TextTarget;
pub use view::{BadgeView, CartItemView, CartView, UNAVAILABLE, format_price};

/// A page's set of cart surfaces.
///
/// Every surface is optional. The `has_*` queries default to `false`, and the
/// matching `draw_*` call is only made when the query returns `true`.
pub trait RenderTarget {
    /// Whether the page shows a cart badge.
    fn has_badge(&self) -> bool {
        false
    }

    /// Overwrite the badge.
    fn draw_badge(&mut self, _badge: BadgeView) {}

    /// Whether the page has a cart list (modal).
    fn has_list(&self) -> bool {
        false
    }

    /// Overwrite the cart list.
    fn draw_list(&mut self, _view: &CartView) {}

    /// Whether the page has a checkout summary.
    fn has_summary(&self) -> bool {
        false
    }

    /// Overwrite the checkout summary.
    fn draw_summary(&mut self, _view: &CartView) {}
}

/// Shared handle, so the page keeps access to what was drawn.
impl<T: RenderTarget + ?Sized> RenderTarget for Rc<RefCell<T>> {
    fn has_badge(&self) -> bool {
        self.borrow().has_badge()
    }

    fn draw_badge(&mut self, badge: BadgeView) {
        self.borrow_mut().draw_badge(badge);
    }

    fn has_list(&self) -> bool {
        self.borrow().has_list()
    }

    fn draw_list(&mut self, view: &CartView) {
        self.borrow_mut().draw_list(view);
    }

    fn has_summary(&self) -> bool {
        self.borrow().has_summary()
    }

    fn draw_summary(&mut self, view: &CartView) {
        self.borrow_mut().draw_summary(view);
    }
}

/// Pushes cart state to registered render targets.
#[derive(Default)]
pub struct CartPresenter {
    calculator: TotalsCalculator,
    targets: Vec<Box<dyn RenderTarget>>,
}

impl std::fmt::Debug for CartPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartPresenter")
            .field("calculator", &self.calculator)
            .field("targets", &self.targets.len())
            .finish()
    }
}

impl CartPresenter {
    /// Create a presenter with no targets.
    #[must_use]
    pub const fn new(calculator: TotalsCalculator) -> Self {
        Self {
            calculator,
            targets: Vec::new(),
        }
    }

    /// Add a target to be drawn on every render.
    pub fn register(&mut self, target: Box<dyn RenderTarget>) {
        self.targets.push(target);
    }

    /// Number of registered targets.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// The calculator used for totals.
    #[must_use]
    pub const fn calculator(&self) -> &TotalsCalculator {
        &self.calculator
    }

    /// Build the view for a snapshot without drawing it.
    #[must_use]
    pub fn view(&self, lines: &[LineItem], selection: &ShippingSelection) -> CartView {
        let totals = self.calculator.totals(lines, selection);
        CartView::new(lines, selection, totals)
    }

    /// Recompute totals and redraw every present surface of every target.
    pub fn render(&mut self, lines: &[LineItem], selection: &ShippingSelection) -> CartView {
        let view = self.view(lines, selection);
        for target in &mut self.targets {
            if target.has_badge() {
                target.draw_badge(view.badge());
            }
            if target.has_list() {
                target.draw_list(&view);
            }
            if target.has_summary() {
                target.draw_summary(&view);
            }
        }
        trace!(
            targets = self.targets.len(),
            items = view.item_count,
            "Rendered cart"
        );
        view
    }
}
