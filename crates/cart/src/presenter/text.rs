//! Plain-text render target.
//!
//! Used by the command-line driver and by tests to observe exactly what each
//! surface would show.

use super::{BadgeView, CartView, RenderTarget};

/// A render target that renders each surface as lines of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextTarget {
    badge: Option<String>,
    list: Option<Vec<String>>,
    summary: Option<Vec<String>>,
}

impl TextTarget {
    /// A target with no surfaces.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A target with every surface.
    #[must_use]
    pub fn full() -> Self {
        Self::new().with_badge().with_list().with_summary()
    }

    /// Enable the badge surface.
    #[must_use]
    pub fn with_badge(mut self) -> Self {
        self.badge.get_or_insert_with(String::new);
        self
    }

    /// Enable the cart list surface.
    #[must_use]
    pub fn with_list(mut self) -> Self {
        self.list.get_or_insert_with(Vec::new);
        self
    }

    /// Enable the checkout summary surface.
    #[must_use]
    pub fn with_summary(mut self) -> Self {
        self.summary.get_or_insert_with(Vec::new);
        self
    }

    /// Current badge text, if the surface exists.
    #[must_use]
    pub fn badge(&self) -> Option<&str> {
        self.badge.as_deref()
    }

    /// Current cart list lines, if the surface exists.
    #[must_use]
    pub fn list(&self) -> Option<&[String]> {
        self.list.as_deref()
    }

    /// Current checkout summary lines, if the surface exists.
    #[must_use]
    pub fn summary(&self) -> Option<&[String]> {
        self.summary.as_deref()
    }
}

impl RenderTarget for TextTarget {
    fn has_badge(&self) -> bool {
        self.badge.is_some()
    }

    fn draw_badge(&mut self, badge: BadgeView) {
        if let Some(slot) = self.badge.as_mut() {
            *slot = match badge {
                BadgeView::Empty => badge.aria_label(),
                BadgeView::Count(_) => format!("[{}] {}", badge.text(), badge.aria_label()),
            };
        }
    }

    fn has_list(&self) -> bool {
        self.list.is_some()
    }

    fn draw_list(&mut self, view: &CartView) {
        let Some(slot) = self.list.as_mut() else {
            return;
        };
        slot.clear();
        slot.extend(view.items.iter().map(|item| {
            format!(
                "{}. {} x{} {} = {}",
                item.index + 1,
                item.name,
                item.quantity,
                item.price,
                item.line_price
            )
        }));
        slot.push(format!("Total: {}", view.subtotal));
    }

    fn has_summary(&self) -> bool {
        self.summary.is_some()
    }

    fn draw_summary(&mut self, view: &CartView) {
        let Some(slot) = self.summary.as_mut() else {
            return;
        };
        slot.clear();
        slot.extend(
            view.items
                .iter()
                .map(|item| format!("{} (x{}) {}", item.name, item.quantity, item.line_price)),
        );
        slot.push(format!("Total: {}", view.subtotal));
        slot.push(format!("Envío ({}): {}", view.shipping_label, view.shipping));
        slot.push(format!("Total final: {}", view.total));
    }
}
