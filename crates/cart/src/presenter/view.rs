//! Display data pushed to render targets.
//!
//! Views hold already-formatted strings. The numeric contract lives in
//! [`Totals`]; formatting is layered on top here.

use crewlab_core::{LineItem, format_amount};
use rust_decimal::Decimal;

use crate::totals::{ShippingSelection, Totals};

/// Text shown where an amount cannot be computed.
pub const UNAVAILABLE: &str = "no disponible";

/// Format an amount as pesos (e.g., "$15.000").
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    format!("${}", format_amount(amount))
}

fn format_optional(amount: Option<Decimal>) -> String {
    amount.map_or_else(|| UNAVAILABLE.to_string(), format_price)
}

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    /// Position in the cart; controls send it back to mutate this line.
    pub index: usize,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl CartItemView {
    fn new(index: usize, line: &LineItem) -> Self {
        Self {
            index,
            name: line.name.to_string(),
            quantity: line.quantity.get(),
            price: line.unit_price.display(),
            line_price: format_optional(line.line_total()),
        }
    }
}

/// Whole-cart display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub shipping_label: &'static str,
    pub shipping: String,
    pub total: String,
    pub item_count: u64,
    /// Raw numbers the strings were formatted from.
    pub totals: Totals,
}

impl CartView {
    /// Build the view for a snapshot.
    #[must_use]
    pub fn new(lines: &[LineItem], selection: &ShippingSelection, totals: Totals) -> Self {
        Self {
            items: lines
                .iter()
                .enumerate()
                .map(|(index, line)| CartItemView::new(index, line))
                .collect(),
            subtotal: format_price(totals.subtotal),
            shipping_label: selection.method.label(),
            shipping: format_optional(totals.shipping),
            total: format_optional(totals.total),
            item_count: totals.unit_count,
            totals,
        }
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Badge state for this view.
    #[must_use]
    pub const fn badge(&self) -> BadgeView {
        BadgeView::from_count(self.item_count)
    }
}

/// Cart icon counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeView {
    /// No units in the cart.
    Empty,
    /// Number of units, always > 0.
    Count(u64),
}

impl BadgeView {
    /// Badge for a unit count.
    #[must_use]
    pub const fn from_count(count: u64) -> Self {
        if count == 0 {
            Self::Empty
        } else {
            Self::Count(count)
        }
    }

    /// Visible badge text; empty when the cart is empty.
    #[must_use]
    pub fn text(self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Count(n) => n.to_string(),
        }
    }

    /// Accessible label for the cart icon.
    #[must_use]
    pub fn aria_label(self) -> String {
        match self {
            Self::Empty => "Carrito vacío".to_string(),
            Self::Count(n) => format!("Carrito: {n} artículos"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crewlab_core::{Price, ProductName, Quantity};

    use super::*;
    use crate::totals::{ShippingMethod, TotalsCalculator};

    #[test]
    fn test_badge() {
        assert_eq!(BadgeView::from_count(0), BadgeView::Empty);
        assert_eq!(BadgeView::Empty.text(), "");
        assert_eq!(BadgeView::Empty.aria_label(), "Carrito vacío");
        assert_eq!(BadgeView::from_count(3).text(), "3");
        assert_eq!(BadgeView::from_count(3).aria_label(), "Carrito: 3 artículos");
    }

    #[test]
    fn test_cart_view_formatting() {
        let lines = [LineItem::new(
            ProductName::parse("Remera").unwrap(),
            Price::from_f64(5000.0).unwrap(),
            Quantity::new(3).unwrap(),
        )];
        let selection = ShippingSelection::new(ShippingMethod::Express, "Mendoza");
        let totals = TotalsCalculator::default().totals(&lines, &selection);
        let view = CartView::new(&lines, &selection, totals);

        assert_eq!(view.items[0].price, "$5.000");
        assert_eq!(view.items[0].line_price, "$15.000");
        assert_eq!(view.subtotal, "$15.000");
        assert_eq!(view.shipping_label, "Envío Express");
        assert_eq!(view.shipping, UNAVAILABLE);
        assert_eq!(view.total, UNAVAILABLE);
        assert_eq!(view.badge(), BadgeView::Count(3));
    }
}
