//! Cart line item.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Price, ProductName, Quantity};

/// One line of the cart: a product, its unit price and how many units.
///
/// Each field validates itself, so any `LineItem` satisfies the per-line
/// invariants. Uniqueness of `name` across a cart is owned by the cart model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Display label and identity key.
    pub name: ProductName,
    /// Price of a single unit.
    pub unit_price: Price,
    /// Number of units, at least one.
    pub quantity: Quantity,
}

impl LineItem {
    /// Create a new line item.
    #[must_use]
    pub const fn new(name: ProductName, unit_price: Price, quantity: Quantity) -> Self {
        Self {
            name,
            unit_price,
            quantity,
        }
    }

    /// `unit_price * quantity`, or `None` if the product does not fit in a
    /// [`Decimal`].
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price
            .amount()
            .checked_mul(Decimal::from(self.quantity.get()))
    }
}
