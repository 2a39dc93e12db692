//! Cart model: the only owner and mutator of cart lines.
//!
//! # Invariants
//!
//! - No two lines share a [`ProductName`].
//! - Every line has a quantity of at least one and a finite, non-negative price.
//! - Lines keep insertion order.
//! - The subtotal plus the largest shipping surcharge fits in a `Decimal`.
//!
//! `decrement` stops at one; only `remove` and `clear` delete lines.

use crewlab_core::{LineItem, Price, ProductName, Quantity};
use tracing::{debug, warn};

use crate::error::CartError;
use crate::totals::within_range;

/// In-memory cart contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartModel {
    lines: Vec<LineItem>,
}

impl CartModel {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from existing lines, merging duplicate names.
    ///
    /// The first occurrence keeps its position and price; later duplicates
    /// only contribute their quantity. Lines that would push the total out of
    /// range are dropped.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = LineItem>) -> Self {
        let mut model = Self::new();
        for line in lines {
            if let Err(e) = model.merge(line) {
                warn!(error = %e, "Dropping line");
            }
        }
        model
    }

    /// Add `quantity` units of a product, merging with an existing line of the
    /// same name.
    ///
    /// `name` is trimmed. A `quantity` of zero counts as one. Returns the index
    /// of the affected line.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the cart untouched, if the trimmed name is
    /// empty, the price is not a finite, non-negative number, or the cart
    /// total would go out of range.
    pub fn add(&mut self, name: &str, unit_price: f64, quantity: u32) -> Result<usize, CartError> {
        let name = ProductName::parse(name)?;
        let unit_price = Price::from_f64(unit_price)?;
        self.add_item(name, unit_price, Quantity::floored(quantity))
    }

    /// Typed variant of [`add`](Self::add) for already-validated values.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TotalOutOfRange`] if the cart total would go out
    /// of range.
    pub fn add_item(
        &mut self,
        name: ProductName,
        unit_price: Price,
        quantity: Quantity,
    ) -> Result<usize, CartError> {
        self.merge(LineItem::new(name, unit_price, quantity))
    }

    /// Add one unit to the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfRange`] if no line exists at `index`,
    /// or [`CartError::TotalOutOfRange`] if the cart total would go out of
    /// range.
    pub fn increment(&mut self, index: usize) -> Result<Quantity, CartError> {
        let line = self
            .lines
            .get(index)
            .ok_or_else(|| self.out_of_range(index))?;
        let candidate = LineItem::new(
            line.name.clone(),
            line.unit_price,
            line.quantity.incremented(),
        );
        let quantity = candidate.quantity;
        self.replace(index, candidate)?;
        Ok(quantity)
    }

    /// Remove one unit from the line at `index`, never going below one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfRange`] if no line exists at `index`.
    pub fn decrement(&mut self, index: usize) -> Result<Quantity, CartError> {
        let line = self.line_mut(index)?;
        line.quantity = line.quantity.decremented();
        Ok(line.quantity)
    }

    /// Delete the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfRange`] if no line exists at `index`.
    pub fn remove(&mut self, index: usize) -> Result<LineItem, CartError> {
        if index >= self.lines.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.lines.remove(index))
    }

    /// Delete every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Owned snapshot of the current lines.
    #[must_use]
    pub fn list(&self) -> Vec<LineItem> {
        self.lines.clone()
    }

    /// Borrowed view of the current lines.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        unit_count(&self.lines)
    }

    fn merge(&mut self, item: LineItem) -> Result<usize, CartError> {
        let existing = self.lines.iter().position(|l| l.name == item.name);
        if let Some((index, line)) = existing.and_then(|i| self.lines.get(i).map(|l| (i, l))) {
            let merged = LineItem::new(
                line.name.clone(),
                line.unit_price,
                line.quantity.saturating_add(item.quantity),
            );
            debug!(name = %merged.name, quantity = %merged.quantity, "Merging into existing line");
            self.replace(index, merged)?;
            return Ok(index);
        }

        if !within_range(self.lines.iter().chain([&item])) {
            return Err(CartError::TotalOutOfRange);
        }
        debug!(name = %item.name, quantity = %item.quantity, "Appended new line");
        self.lines.push(item);
        Ok(self.lines.len() - 1)
    }

    /// Swap in `candidate` at `index` if the resulting cart stays in range.
    fn replace(&mut self, index: usize, candidate: LineItem) -> Result<(), CartError> {
        let others = self
            .lines
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != index)
            .map(|(_, l)| l);
        if !within_range(others.chain([&candidate])) {
            return Err(CartError::TotalOutOfRange);
        }
        let line = self.line_mut(index)?;
        *line = candidate;
        Ok(())
    }

    fn line_mut(&mut self, index: usize) -> Result<&mut LineItem, CartError> {
        let len = self.lines.len();
        self.lines
            .get_mut(index)
            .ok_or(CartError::IndexOutOfRange { index, len })
    }

    fn out_of_range(&self, index: usize) -> CartError {
        CartError::IndexOutOfRange {
            index,
            len: self.lines.len(),
        }
    }
}

/// Total units across `lines`.
#[must_use]
pub fn unit_count(lines: &[LineItem]) -> u64 {
    lines.iter().map(|l| u64::from(l.quantity.get())).sum()
}
