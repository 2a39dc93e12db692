//! Line quantity, never below one.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// A line cannot hold zero units.
    #[error("quantity must be at least 1")]
    Zero,
}

/// Number of units on a cart line. Always `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(1);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] for `0`.
    pub const fn new(units: u32) -> Result<Self, QuantityError> {
        if units == 0 {
            return Err(QuantityError::Zero);
        }
        Ok(Self(units))
    }

    /// Create a quantity, raising anything below one to one.
    #[must_use]
    pub const fn floored(units: u32) -> Self {
        if units == 0 { Self::ONE } else { Self(units) }
    }

    /// Returns the number of units.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Add `other` units, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// One more unit.
    #[must_use]
    pub const fn incremented(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// One fewer unit, stopping at one.
    #[must_use]
    pub const fn decremented(self) -> Self {
        Self::floored(self.0 - 1)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(units: u32) -> Result<Self, Self::Error> {
        Self::new(units)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero() {
        assert_eq!(Quantity::new(0), Err(QuantityError::Zero));
        assert_eq!(Quantity::new(3).unwrap().get(), 3);
    }

    #[test]
    fn test_floored() {
        assert_eq!(Quantity::floored(0), Quantity::ONE);
        assert_eq!(Quantity::floored(7).get(), 7);
    }

    #[test]
    fn test_decrement_stops_at_one() {
        let q = Quantity::new(2).unwrap();
        assert_eq!(q.decremented(), Quantity::ONE);
        assert_eq!(Quantity::ONE.decremented(), Quantity::ONE);
    }

    #[test]
    fn test_add_saturates() {
        let max = Quantity::new(u32::MAX).unwrap();
        assert_eq!(max.saturating_add(Quantity::ONE).get(), u32::MAX);
        assert_eq!(max.incremented().get(), u32::MAX);
        assert_eq!(
            Quantity::ONE.saturating_add(Quantity::new(2).unwrap()).get(),
            3
        );
    }

    #[test]
    fn test_deserialize_rejects_zero() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("4").unwrap().get(), 4);
    }
}
