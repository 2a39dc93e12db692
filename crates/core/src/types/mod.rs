//! Core types for the CrewLab cart.
//!
//! This module provides type-safe wrappers for cart domain concepts.

pub mod line_item;
pub mod name;
pub mod price;
pub mod quantity;

pub use line_item::LineItem;
pub use name::{ProductName, ProductNameError};
pub use price::{Price, PriceError, format_amount};
pub use quantity::{Quantity, QuantityError};
