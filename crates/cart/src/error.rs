//! Error types for cart mutation and persistence.
//!
//! Neither category is fatal. A `CartError` means the requested mutation was
//! rejected and the cart is unchanged; a `StorageError` means the in-memory
//! cart is still authoritative but may not survive a reload.

use crewlab_core::{PriceError, ProductNameError};
use thiserror::Error;

/// A rejected cart mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The product name is empty after trimming.
    #[error("Invalid product name: {0}")]
    InvalidName(#[from] ProductNameError),

    /// The unit price is not finite or is negative.
    #[error("Invalid unit price: {0}")]
    InvalidPrice(#[from] PriceError),

    /// The cart total would no longer be representable.
    #[error("Cart total out of range")]
    TotalOutOfRange,

    /// No line exists at the given index.
    #[error("Line index {index} out of range (cart has {len} lines)")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of lines in the cart.
        len: usize,
    },
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cart could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing the value would exceed the backend's byte quota.
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded {
        /// Bytes the backend would hold after the write.
        needed: usize,
        /// Configured limit.
        quota: usize,
    },

    /// The key cannot be mapped onto the backend.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}
