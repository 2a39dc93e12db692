//! CrewLab Core - Shared cart types.
//!
//! This crate provides the value types used by every CrewLab cart component:
//! - `cart` - Cart state, persistence, totals, rendering and checkout validation
//! - `cli` - Command-line driver over a file-backed cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! rendering. Each type validates itself on construction, so a `LineItem`
//! built from these parts always holds a non-empty name, a finite
//! non-negative price and a quantity of at least one.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product names, prices and quantities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
