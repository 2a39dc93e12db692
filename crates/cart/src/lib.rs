//! CrewLab cart library.
//!
//! Client-side cart engine for the CrewLab storefront: the line-item model,
//! its persisted copy, shipping and totals math, surface rendering and the
//! checkout form gate.
//!
//! # Architecture
//!
//! ```text
//! event ──► CartSession ──► CartModel ──► PersistedStore ──► Storage
//!                 │                                     (memory / file)
//!                 ├──► CartPresenter ──► RenderTarget(s)
//!                 └──► CheckoutValidator ──► TotalsCalculator
//! ```
//!
//! [`CartSession`] is the single writer. Every accepted mutation is persisted
//! and then redrawn on every registered surface before the call returns.
//! Persistence is best-effort: a storage failure is logged and the in-memory
//! cart stays authoritative.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod error;
pub mod model;
pub mod presenter;
pub mod session;
pub mod storage;
pub mod store;
pub mod totals;

pub use checkout::{
    CheckoutFields, CheckoutRejection, CheckoutValidator, FieldKind, ReasonKind, UnknownField,
};
pub use config::{CartConfig, ConfigError};
pub use error::{CartError, StorageError};
pub use model::CartModel;
pub use presenter::{BadgeView, CartPresenter, CartView, RenderTarget, TextTarget};
pub use session::{CONFIRMATION_MESSAGE, CartSession, CheckoutOutcome, EMPTY_CART_NOTICE};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{DEFAULT_STORAGE_KEY, PersistedStore};
pub use totals::{ShippingMethod, ShippingSelection, Totals, TotalsCalculator};
