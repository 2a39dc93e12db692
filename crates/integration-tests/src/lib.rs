//! Integration tests for the CrewLab cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p crewlab-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Add/adjust/remove through a session and what each page draws
//! - `checkout_flow` - Shipping selection and checkout form validation
//! - `persistence` - Reloading, corrupt data and storage failures on disk
//!
//! Every test gets its own temporary data directory through [`TestContext`],
//! so tests never share a persisted cart.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use crewlab_cart::{
    CartConfig, CartSession, CheckoutFields, FieldKind, FileStorage, Storage, TextTarget,
};
use tempfile::TempDir;

/// Shared handle to a page's drawn surfaces.
pub type Page = Rc<RefCell<TextTarget>>;

/// A temporary data directory plus the configuration pointing at it.
pub struct TestContext {
    dir: TempDir,
    pub config: CartConfig,
}

impl TestContext {
    /// Create a context with default settings over a fresh directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = CartConfig {
            data_dir: dir.path().to_path_buf(),
            ..CartConfig::default()
        };
        Self { dir, config }
    }

    /// Open a session, as a page load would.
    #[must_use]
    pub fn open(&self) -> CartSession<FileStorage> {
        CartSession::from_config(self.config.file_storage(), &self.config)
    }

    /// Open a session with a page showing every surface.
    #[must_use]
    pub fn open_page(&self) -> (CartSession<FileStorage>, Page) {
        let mut session = self.open();
        let page = Rc::new(RefCell::new(TextTarget::full()));
        session.register(Box::new(Rc::clone(&page)));
        (session, page)
    }

    /// Raw persisted value, if any.
    ///
    /// # Panics
    ///
    /// Panics if the stored file cannot be read.
    #[must_use]
    pub fn stored(&self) -> Option<String> {
        self.config
            .file_storage()
            .get_item(&self.config.storage_key)
            .expect("Failed to read stored cart")
    }

    /// Overwrite the persisted value with arbitrary text.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_raw(&self, raw: &str) {
        fs::write(
            self.dir.path().join(format!("{}.json", self.config.storage_key)),
            raw,
        )
        .expect("Failed to write stored cart");
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A fully filled checkout form shipping to `province`.
#[must_use]
pub fn checkout_fields(province: &str) -> CheckoutFields {
    CheckoutFields::new()
        .with(FieldKind::Name, "Ana")
        .with(FieldKind::Surname, "Pérez")
        .with(FieldKind::NationalId, "30123456")
        .with(FieldKind::Street, "Av. Colón")
        .with(FieldKind::StreetNumber, "1234")
        .with(FieldKind::PostalCode, "5000")
        .with(FieldKind::City, "Córdoba")
        .with(FieldKind::Province, province)
        .with(FieldKind::Category, "femenino")
}
