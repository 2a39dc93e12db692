//! Event-facing cart session.
//!
//! `CartSession` owns the model, the persisted store and the presenter, and is
//! the only entry point pages use. Every successful mutation runs the same
//! sequence before returning:
//!
//! 1. mutate the [`CartModel`]
//! 2. persist the new lines (best-effort)
//! 3. redraw every registered surface from the model's current lines
//!
//! Rejected input leaves all three untouched. Methods take `&mut self`, so
//! there is exactly one writer at a time and a redraw can never observe a
//! half-applied mutation.

use crewlab_core::LineItem;
use tracing::{debug, info, instrument, warn};

use crate::checkout::{CheckoutFields, CheckoutRejection, CheckoutValidator, FieldKind};
use crate::config::CartConfig;
use crate::error::CartError;
use crate::model::CartModel;
use crate::presenter::{CartPresenter, CartView, RenderTarget};
use crate::storage::Storage;
use crate::store::PersistedStore;
use crate::totals::{ShippingMethod, ShippingSelection, Totals, TotalsCalculator};

/// Shown when the shopper tries to proceed to checkout with an empty cart.
pub const EMPTY_CART_NOTICE: &str = "Tu carrito está vacío. ¡Añadí tu primera prenda!";

/// Shown after an accepted checkout.
pub const CONFIRMATION_MESSAGE: &str =
    "¡Gracias por tu compra! Te enviaremos la confirmación por email.";

/// Result of submitting the checkout form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// All checks passed. Totals are those of the accepted order.
    Accepted(Totals),
    /// Exactly one check failed.
    Rejected(CheckoutRejection),
}

impl CheckoutOutcome {
    /// Whether the order was accepted.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Cart state plus the collaborators every mutation flows through.
#[derive(Debug)]
pub struct CartSession<S> {
    model: CartModel,
    store: PersistedStore<S>,
    presenter: CartPresenter,
    validator: CheckoutValidator,
    selection: ShippingSelection,
    clear_on_checkout: bool,
}

impl<S: Storage> CartSession<S> {
    /// Rehydrate a session from `store`.
    pub fn new(store: PersistedStore<S>, calculator: TotalsCalculator) -> Self {
        let model = store.load();
        Self {
            model,
            store,
            presenter: CartPresenter::new(calculator.clone()),
            validator: CheckoutValidator::new(calculator),
            selection: ShippingSelection::default(),
            clear_on_checkout: true,
        }
    }

    /// Rehydrate a session over `storage` using `config`.
    pub fn from_config(storage: S, config: &CartConfig) -> Self {
        let store = PersistedStore::new(storage, config.storage_key.clone());
        Self::new(store, config.calculator()).clear_on_checkout(config.clear_on_checkout)
    }

    /// Whether an accepted checkout empties the cart.
    #[must_use]
    pub const fn clear_on_checkout(mut self, enabled: bool) -> Self {
        self.clear_on_checkout = enabled;
        self
    }

    /// Register a page's surfaces and draw them once.
    pub fn register(&mut self, target: Box<dyn RenderTarget>) {
        self.presenter.register(target);
        self.render();
    }

    // =========================================================================
    // Cart mutations
    // =========================================================================

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns the rejection if the name is blank, the price is not a
    /// finite, non-negative number, or the cart total would go out of range.
    /// The cart is left unchanged.
    #[instrument(skip(self))]
    pub fn add(&mut self, name: &str, unit_price: f64, quantity: u32) -> Result<(), CartError> {
        let result = self.model.add(name, unit_price, quantity);
        self.settle(result)
    }

    /// Add one unit to the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfRange`] for an unknown index and
    /// [`CartError::TotalOutOfRange`] if the total would go out of range.
    #[instrument(skip(self))]
    pub fn increment(&mut self, index: usize) -> Result<(), CartError> {
        let result = self.model.increment(index);
        self.settle(result)
    }

    /// Remove one unit from the line at `index`, stopping at one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfRange`] for an unknown index.
    #[instrument(skip(self))]
    pub fn decrement(&mut self, index: usize) -> Result<(), CartError> {
        let result = self.model.decrement(index);
        self.settle(result)
    }

    /// Delete the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfRange`] for an unknown index.
    #[instrument(skip(self))]
    pub fn remove(&mut self, index: usize) -> Result<(), CartError> {
        let result = self.model.remove(index);
        self.settle(result)
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.model.clear();
        self.commit();
    }

    // =========================================================================
    // Shipping selection
    // =========================================================================

    /// Change the shipping method and redraw.
    pub fn select_shipping(&mut self, method: ShippingMethod) {
        self.selection.method = method;
        self.render();
    }

    /// Change the province used for shipping eligibility and redraw.
    pub fn set_region(&mut self, region: impl Into<String>) {
        self.selection.region = region.into();
        self.render();
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Whether the cart modal may proceed to the checkout page.
    #[must_use]
    pub fn can_checkout(&self) -> bool {
        !self.model.is_empty()
    }

    /// Format check for a field that just lost focus. Clears it on failure.
    ///
    /// # Errors
    ///
    /// Returns the rejection for a malformed national ID or street number.
    pub fn blur_field(
        &self,
        fields: &mut CheckoutFields,
        field: FieldKind,
    ) -> Result<(), CheckoutRejection> {
        let result = self.validator.validate_field(field, fields.get(field));
        if result.is_err() {
            fields.clear(field);
        }
        result
    }

    /// Validate the checkout form against the current cart and shipping
    /// selection.
    ///
    /// The province field becomes the shipping region. On rejection the
    /// offending field is cleared (unless the failure is region eligibility);
    /// on acceptance the cart is emptied when `clear_on_checkout` is set.
    #[instrument(skip(self, fields), fields(method = %self.selection.method))]
    pub fn submit_checkout(&mut self, fields: &mut CheckoutFields) -> CheckoutOutcome {
        let province = fields.get(FieldKind::Province);
        if province != self.selection.region {
            self.set_region(province.to_owned());
        }

        if let Err(rejection) =
            self.validator
                .validate(self.model.lines(), fields, &self.selection)
        {
            info!(field = %rejection.field, reason = ?rejection.reason, "Checkout rejected");
            if rejection.clears_field() {
                fields.clear(rejection.field);
            }
            return CheckoutOutcome::Rejected(rejection);
        }

        let totals = self.totals();
        info!(
            units = totals.unit_count,
            subtotal = %totals.subtotal,
            "Checkout accepted"
        );
        if self.clear_on_checkout {
            self.clear();
        }
        CheckoutOutcome::Accepted(totals)
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// Owned snapshot of the cart lines.
    #[must_use]
    pub fn list(&self) -> Vec<LineItem> {
        self.model.list()
    }

    /// Borrowed view of the cart lines.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        self.model.lines()
    }

    /// Current shipping selection.
    #[must_use]
    pub const fn selection(&self) -> &ShippingSelection {
        &self.selection
    }

    /// Totals for the current cart and selection.
    #[must_use]
    pub fn totals(&self) -> Totals {
        self.presenter
            .calculator()
            .totals(self.model.lines(), &self.selection)
    }

    /// Display data for the current cart and selection.
    #[must_use]
    pub fn view(&self) -> CartView {
        self.presenter.view(self.model.lines(), &self.selection)
    }

    /// The persisted store.
    #[must_use]
    pub const fn store(&self) -> &PersistedStore<S> {
        &self.store
    }

    /// Redraw every surface from the current state.
    pub fn render(&mut self) -> CartView {
        self.presenter.render(self.model.lines(), &self.selection)
    }

    fn settle<T>(&mut self, result: Result<T, CartError>) -> Result<(), CartError> {
        match result {
            Ok(_) => {
                debug!(lines = self.model.len(), units = self.model.unit_count(), "Cart updated");
                self.commit();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Ignoring cart operation");
                Err(e)
            }
        }
    }

    fn commit(&mut self) {
        self.store.save(self.model.lines());
        self.render();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rust_decimal::Decimal;

    use super::*;
    use crate::checkout::ReasonKind;
    use crate::presenter::TextTarget;
    use crate::storage::MemoryStorage;
    use crate::store::DEFAULT_STORAGE_KEY;

    fn session() -> CartSession<MemoryStorage> {
        CartSession::new(
            PersistedStore::with_default_key(MemoryStorage::new()),
            TotalsCalculator::default(),
        )
    }

    fn persisted(session: &CartSession<MemoryStorage>) -> Option<String> {
        session.store().storage().get_item(DEFAULT_STORAGE_KEY).unwrap()
    }

    fn checkout_fields(province: &str) -> CheckoutFields {
        CheckoutFields::from_pairs([
            ("nombre", "Ana"),
            ("apellido", "Pérez"),
            ("dni", "30123456"),
            ("calle", "Av. Colón"),
            ("numero", "1234"),
            ("cp", "5000"),
            ("ciudad", "Córdoba"),
            ("provincia", province),
            ("genero", "femenino"),
        ])
    }

    #[test]
    fn test_mutation_persists_and_renders() {
        let mut session = session();
        let page = Rc::new(RefCell::new(TextTarget::new().with_badge()));
        session.register(Box::new(Rc::clone(&page)));
        assert_eq!(page.borrow().badge(), Some("Carrito vacío"));

        session.add("Remera", 5000.0, 1).unwrap();
        session.add("Remera", 5000.0, 2).unwrap();

        assert_eq!(page.borrow().badge(), Some("[3] Carrito: 3 artículos"));
        assert_eq!(
            persisted(&session).as_deref(),
            Some(r#"[{"name":"Remera","precio":5000,"cantidad":3}]"#)
        );
        assert_eq!(session.totals().subtotal, Decimal::new(15000, 0));
    }

    #[test]
    fn test_rejected_input_touches_nothing() {
        let mut session = session();
        let page = Rc::new(RefCell::new(TextTarget::new().with_list()));
        session.register(Box::new(Rc::clone(&page)));
        let before = page.borrow().clone();

        assert!(session.add("", 100.0, 1).is_err());
        assert!(session.increment(0).is_err());
        assert!(session.remove(5).is_err());

        assert_eq!(*page.borrow(), before);
        assert_eq!(persisted(&session), None);
    }

    #[test]
    fn test_session_rehydrates_from_storage() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(
                DEFAULT_STORAGE_KEY,
                r#"[{"name":"Buzo","precio":12000,"cantidad":2}]"#,
            )
            .unwrap();
        let session = CartSession::new(
            PersistedStore::with_default_key(storage),
            TotalsCalculator::default(),
        );
        assert_eq!(session.lines().len(), 1);
        assert_eq!(session.totals().unit_count, 2);
        assert!(session.can_checkout());
    }

    #[test]
    fn test_out_of_range_add_is_not_persisted() {
        let mut session = session();
        let page = Rc::new(RefCell::new(TextTarget::full()));
        session.register(Box::new(Rc::clone(&page)));
        session.add("Remera", 5000.0, 1).unwrap();
        let stored = persisted(&session);

        assert_eq!(
            session.add("Lingote", 1e20, 4_000_000_000),
            Err(CartError::TotalOutOfRange)
        );
        assert_eq!(persisted(&session), stored);
        assert_eq!(page.borrow().badge(), Some("[1] Carrito: 1 artículos"));
    }

    #[test]
    fn test_out_of_range_stored_line_does_not_break_rendering() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(
                DEFAULT_STORAGE_KEY,
                r#"[{"name":"X","precio":1e28,"cantidad":10},{"name":"Gorra","precio":3500,"cantidad":1}]"#,
            )
            .unwrap();
        let mut session = CartSession::new(
            PersistedStore::with_default_key(storage),
            TotalsCalculator::default(),
        );
        let page = Rc::new(RefCell::new(TextTarget::full()));
        session.register(Box::new(Rc::clone(&page)));

        assert_eq!(session.lines().len(), 1);
        assert_eq!(
            page.borrow().list().unwrap().last().map(String::as_str),
            Some("Total: $3.500")
        );
    }

    #[test]
    fn test_persistence_failure_keeps_session_working() {
        let mut session = CartSession::new(
            PersistedStore::with_default_key(MemoryStorage::new().with_quota(8)),
            TotalsCalculator::default(),
        );
        let page = Rc::new(RefCell::new(TextTarget::new().with_badge()));
        session.register(Box::new(Rc::clone(&page)));

        session.add("Remera", 5000.0, 2).unwrap();

        assert_eq!(session.lines().len(), 1);
        assert_eq!(page.borrow().badge(), Some("[2] Carrito: 2 artículos"));
        assert_eq!(persisted(&session), None);
    }

    #[test]
    fn test_shipping_changes_rerender_summary() {
        let mut session = session();
        let page = Rc::new(RefCell::new(TextTarget::new().with_summary()));
        session.register(Box::new(Rc::clone(&page)));
        session.add("Remera", 5000.0, 1).unwrap();

        session.select_shipping(ShippingMethod::Express);
        assert_eq!(
            page.borrow().summary().unwrap().last().map(String::as_str),
            Some("Total final: no disponible")
        );

        session.set_region("Córdoba");
        assert_eq!(
            page.borrow().summary().unwrap().last().map(String::as_str),
            Some("Total final: $11.000")
        );

        session.select_shipping(ShippingMethod::Pickup);
        assert_eq!(session.totals().total, Some(session.totals().subtotal));
    }

    #[test]
    fn test_checkout_empty_cart() {
        let mut session = session();
        let mut fields = checkout_fields("Córdoba");
        assert!(!session.can_checkout());

        let CheckoutOutcome::Rejected(rejection) = session.submit_checkout(&mut fields) else {
            panic!("empty cart must be rejected");
        };
        assert_eq!(rejection.reason, ReasonKind::EmptyCart);
        assert_eq!(fields, checkout_fields("Córdoba"));
    }

    #[test]
    fn test_checkout_clears_offending_field() {
        let mut session = session();
        session.add("Remera", 5000.0, 1).unwrap();
        let mut fields = checkout_fields("Córdoba").with(FieldKind::NationalId, "12ab");

        let outcome = session.submit_checkout(&mut fields);
        assert!(matches!(
            outcome,
            CheckoutOutcome::Rejected(CheckoutRejection {
                field: FieldKind::NationalId,
                reason: ReasonKind::InvalidFormat,
                ..
            })
        ));
        assert_eq!(fields.get(FieldKind::NationalId), "");
        assert_eq!(session.lines().len(), 1);
    }

    #[test]
    fn test_checkout_express_outside_region() {
        let mut session = session();
        session.add("Remera", 5000.0, 1).unwrap();
        session.select_shipping(ShippingMethod::Express);
        let mut fields = checkout_fields("Mendoza");

        let CheckoutOutcome::Rejected(rejection) = session.submit_checkout(&mut fields) else {
            panic!("express outside Córdoba must be rejected");
        };
        assert_eq!(rejection.reason, ReasonKind::RegionIneligible);
        assert_eq!(fields.get(FieldKind::Province), "Mendoza");
        assert_eq!(session.selection().region, "Mendoza");
    }

    #[test]
    fn test_checkout_accepted_clears_cart() {
        let mut session = session();
        session.add("Remera", 5000.0, 3).unwrap();
        session.select_shipping(ShippingMethod::Express);
        let mut fields = checkout_fields("Córdoba");

        let outcome = session.submit_checkout(&mut fields);
        let CheckoutOutcome::Accepted(totals) = outcome else {
            panic!("valid checkout must be accepted");
        };
        assert_eq!(totals.subtotal, Decimal::new(15000, 0));
        assert_eq!(totals.total, Some(Decimal::new(21000, 0)));
        assert!(session.lines().is_empty());
        assert_eq!(persisted(&session).as_deref(), Some("[]"));
    }

    #[test]
    fn test_checkout_accepted_keeps_cart_when_disabled() {
        let mut session = session().clear_on_checkout(false);
        session.add("Remera", 5000.0, 1).unwrap();
        let mut fields = checkout_fields("Salta");

        assert!(session.submit_checkout(&mut fields).is_accepted());
        assert_eq!(session.lines().len(), 1);
    }

    #[test]
    fn test_blur_field() {
        let session = session();
        let mut fields = checkout_fields("Córdoba").with(FieldKind::StreetNumber, "0");

        assert!(session.blur_field(&mut fields, FieldKind::NationalId).is_ok());
        let err = session
            .blur_field(&mut fields, FieldKind::StreetNumber)
            .unwrap_err();
        assert_eq!(err.reason, ReasonKind::NotPositive);
        assert_eq!(fields.get(FieldKind::StreetNumber), "");
    }
}
