//! Integration tests for shipping selection and checkout validation.

#![allow(clippy::unwrap_used)]

use crewlab_cart::{CheckoutOutcome, FieldKind, ReasonKind, ShippingMethod};
use crewlab_integration_tests::{TestContext, checkout_fields};
use rust_decimal::Decimal;

fn rejection_of(outcome: CheckoutOutcome) -> (FieldKind, ReasonKind) {
    match outcome {
        CheckoutOutcome::Rejected(r) => (r.field, r.reason),
        CheckoutOutcome::Accepted(_) => panic!("checkout should have been rejected"),
    }
}

#[test]
fn test_pickup_total_equals_subtotal() {
    let ctx = TestContext::new();
    let mut session = ctx.open();
    session.add("Remera", 5000.0, 3).unwrap();
    session.select_shipping(ShippingMethod::Pickup);

    let totals = session.totals();
    assert_eq!(totals.shipping, Some(Decimal::ZERO));
    assert_eq!(totals.total, Some(totals.subtotal));
}

#[test]
fn test_express_outside_cordoba_blocks_checkout() {
    let ctx = TestContext::new();
    let (mut session, page) = ctx.open_page();
    session.add("Remera", 5000.0, 1).unwrap();
    session.select_shipping(ShippingMethod::Express);
    let mut fields = checkout_fields("Buenos Aires");

    let outcome = session.submit_checkout(&mut fields);

    assert_eq!(
        rejection_of(outcome),
        (FieldKind::Province, ReasonKind::RegionIneligible)
    );
    assert_eq!(session.totals().total, None);
    assert_eq!(
        page.borrow().summary().unwrap().last().map(String::as_str),
        Some("Total final: no disponible")
    );
    assert_eq!(session.lines().len(), 1);
}

#[test]
fn test_first_failure_wins() {
    let ctx = TestContext::new();
    let mut session = ctx.open();

    let mut blank = checkout_fields("Córdoba").with(FieldKind::Name, "");
    assert_eq!(
        rejection_of(session.submit_checkout(&mut blank)),
        (FieldKind::Cart, ReasonKind::EmptyCart)
    );

    session.add("Remera", 5000.0, 1).unwrap();
    let mut fields = checkout_fields("Córdoba")
        .with(FieldKind::Surname, "  ")
        .with(FieldKind::NationalId, "abc");
    assert_eq!(
        rejection_of(session.submit_checkout(&mut fields)),
        (FieldKind::Surname, ReasonKind::Required)
    );

    let mut fields = checkout_fields("Córdoba").with(FieldKind::NationalId, "123456");
    assert_eq!(
        rejection_of(session.submit_checkout(&mut fields)),
        (FieldKind::NationalId, ReasonKind::InvalidFormat)
    );
    assert_eq!(fields.get(FieldKind::NationalId), "");

    let mut fields = checkout_fields("Córdoba").with(FieldKind::StreetNumber, "-4");
    assert_eq!(
        rejection_of(session.submit_checkout(&mut fields)),
        (FieldKind::StreetNumber, ReasonKind::NotPositive)
    );
}

#[test]
fn test_express_in_cordoba_is_accepted() {
    let ctx = TestContext::new();
    let mut session = ctx.open();
    session.add("Buzo", 12000.0, 1).unwrap();
    session.select_shipping(ShippingMethod::Express);
    let mut fields = checkout_fields("Córdoba");

    let CheckoutOutcome::Accepted(totals) = session.submit_checkout(&mut fields) else {
        panic!("checkout should have been accepted");
    };

    assert_eq!(totals.shipping, Some(Decimal::new(6000, 0)));
    assert_eq!(totals.total, Some(Decimal::new(18000, 0)));
    assert!(session.lines().is_empty());
    assert_eq!(ctx.stored().as_deref(), Some("[]"));
}

#[test]
fn test_keep_cart_after_checkout_when_configured() {
    let mut ctx = TestContext::new();
    ctx.config.clear_on_checkout = false;
    let mut session = ctx.open();
    session.add("Buzo", 12000.0, 1).unwrap();

    let outcome = session.submit_checkout(&mut checkout_fields("Jujuy"));

    assert!(outcome.is_accepted());
    assert_eq!(session.lines().len(), 1);
}
