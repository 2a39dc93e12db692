//! Checkout command.
//!
//! Runs the same fail-fast validation as the checkout page. On success the
//! order summary and confirmation are printed; on failure the first problem
//! is reported and the command exits non-zero.

use crewlab_cart::{
    CONFIRMATION_MESSAGE, CartSession, CheckoutFields, CheckoutOutcome, FieldKind, ShippingMethod,
    Storage,
};

use super::{CommandError, Screen, summary_lines};

/// Validate `fields` against the current cart and shipping choice.
///
/// The summary is captured before the cart is emptied by an accepted order.
///
/// # Errors
///
/// Returns [`CommandError::Rejected`] with the first failed check.
pub fn submit<S: Storage>(
    session: &mut CartSession<S>,
    screen: &Screen,
    shipping: ShippingMethod,
    mut fields: CheckoutFields,
) -> Result<Vec<String>, CommandError> {
    session.select_shipping(shipping);
    session.set_region(fields.get(FieldKind::Province).to_owned());
    let mut output = summary_lines(screen);

    match session.submit_checkout(&mut fields) {
        CheckoutOutcome::Rejected(rejection) => Err(rejection.into()),
        CheckoutOutcome::Accepted(totals) => {
            tracing::debug!(units = totals.unit_count, "Order placed");
            output.push(String::new());
            output.push(CONFIRMATION_MESSAGE.to_owned());
            Ok(output)
        }
    }
}
