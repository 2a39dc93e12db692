//! Cart line commands.
//!
//! # Usage
//!
//! ```bash
//! crewlab cart add Remera 5000 -q 2
//! crewlab cart inc 1
//! crewlab cart show --shipping express --province Córdoba
//! ```

use crewlab_cart::{CartSession, ShippingMethod, Storage};

use super::{CommandError, Screen, cart_lines, summary_lines, to_index};

/// Add a product to the cart.
///
/// # Errors
///
/// Returns an error if the name is blank or the price is invalid.
pub fn add<S: Storage>(
    session: &mut CartSession<S>,
    screen: &Screen,
    name: &str,
    price: f64,
    quantity: u32,
) -> Result<Vec<String>, CommandError> {
    session.add(name, price, quantity)?;
    Ok(cart_lines(screen))
}

/// Add one unit to the line at `position`.
///
/// # Errors
///
/// Returns an error if no line is at `position`.
pub fn increment<S: Storage>(
    session: &mut CartSession<S>,
    screen: &Screen,
    position: usize,
) -> Result<Vec<String>, CommandError> {
    session.increment(to_index(position)?)?;
    Ok(cart_lines(screen))
}

/// Remove one unit from the line at `position`.
///
/// # Errors
///
/// Returns an error if no line is at `position`.
pub fn decrement<S: Storage>(
    session: &mut CartSession<S>,
    screen: &Screen,
    position: usize,
) -> Result<Vec<String>, CommandError> {
    session.decrement(to_index(position)?)?;
    Ok(cart_lines(screen))
}

/// Delete the line at `position`.
///
/// # Errors
///
/// Returns an error if no line is at `position`.
pub fn remove<S: Storage>(
    session: &mut CartSession<S>,
    screen: &Screen,
    position: usize,
) -> Result<Vec<String>, CommandError> {
    session.remove(to_index(position)?)?;
    Ok(cart_lines(screen))
}

/// Empty the cart.
pub fn clear<S: Storage>(session: &mut CartSession<S>, screen: &Screen) -> Vec<String> {
    session.clear();
    cart_lines(screen)
}

/// Show the cart followed by the order summary for the given shipping choice.
pub fn show<S: Storage>(
    session: &mut CartSession<S>,
    screen: &Screen,
    shipping: Option<ShippingMethod>,
    province: Option<String>,
) -> Vec<String> {
    if let Some(method) = shipping {
        session.select_shipping(method);
    }
    if let Some(province) = province {
        session.set_region(province);
    }

    let mut output = cart_lines(screen);
    if !session.can_checkout() {
        output.push(crewlab_cart::EMPTY_CART_NOTICE.to_owned());
        return output;
    }
    output.push(String::new());
    output.extend(summary_lines(screen));
    output
}
