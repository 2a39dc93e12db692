//! Command implementations.
//!
//! Each command runs against a [`CartSession`] with a [`TextTarget`] attached
//! and returns the lines to print. Nothing here writes to the terminal except
//! [`print_lines`].

pub mod cart;
pub mod checkout;

use std::cell::RefCell;
use std::rc::Rc;

use crewlab_cart::{CartError, CartSession, CheckoutRejection, Storage, TextTarget};
use thiserror::Error;

/// Shared handle to what the session last drew.
pub type Screen = Rc<RefCell<TextTarget>>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Positions are shown 1-based.
    #[error("Invalid position: {0}. Positions start at 1")]
    InvalidPosition(usize),

    /// The cart refused the operation.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The checkout form failed validation.
    #[error("Checkout rejected ({}): {}", .0.field, .0.message)]
    Rejected(#[from] CheckoutRejection),
}

/// Attach a text target with every surface to `session`.
pub fn attach_screen<S: Storage>(session: &mut CartSession<S>) -> Screen {
    let screen = Rc::new(RefCell::new(TextTarget::full()));
    session.register(Box::new(Rc::clone(&screen)));
    screen
}

/// Badge followed by the cart list.
#[must_use]
pub fn cart_lines(screen: &Screen) -> Vec<String> {
    let target = screen.borrow();
    target
        .badge()
        .map(str::to_owned)
        .into_iter()
        .chain(target.list().unwrap_or_default().iter().cloned())
        .collect()
}

/// Checkout summary lines.
#[must_use]
pub fn summary_lines(screen: &Screen) -> Vec<String> {
    screen.borrow().summary().unwrap_or_default().to_vec()
}

/// Convert a 1-based position to a line index.
fn to_index(position: usize) -> Result<usize, CommandError> {
    position
        .checked_sub(1)
        .ok_or(CommandError::InvalidPosition(position))
}

#[allow(clippy::print_stdout)]
pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
