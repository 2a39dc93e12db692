//! Subtotal, shipping and grand-total computation.
//!
//! Everything here is a pure function of its inputs. The presenter calls it
//! on every redraw, so repeated calls with unchanged inputs must agree.
//!
//! Arithmetic is checked. [`CartModel`](crate::model::CartModel) only admits
//! carts for which [`within_range`] holds, so the saturating and `None` paths
//! below are never reached through a session.

use std::fmt;
use std::str::FromStr;

use crewlab_core::LineItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default region for region-restricted shipping.
pub const DEFAULT_EXPRESS_REGION: &str = "Córdoba";

/// Shipping methods offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethod {
    /// Pick up at the store. Free.
    Pickup,
    /// Home delivery. Selected when the form has no choice.
    #[default]
    Standard,
    /// Same-day delivery, only inside one region.
    Express,
}

impl ShippingMethod {
    /// Every method, in display order.
    pub const ALL: [Self; 3] = [Self::Pickup, Self::Standard, Self::Express];

    /// Form value for the method.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Pickup => "local",
            Self::Standard => "domicilio",
            Self::Express => "express",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pickup => "Retiro en local",
            Self::Standard => "Envío a domicilio",
            Self::Express => "Envío Express",
        }
    }

    /// Fixed surcharge in pesos.
    #[must_use]
    pub fn cost(self) -> Decimal {
        match self {
            Self::Pickup => Decimal::ZERO,
            Self::Standard => Decimal::new(2500, 0),
            Self::Express => Decimal::new(6000, 0),
        }
    }

    /// Largest fixed surcharge across all methods.
    #[must_use]
    pub fn max_cost() -> Decimal {
        Self::ALL
            .into_iter()
            .map(Self::cost)
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    /// Whether the method is limited to a single region.
    #[must_use]
    pub const fn is_region_restricted(self) -> bool {
        matches!(self, Self::Express)
    }
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error parsing a [`ShippingMethod`] tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown shipping method: {0}")]
pub struct UnknownShippingMethod(pub String);

impl FromStr for ShippingMethod {
    type Err = UnknownShippingMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "pickup" => Ok(Self::Pickup),
            "domicilio" | "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            _ => Err(UnknownShippingMethod(s.to_owned())),
        }
    }
}

/// Shipping method plus the region currently chosen on the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingSelection {
    /// Selected method.
    pub method: ShippingMethod,
    /// Province value as entered, untrimmed.
    pub region: String,
}

impl ShippingSelection {
    /// Create a selection.
    pub fn new(method: ShippingMethod, region: impl Into<String>) -> Self {
        Self {
            method,
            region: region.into(),
        }
    }
}

/// Derived totals for one snapshot of the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Shipping surcharge; `None` when the method is not available in the region.
    pub shipping: Option<Decimal>,
    /// `subtotal + shipping`; `None` whenever `shipping` is, or when the sum
    /// is out of range.
    pub total: Option<Decimal>,
    /// Sum of quantities.
    pub unit_count: u64,
}

/// Computes totals under a region rule for restricted methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsCalculator {
    express_region: String,
}

impl Default for TotalsCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_EXPRESS_REGION)
    }
}

impl TotalsCalculator {
    /// Create a calculator restricting express shipping to `express_region`.
    pub fn new(express_region: impl Into<String>) -> Self {
        Self {
            express_region: express_region.into(),
        }
    }

    /// Region a method is limited to, if any.
    #[must_use]
    pub fn required_region(&self, method: ShippingMethod) -> Option<&str> {
        method
            .is_region_restricted()
            .then_some(self.express_region.as_str())
    }

    /// Whether `method` may ship to `region`. Comparison is exact.
    #[must_use]
    pub fn is_eligible(&self, method: ShippingMethod, region: &str) -> bool {
        self.required_region(method)
            .is_none_or(|required| required == region)
    }

    /// Sum of `unit_price * quantity` over `lines`; zero when empty.
    #[must_use]
    pub fn subtotal(&self, lines: &[LineItem]) -> Decimal {
        subtotal(lines)
    }

    /// Fixed cost of `method`, or `None` if it is region-restricted and
    /// `region` is not the required one.
    #[must_use]
    pub fn shipping_cost(&self, method: ShippingMethod, region: &str) -> Option<Decimal> {
        self.is_eligible(method, region).then(|| method.cost())
    }

    /// `subtotal + shipping_cost`, or `None` when shipping is unavailable.
    #[must_use]
    pub fn grand_total(
        &self,
        lines: &[LineItem],
        method: ShippingMethod,
        region: &str,
    ) -> Option<Decimal> {
        self.shipping_cost(method, region)
            .and_then(|shipping| checked_subtotal(lines)?.checked_add(shipping))
    }

    /// All totals for a snapshot.
    #[must_use]
    pub fn totals(&self, lines: &[LineItem], selection: &ShippingSelection) -> Totals {
        let exact = checked_subtotal(lines);
        let shipping = self.shipping_cost(selection.method, &selection.region);
        Totals {
            subtotal: exact.unwrap_or(Decimal::MAX),
            shipping,
            total: shipping.and_then(|s| exact?.checked_add(s)),
            unit_count: crate::model::unit_count(lines),
        }
    }
}

/// Sum of `unit_price * quantity` over `lines`, saturating at
/// [`Decimal::MAX`].
#[must_use]
pub fn subtotal(lines: &[LineItem]) -> Decimal {
    checked_subtotal(lines).unwrap_or(Decimal::MAX)
}

/// Sum of `unit_price * quantity` over `lines`, or `None` on overflow.
#[must_use]
pub fn checked_subtotal<'a>(lines: impl IntoIterator<Item = &'a LineItem>) -> Option<Decimal> {
    lines
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.line_total()?))
}

/// Whether `lines` can be totalled under every shipping method.
#[must_use]
pub fn within_range<'a>(lines: impl IntoIterator<Item = &'a LineItem>) -> bool {
    checked_subtotal(lines)
        .and_then(|subtotal| subtotal.checked_add(ShippingMethod::max_cost()))
        .is_some()
}
