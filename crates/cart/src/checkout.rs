//! Checkout form validation.
//!
//! Checks run in a fixed order and stop at the first failure, so the shopper
//! only ever sees one message and one highlighted field per attempt:
//!
//! 1. the cart is not empty
//! 2. every required field has a value after trimming
//! 3. the national ID (DNI) is 7 to 10 digits
//! 4. the street number is a number greater than zero
//! 5. a region-restricted shipping method matches the province exactly

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crewlab_core::LineItem;
use regex::Regex;
use thiserror::Error;

use crate::totals::{ShippingSelection, TotalsCalculator};

static NATIONAL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{7,10}$").expect("Invalid regex"));

/// Checkout form fields, plus the cart itself for the empty-cart failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKind {
    Cart,
    Name,
    Surname,
    NationalId,
    Street,
    StreetNumber,
    PostalCode,
    City,
    Province,
    Category,
}

impl FieldKind {
    /// Fields that must be non-blank, in the order they are checked.
    pub const REQUIRED: [Self; 9] = [
        Self::Name,
        Self::Surname,
        Self::NationalId,
        Self::Street,
        Self::StreetNumber,
        Self::PostalCode,
        Self::City,
        Self::Province,
        Self::Category,
    ];

    /// Form element ID of the field.
    #[must_use]
    pub const fn form_id(self) -> &'static str {
        match self {
            Self::Cart => "carrito",
            Self::Name => "nombre",
            Self::Surname => "apellido",
            Self::NationalId => "dni",
            Self::Street => "calle",
            Self::StreetNumber => "numero",
            Self::PostalCode => "cp",
            Self::City => "ciudad",
            Self::Province => "provincia",
            Self::Category => "genero",
        }
    }

    const fn required_message(self) -> &'static str {
        match self {
            Self::Cart => EMPTY_CART_MESSAGE,
            Self::Name => "El nombre es obligatorio.",
            Self::Surname => "El apellido es obligatorio.",
            Self::NationalId => "El DNI es obligatorio.",
            Self::Street => "La calle es obligatoria.",
            Self::StreetNumber => "El número de la dirección es obligatorio.",
            Self::PostalCode => "El código postal es obligatorio.",
            Self::City => "La ciudad es obligatoria.",
            Self::Province => "Seleccioná una provincia.",
            Self::Category => "Seleccioná tu género.",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_id())
    }
}

/// Error parsing a [`FieldKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown checkout field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for FieldKind {
    type Err = UnknownField;

    /// Accepts form IDs (`dni`) and English names (`national_id`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nombre" | "name" => Ok(Self::Name),
            "apellido" | "surname" => Ok(Self::Surname),
            "dni" | "national_id" => Ok(Self::NationalId),
            "calle" | "street" => Ok(Self::Street),
            "numero" | "street_number" => Ok(Self::StreetNumber),
            "cp" | "postal_code" => Ok(Self::PostalCode),
            "ciudad" | "city" => Ok(Self::City),
            "provincia" | "province" => Ok(Self::Province),
            "genero" | "category" => Ok(Self::Category),
            _ => Err(UnknownField(s.to_owned())),
        }
    }
}

/// Why a check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonKind {
    /// The cart has no lines.
    EmptyCart,
    /// The field is blank.
    Required,
    /// The field does not match its pattern.
    InvalidFormat,
    /// The field is not a number greater than zero.
    NotPositive,
    /// The shipping method is not offered in the selected province.
    RegionIneligible,
}

/// Shown when checkout is submitted with an empty cart.
pub const EMPTY_CART_MESSAGE: &str = "Tu carrito está vacío. Agregá productos antes de confirmar.";

/// The single failure reported for a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CheckoutRejection {
    /// Offending field.
    pub field: FieldKind,
    /// Failed check.
    pub reason: ReasonKind,
    /// Message for the shopper.
    pub message: String,
}

impl CheckoutRejection {
    fn new(field: FieldKind, reason: ReasonKind, message: impl Into<String>) -> Self {
        Self {
            field,
            reason,
            message: message.into(),
        }
    }

    fn empty_cart() -> Self {
        Self::new(FieldKind::Cart, ReasonKind::EmptyCart, EMPTY_CART_MESSAGE)
    }

    fn required(field: FieldKind) -> Self {
        Self::new(field, ReasonKind::Required, field.required_message())
    }

    fn invalid_national_id() -> Self {
        Self::new(
            FieldKind::NationalId,
            ReasonKind::InvalidFormat,
            "Ingresá un DNI válido (solo números, 7 a 10 dígitos).",
        )
    }

    fn invalid_street_number() -> Self {
        Self::new(
            FieldKind::StreetNumber,
            ReasonKind::NotPositive,
            "Ingresá un número válido para la dirección.",
        )
    }

    /// Whether the offending field's value should be cleared for re-entry.
    ///
    /// Region eligibility keeps the province: the value is valid, the shipping
    /// method is what has to change.
    #[must_use]
    pub const fn clears_field(&self) -> bool {
        matches!(
            self.reason,
            ReasonKind::Required | ReasonKind::InvalidFormat | ReasonKind::NotPositive
        )
    }
}

/// Raw checkout form values keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutFields {
    values: BTreeMap<FieldKind, String>,
}

impl CheckoutFields {
    /// An empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, field: FieldKind, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Build from `(form_id, value)` pairs. Unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut fields = Self::new();
        for (key, value) in pairs {
            match key.as_ref().parse::<FieldKind>() {
                Ok(field) => fields.set(field, value),
                Err(e) => tracing::debug!(error = %e, "Ignoring checkout field"),
            }
        }
        fields
    }

    /// Set a field's raw value.
    pub fn set(&mut self, field: FieldKind, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Raw value of a field; empty when unset.
    #[must_use]
    pub fn get(&self, field: FieldKind) -> &str {
        self.values.get(&field).map_or("", String::as_str)
    }

    /// Blank out a field.
    pub fn clear(&mut self, field: FieldKind) {
        self.values.insert(field, String::new());
    }
}

/// Stateless checkout validation.
#[derive(Debug, Clone, Default)]
pub struct CheckoutValidator {
    calculator: TotalsCalculator,
}

impl CheckoutValidator {
    /// Create a validator using `calculator`'s region rule.
    #[must_use]
    pub const fn new(calculator: TotalsCalculator) -> Self {
        Self { calculator }
    }

    /// Run every check in order, stopping at the first failure.
    ///
    /// Region eligibility is judged against the form's province field, not
    /// `selection.region`.
    ///
    /// # Errors
    ///
    /// Returns the first failed check as a [`CheckoutRejection`].
    pub fn validate(
        &self,
        lines: &[LineItem],
        fields: &CheckoutFields,
        selection: &ShippingSelection,
    ) -> Result<(), CheckoutRejection> {
        if lines.is_empty() {
            return Err(CheckoutRejection::empty_cart());
        }

        if let Some(field) = FieldKind::REQUIRED
            .into_iter()
            .find(|&field| fields.get(field).trim().is_empty())
        {
            return Err(CheckoutRejection::required(field));
        }

        check_national_id(fields.get(FieldKind::NationalId))?;
        check_street_number(fields.get(FieldKind::StreetNumber))?;

        let province = fields.get(FieldKind::Province);
        if let Some(required) = self.calculator.required_region(selection.method) {
            if province != required {
                return Err(CheckoutRejection::new(
                    FieldKind::Province,
                    ReasonKind::RegionIneligible,
                    format!(
                        "El \"{}\" está disponible solo para la provincia de {required}.",
                        selection.method.label()
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Format check for a single field as it loses focus.
    ///
    /// Empty values pass; the required check happens on submit. Whitespace is
    /// not empty and gets the format check.
    ///
    /// # Errors
    ///
    /// Returns a rejection if the national ID or street number is malformed.
    pub fn validate_field(&self, field: FieldKind, value: &str) -> Result<(), CheckoutRejection> {
        if value.is_empty() {
            return Ok(());
        }
        match field {
            FieldKind::NationalId => check_national_id(value),
            FieldKind::StreetNumber => check_street_number(value),
            _ => Ok(()),
        }
    }
}

fn check_national_id(value: &str) -> Result<(), CheckoutRejection> {
    if NATIONAL_ID_RE.is_match(value.trim()) {
        Ok(())
    } else {
        Err(CheckoutRejection::invalid_national_id())
    }
}

fn check_street_number(value: &str) -> Result<(), CheckoutRejection> {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Ok(()),
        _ => Err(CheckoutRejection::invalid_street_number()),
    }
}
