//! Cart persistence on top of a [`Storage`] backend.
//!
//! # Wire format
//!
//! One key holds a JSON array of records:
//!
//! ```json
//! [{ "name": "Remera", "precio": 5000, "cantidad": 3 }]
//! ```
//!
//! The field names are shared with data already stored by earlier versions of
//! the site, so they must stay readable. Older records that carry the label
//! under `nombre` are accepted too; records are always written with `name`.
//! Numbers may also arrive as numeric strings.
//!
//! Loading never fails. A missing key, unparseable JSON or a non-array value
//! yields an empty cart, and individual records that cannot form a valid line
//! are dropped. Saving is best-effort: failures are logged and swallowed.

use crewlab_core::{LineItem, Price, ProductName, Quantity};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::model::CartModel;
use crate::storage::Storage;

/// Default storage key.
pub const DEFAULT_STORAGE_KEY: &str = "crewlab_carrito";

/// A persisted record as written to storage.
#[derive(Debug, Serialize)]
struct StoredLineRef<'a> {
    name: &'a str,
    precio: serde_json::Number,
    cantidad: u32,
}

/// Reads and writes the cart under a single storage key.
#[derive(Debug)]
pub struct PersistedStore<S> {
    storage: S,
    key: String,
}

impl<S: Storage> PersistedStore<S> {
    /// Create a store writing under `key`.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Create a store writing under [`DEFAULT_STORAGE_KEY`].
    pub fn with_default_key(storage: S) -> Self {
        Self::new(storage, DEFAULT_STORAGE_KEY)
    }

    /// The storage key in use.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying backend.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutable access to the underlying backend.
    pub const fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Load the persisted cart. Never fails; unreadable state is an empty cart.
    #[must_use]
    pub fn load(&self) -> CartModel {
        match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => decode(&raw),
            Ok(None) => CartModel::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read persisted cart");
                CartModel::new()
            }
        }
    }

    /// Persist `lines`, logging and swallowing any failure.
    pub fn save(&mut self, lines: &[LineItem]) {
        if let Err(e) = self.try_save(lines) {
            warn!(key = %self.key, error = %e, "Failed to persist cart");
        }
    }

    /// Persist `lines`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the backend write fails.
    pub fn try_save(&mut self, lines: &[LineItem]) -> Result<(), StorageError> {
        let payload = encode(lines)?;
        self.storage.set_item(&self.key, &payload)
    }
}

/// Serialize lines into the persisted JSON array.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(lines: &[LineItem]) -> Result<String, StorageError> {
    let records: Vec<StoredLineRef<'_>> = lines
        .iter()
        .map(|line| StoredLineRef {
            name: line.name.as_str(),
            precio: price_number(line.unit_price),
            cantidad: line.quantity.get(),
        })
        .collect();
    Ok(serde_json::to_string(&records)?)
}

/// Parse a persisted payload, dropping anything that is not a valid line.
#[must_use]
pub fn decode(raw: &str) -> CartModel {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Persisted cart is not valid JSON, starting empty");
            return CartModel::new();
        }
    };

    let Value::Array(records) = value else {
        warn!("Persisted cart is not an array, starting empty");
        return CartModel::new();
    };

    let total = records.len();
    let lines: Vec<LineItem> = records.into_iter().filter_map(sanitize).collect();
    if lines.len() < total {
        debug!(dropped = total - lines.len(), "Dropped unusable persisted records");
    }
    CartModel::from_lines(lines)
}

fn sanitize(record: Value) -> Option<LineItem> {
    let Value::Object(fields) = record else {
        return None;
    };
    let name = ProductName::parse(stored_name(&fields)?).ok()?;
    let unit_price = Price::from_f64(lenient_number(fields.get("precio")).unwrap_or(0.0)).ok()?;
    Some(LineItem::new(
        name,
        unit_price,
        lenient_quantity(lenient_number(fields.get("cantidad"))),
    ))
}

/// First non-blank label under `name`, then the legacy `nombre`.
fn stored_name(fields: &Map<String, Value>) -> Option<&str> {
    ["name", "nombre"]
        .into_iter()
        .filter_map(|key| fields.get(key).and_then(Value::as_str))
        .find(|label| !label.trim().is_empty())
}

/// A JSON number or numeric string. Absent, `null` and blank values are
/// `None`; anything else unparseable is NaN.
fn lenient_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Null => None,
        Value::Number(n) => n.as_f64(),
        Value::String(raw) if raw.trim().is_empty() => None,
        Value::String(raw) => Some(raw.trim().parse().unwrap_or(f64::NAN)),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => Some(f64::NAN),
    }
}

/// Quantity from a stored JSON number: fractions truncate, anything below one
/// (or missing, or non-finite) becomes one.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to u32 range first
fn lenient_quantity(raw: Option<f64>) -> Quantity {
    match raw {
        Some(n) if n.is_finite() => {
            Quantity::floored(n.trunc().clamp(1.0, f64::from(u32::MAX)) as u32)
        }
        _ => Quantity::ONE,
    }
}

/// Whole prices are written as integers (`5000`), others as floats.
fn price_number(price: Price) -> serde_json::Number {
    let amount = price.amount();
    if amount.fract().is_zero() {
        if let Some(whole) = amount.to_i64() {
            return serde_json::Number::from(whole);
        }
    }
    serde_json::Number::from_f64(price.to_f64()).unwrap_or_else(|| serde_json::Number::from(0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store_with(raw: &str) -> PersistedStore<MemoryStorage> {
        let mut storage = MemoryStorage::new();
        storage.set_item(DEFAULT_STORAGE_KEY, raw).unwrap();
        PersistedStore::with_default_key(storage)
    }

    fn summary(model: &CartModel) -> Vec<(String, String, u32)> {
        model
            .lines()
            .iter()
            .map(|l| {
                (
                    l.name.to_string(),
                    l.unit_price.amount().to_string(),
                    l.quantity.get(),
                )
            })
            .collect()
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let store = PersistedStore::with_default_key(MemoryStorage::new());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_corrupt_payload_is_empty() {
        for raw in ["", "{not json", "{\"name\":\"Remera\"}", "42", "null", "\"[]\""] {
            assert!(store_with(raw).load().is_empty(), "payload {raw:?}");
        }
    }

    #[test]
    fn test_load_reads_legacy_shapes() {
        let store = store_with(
            r#"[{"name":"Remera","precio":5000,"cantidad":2},{"nombre":"Buzo","precio":12000.5,"cantidad":1}]"#,
        );
        assert_eq!(
            summary(&store.load()),
            [
                ("Remera".to_string(), "5000".to_string(), 2),
                ("Buzo".to_string(), "12000.5".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_load_sanitizes_records() {
        let store = store_with(
            r#"[
                {"name":"  Remera ","precio":5000,"cantidad":0},
                {"name":"","precio":100,"cantidad":1},
                {"name":"Negativo","precio":-1,"cantidad":1},
                7,
                {"precio":100},
                {"name":"Gorra","cantidad":2.9},
                {"name":"Remera","precio":5000,"cantidad":2}
            ]"#,
        );
        assert_eq!(
            summary(&store.load()),
            [
                ("Remera".to_string(), "5000".to_string(), 3),
                ("Gorra".to_string(), "0".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_load_accepts_both_labels_and_numeric_strings() {
        let store = store_with(
            r#"[
                {"name":"Remera","nombre":"Remera vieja","precio":"5000","cantidad":"2"},
                {"name":" ","nombre":"Buzo","precio":12000,"cantidad":1},
                {"name":"Gorra","precio":"","cantidad":null},
                {"name":"Medias","precio":"gratis","cantidad":1},
                {"name":"Campera","precio":true,"cantidad":1}
            ]"#,
        );
        assert_eq!(
            summary(&store.load()),
            [
                ("Remera".to_string(), "5000".to_string(), 2),
                ("Buzo".to_string(), "12000".to_string(), 1),
                ("Gorra".to_string(), "0".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_load_drops_records_out_of_range() {
        let store = store_with(
            r#"[{"name":"Lingote","precio":1e28,"cantidad":10},{"name":"Gorra","precio":3500,"cantidad":1}]"#,
        );
        assert_eq!(
            summary(&store.load()),
            [("Gorra".to_string(), "3500".to_string(), 1)]
        );
    }

    #[test]
    fn test_save_writes_wire_format() {
        let mut store = PersistedStore::with_default_key(MemoryStorage::new());
        let mut model = CartModel::new();
        model.add("Remera", 5000.0, 3).unwrap();
        model.add("Gorra", 19.99, 1).unwrap();
        store.save(model.lines());

        let raw = store.storage().get_item(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        assert_eq!(
            raw,
            r#"[{"name":"Remera","precio":5000,"cantidad":3},{"name":"Gorra","precio":19.99,"cantidad":1}]"#
        );
        assert_eq!(store.load(), model);
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        let mut store = PersistedStore::with_default_key(MemoryStorage::new().with_quota(16));
        let mut model = CartModel::new();
        model.add("Remera", 5000.0, 1).unwrap();

        assert!(matches!(
            store.try_save(model.lines()),
            Err(StorageError::QuotaExceeded { .. })
        ));
        store.save(model.lines());
        assert!(store.load().is_empty());
    }
}
