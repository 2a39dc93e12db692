//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CREWLAB_STORAGE_KEY` - Key the cart is persisted under (default: `crewlab_carrito`)
//! - `CREWLAB_DATA_DIR` - Directory for file-backed storage (default: `.crewlab`)
//! - `CREWLAB_STORAGE_QUOTA` - Maximum bytes a stored value may take (default: unlimited)
//! - `CREWLAB_CLEAR_ON_CHECKOUT` - Empty the cart after an accepted checkout (default: true)
//! - `CREWLAB_EXPRESS_REGION` - Only province eligible for express shipping (default: Córdoba)

use std::path::PathBuf;

use thiserror::Error;

use crate::storage::FileStorage;
use crate::store::DEFAULT_STORAGE_KEY;
use crate::totals::{DEFAULT_EXPRESS_REGION, TotalsCalculator};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Storage key holding the serialized cart
    pub storage_key: String,
    /// Directory used by file-backed storage
    pub data_dir: PathBuf,
    /// Optional byte limit for stored values
    pub storage_quota: Option<usize>,
    /// Whether an accepted checkout empties the cart
    pub clear_on_checkout: bool,
    /// Province where express shipping is offered
    pub express_region: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: PathBuf::from(".crewlab"),
            storage_quota: None,
            clear_on_checkout: true,
            express_region: DEFAULT_EXPRESS_REGION.to_string(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage_key = non_empty(lookup("CREWLAB_STORAGE_KEY")).unwrap_or(defaults.storage_key);
        let data_dir = non_empty(lookup("CREWLAB_DATA_DIR")).map_or(defaults.data_dir, PathBuf::from);
        let storage_quota = non_empty(lookup("CREWLAB_STORAGE_QUOTA"))
            .map(|raw| {
                raw.trim().parse::<usize>().map_err(|e| {
                    ConfigError::InvalidEnvVar("CREWLAB_STORAGE_QUOTA".to_string(), e.to_string())
                })
            })
            .transpose()?;
        let clear_on_checkout = non_empty(lookup("CREWLAB_CLEAR_ON_CHECKOUT"))
            .map(|raw| parse_bool("CREWLAB_CLEAR_ON_CHECKOUT", &raw))
            .transpose()?
            .unwrap_or(defaults.clear_on_checkout);
        let express_region =
            non_empty(lookup("CREWLAB_EXPRESS_REGION")).unwrap_or(defaults.express_region);

        Ok(Self {
            storage_key,
            data_dir,
            storage_quota,
            clear_on_checkout,
            express_region,
        })
    }

    /// Totals calculator using the configured region rule.
    #[must_use]
    pub fn calculator(&self) -> TotalsCalculator {
        TotalsCalculator::new(self.express_region.clone())
    }

    /// File-backed storage rooted at `data_dir`, honoring the quota.
    #[must_use]
    pub fn file_storage(&self) -> FileStorage {
        let storage = FileStorage::new(self.data_dir.clone());
        match self.storage_quota {
            Some(quota) => storage.with_quota(quota),
            None => storage,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Treat unset and blank variables alike.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a boolean flag (`true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`).
fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
