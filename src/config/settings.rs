//! Application settings loaded from `config.toml`.
//!
//! Every field has a default, so an absent file or a partial file both yield
//! a usable configuration. The storage keys name the four persisted entries
//! in the key-value store.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_SETTINGS_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Storage keys for the persisted collections
    pub storage: StorageKeys,
    /// Table presentation settings
    pub table: TableSettings,
}

/// Keys under which each collection is stored.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StorageKeys {
    /// Employees collection
    pub employees: String,
    /// Payrolls collection
    pub payrolls: String,
    /// Visible employee table columns
    pub employee_columns: String,
    /// Visible payroll table columns
    pub payroll_columns: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            employees: "EmployeeData".to_string(),
            payrolls: "PayrollData".to_string(),
            employee_columns: "visibleEmployeeColumns".to_string(),
            payroll_columns: "visiblePayrollColumns".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TableSettings {
    /// Rows shown per table page
    pub rows_per_page: usize,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self { rows_per_page: 10 }
    }
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns `Error::Config` if the file cannot be read or the TOML is invalid.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load settings from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads settings from `./config.toml`, falling back to defaults when the
/// file does not exist. A file that exists but is invalid is still an error.
pub fn load_default_settings() -> Result<Settings> {
    if Path::new(DEFAULT_SETTINGS_PATH).exists() {
        load_settings(DEFAULT_SETTINGS_PATH)
    } else {
        tracing::info!("No {} found, using default settings", DEFAULT_SETTINGS_PATH);
        Ok(Settings::default())
    }
}
