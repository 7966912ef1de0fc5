/// Database configuration and connection management
pub mod database;

/// Application settings loaded from config.toml
pub mod settings;

pub use settings::{Settings, StorageKeys, TableSettings, load_default_settings, load_settings};
