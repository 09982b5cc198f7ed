//! Application configuration loading from config.toml
//!
//! The file lists the fixed set of bars and the staff accounts that may log in.
//! When no file is present the built-in hotel defaults are used.

use super::users::{AccountConfig, default_accounts};
use crate::errors::{Error, Result};
use crate::models::{Bar, BarDirectory};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Bar locations, in display order
    #[serde(default = "default_bars")]
    pub bars: Vec<Bar>,
    /// Accounts accepted by the session login
    #[serde(default = "default_accounts")]
    pub accounts: Vec<AccountConfig>,
}

impl Config {
    #[must_use]
    pub fn bar_directory(&self) -> BarDirectory {
        BarDirectory::new(self.bars.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bars: default_bars(),
            accounts: default_accounts(),
        }
    }
}

fn default_bars() -> Vec<Bar> {
    BarDirectory::default().iter().cloned().collect()
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A bar id appears twice
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    let config: Config = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    for (i, bar) in config.bars.iter().enumerate() {
        if config.bars[..i].iter().any(|other| other.id == bar.id) {
            return Err(Error::Config {
                message: format!("Duplicate bar id `{}` in config", bar.id),
            });
        }
    }

    Ok(config)
}

/// Loads configuration from `BARKEEP_CONFIG` (default `./config.toml`), falling
/// back to the built-in defaults when the file does not exist.
pub fn load_default_config() -> Result<Config> {
    let path = std::env::var("BARKEEP_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        tracing::info!("Loading configuration from {}", path);
        load_config(path)
    } else {
        tracing::info!("No configuration file at {}, using defaults", path);
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
            [[bars]]
            id = "1"
            name = "Main Bar"
            location = "Lobby Floor"
            chart_series = "Main"

            [[bars]]
            id = "2"
            name = "Pool Bar"

            [[accounts]]
            id = "1"
            name = "John Manager"
            email = "manager@hotel.com"
            password = "manager123"
            role = "manager"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bars.len(), 2);
        assert_eq!(config.bars[0].chart_series.as_deref(), Some("Main"));
        assert_eq!(config.bars[1].chart_series, None);
        assert_eq!(config.accounts.len(), 1);
        assert_eq!(config.accounts[0].role, Role::Manager);
        assert_eq!(config.bar_directory().name_of("2"), "Pool Bar");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.bars.len(), 3);
        assert_eq!(config.accounts.len(), 3);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("definitely/not/here.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
