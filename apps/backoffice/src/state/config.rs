//! # Configuration State
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`STOCKBOOK_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration.
///
/// Most fields have sensible defaults for development.
/// Production deployments should configure these properly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Address the HTTP API binds to.
    pub bind_addr: String,

    /// Override for the SQLite database file path.
    /// `None` means the platform app-data directory is used.
    #[serde(skip)]
    pub database_path: Option<PathBuf>,

    /// Store name (displayed in the UI header).
    pub store_name: String,

    /// Currency code (ISO 4217).
    pub currency_code: String,

    /// Currency symbol (for display).
    pub currency_symbol: String,

    /// Number of decimal places for currency.
    /// 0 for shilling-style currencies, 2 for dollar-style.
    pub currency_decimals: u8,
}

impl Default for ConfigState {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Bind: 127.0.0.1:8790
    /// - Store: "Sportcheck & Vargo"
    /// - Currency: UGX (no decimals)
    fn default() -> Self {
        ConfigState {
            bind_addr: "127.0.0.1:8790".to_string(),
            database_path: None,
            store_name: "Sportcheck & Vargo".to_string(),
            currency_code: "UGX".to_string(),
            currency_symbol: "USh ".to_string(),
            currency_decimals: 0,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `STOCKBOOK_BIND_ADDR`: Override bind address
    /// - `STOCKBOOK_DB_PATH`: Override database file path
    /// - `STOCKBOOK_STORE_NAME`: Override store name
    /// - `STOCKBOOK_CURRENCY`: Override currency code
    pub fn from_env() -> Self {
        let mut config = ConfigState::default();

        if let Ok(addr) = std::env::var("STOCKBOOK_BIND_ADDR") {
            config.bind_addr = addr;
        }

        if let Ok(path) = std::env::var("STOCKBOOK_DB_PATH") {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Ok(store_name) = std::env::var("STOCKBOOK_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Ok(currency) = std::env::var("STOCKBOOK_CURRENCY") {
            config.currency_code = currency;
        }

        config
    }

    /// Formats a minor-unit amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(120_000), "USh 120000");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_no_decimals() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(120_000), "USh 120000");
        assert_eq!(config.format_currency(0), "USh 0");
        assert_eq!(config.format_currency(-500), "-USh 500");
    }

    #[test]
    fn test_format_currency_two_decimals() {
        let config = ConfigState {
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            ..ConfigState::default()
        };
        assert_eq!(config.format_currency(1234), "$12.34");
        assert_eq!(config.format_currency(1), "$0.01");
        assert_eq!(config.format_currency(-1234), "-$12.34");
    }
}
