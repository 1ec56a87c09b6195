//! # Storefront Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     KAZA_DB_PATH=/tmp/kaza.db                                          │
//! │     KAZA_CONFIRMATION_DELAY_MS=500                                     │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.kaza.storefront/ (macOS)         │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "Kaza Tem"
//!
//! [database]
//! path = "/var/lib/kaza/kaza.db"
//! max_connections = 5
//!
//! [pricing]
//! shipping_fee_cents = 1500
//! free_shipping_threshold_cents = 20000
//! reseller_discount_bps = 2000
//!
//! [subscription]
//! confirmation_delay_ms = 2000
//!
//! # Optional. When present it replaces the default coupon book.
//! [[coupons]]
//! id = "1"
//! code = "BEMVINDO15"
//! kind = "percentage"
//! magnitude = 15
//! min_subtotal_cents = 10000
//! expires_on = "2030-12-31"
//! description = "15% de desconto na primeira compra"
//! ```

use kaza_core::{Coupon, Money, PricingPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_FILE: &str = "storefront.toml";
const DATABASE_FILE: &str = "kaza.db";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine the application data directory")]
    NoProjectDirs,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Shown in the header and notification copy.
    #[serde(default = "default_store_name")]
    pub name: String,
}

fn default_store_name() -> String {
    "Kaza Tem".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. `None` means the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSettings {
    #[serde(default = "default_shipping_fee")]
    pub shipping_fee_cents: i64,

    /// Subtotals strictly above this ship free.
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold_cents: i64,

    /// 2000 = 20% off every unit for resellers.
    #[serde(default = "default_reseller_discount")]
    pub reseller_discount_bps: u32,
}

fn default_shipping_fee() -> i64 {
    1500
}

fn default_free_shipping_threshold() -> i64 {
    20000
}

fn default_reseller_discount() -> u32 {
    2000
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            shipping_fee_cents: default_shipping_fee(),
            free_shipping_threshold_cents: default_free_shipping_threshold(),
            reseller_discount_bps: default_reseller_discount(),
        }
    }
}

impl PricingSettings {
    pub fn policy(&self) -> PricingPolicy {
        PricingPolicy {
            free_shipping_threshold: Money::from_cents(self.free_shipping_threshold_cents),
            shipping_fee: Money::from_cents(self.shipping_fee_cents),
            reseller_discount_bps: self.reseller_discount_bps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSettings {
    /// Simulated payment confirmation delay.
    #[serde(default = "default_confirmation_delay")]
    pub confirmation_delay_ms: u64,
}

fn default_confirmation_delay() -> u64 {
    2000
}

impl Default for SubscriptionSettings {
    fn default() -> Self {
        SubscriptionSettings {
            confirmation_delay_ms: default_confirmation_delay(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub subscription: SubscriptionSettings,

    /// Empty means the built-in coupon book.
    #[serde(default)]
    pub coupons: Vec<Coupon>,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file, if it exists
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns the defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML file without applying overrides.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(ConfigError::Invalid("store.name must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        let pricing = &self.pricing;
        if pricing.shipping_fee_cents < 0 {
            return Err(ConfigError::Invalid(
                "pricing.shipping_fee_cents must not be negative".into(),
            ));
        }
        if pricing.free_shipping_threshold_cents < 0 {
            return Err(ConfigError::Invalid(
                "pricing.free_shipping_threshold_cents must not be negative".into(),
            ));
        }
        if pricing.reseller_discount_bps > 10_000 {
            return Err(ConfigError::Invalid(format!(
                "pricing.reseller_discount_bps must be at most 10000, got {}",
                pricing.reseller_discount_bps
            )));
        }

        Ok(())
    }

    /// Applies `KAZA_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("KAZA_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Ok(name) = std::env::var("KAZA_STORE_NAME") {
            self.store.name = name;
        }

        if let Ok(fee) = std::env::var("KAZA_SHIPPING_FEE_CENTS") {
            match fee.parse::<i64>() {
                Ok(cents) => self.pricing.shipping_fee_cents = cents,
                Err(_) => warn!(value = %fee, "Ignoring invalid KAZA_SHIPPING_FEE_CENTS"),
            }
        }

        if let Ok(threshold) = std::env::var("KAZA_FREE_SHIPPING_THRESHOLD_CENTS") {
            match threshold.parse::<i64>() {
                Ok(cents) => self.pricing.free_shipping_threshold_cents = cents,
                Err(_) => warn!(
                    value = %threshold,
                    "Ignoring invalid KAZA_FREE_SHIPPING_THRESHOLD_CENTS"
                ),
            }
        }

        if let Ok(delay) = std::env::var("KAZA_CONFIRMATION_DELAY_MS") {
            match delay.parse::<u64>() {
                Ok(ms) => self.subscription.confirmation_delay_ms = ms,
                Err(_) => warn!(value = %delay, "Ignoring invalid KAZA_CONFIRMATION_DELAY_MS"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "kaza", "storefront")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// The configured database file, or `kaza.db` in the platform data
    /// directory (created if missing).
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = directories::ProjectDirs::from("com", "kaza", "storefront")
            .ok_or(ConfigError::NoProjectDirs)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;
        Ok(data_dir.join(DATABASE_FILE))
    }

    pub fn confirmation_delay(&self) -> Duration {
        Duration::from_millis(self.subscription.confirmation_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaza_core::DiscountKind;

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.store.name, "Kaza Tem");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.pricing.policy(), PricingPolicy::default());
        assert_eq!(config.confirmation_delay(), Duration::from_secs(2));
        assert!(config.coupons.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = StorefrontConfig::from_toml(
            r#"
            [pricing]
            shipping_fee_cents = 990

            [subscription]
            confirmation_delay_ms = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.pricing.shipping_fee_cents, 990);
        assert_eq!(config.pricing.free_shipping_threshold_cents, 20000);
        assert_eq!(config.subscription.confirmation_delay_ms, 50);
        assert_eq!(config.store.name, "Kaza Tem");
    }

    #[test]
    fn test_coupon_override() {
        let config = StorefrontConfig::from_toml(
            r#"
            [[coupons]]
            id = "9"
            code = "NATAL10"
            kind = "percentage"
            magnitude = 10
            min_subtotal_cents = 5000
            expires_on = "2026-12-25"
            description = "10% no Natal"
            "#,
        )
        .unwrap();

        assert_eq!(config.coupons.len(), 1);
        let coupon = &config.coupons[0];
        assert_eq!(coupon.code, "NATAL10");
        assert_eq!(coupon.kind, DiscountKind::Percentage);
        assert_eq!(coupon.expires_on.to_string(), "2026-12-25");
    }

    #[test]
    fn test_config_validation() {
        let mut config = StorefrontConfig::default();

        config.pricing.reseller_discount_bps = 12_000;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.pricing.reseller_discount_bps = 2000;
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        config.database.max_connections = 1;
        config.store.name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_file() {
        let err = StorefrontConfig::from_toml("[pricing\nshipping_fee_cents = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_explicit_database_path() {
        let mut config = StorefrontConfig::default();
        config.database.path = Some(PathBuf::from("/tmp/kaza-test.db"));
        assert_eq!(
            config.database_path().unwrap(),
            PathBuf::from("/tmp/kaza-test.db")
        );
    }
}
