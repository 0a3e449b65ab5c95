//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Review level classification thresholds.
    #[serde(default)]
    pub review: ReviewThresholds,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Confidence thresholds driving review level classification.
///
/// Lifted out of the classifier so they are inspectable and tunable
/// without touching the classification rules themselves.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewThresholds {
    /// Overall confidence at or above this auto-approves the document.
    #[serde(default = "default_auto_approve")]
    pub auto_approve: Decimal,
    /// Overall confidence below this always requires review.
    #[serde(default = "default_required_below")]
    pub required_below: Decimal,
    /// Minimum acceptable confidence for the extracted issue date.
    #[serde(default = "default_date_min")]
    pub date_min: Decimal,
    /// Minimum acceptable confidence for the extracted amounts.
    #[serde(default = "default_amount_min")]
    pub amount_min: Decimal,
}

fn default_auto_approve() -> Decimal {
    Decimal::new(90, 2) // 0.90
}

fn default_required_below() -> Decimal {
    Decimal::new(75, 2) // 0.75
}

fn default_date_min() -> Decimal {
    Decimal::new(70, 2) // 0.70
}

fn default_amount_min() -> Decimal {
    Decimal::new(80, 2) // 0.80
}

impl Default for ReviewThresholds {
    fn default() -> Self {
        Self {
            auto_approve: default_auto_approve(),
            required_below: default_required_below(),
            date_min: default_date_min(),
            amount_min: default_amount_min(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("DOCUFLOW").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_thresholds() {
        let t = ReviewThresholds::default();
        assert_eq!(t.auto_approve, dec!(0.90));
        assert_eq!(t.required_below, dec!(0.75));
        assert_eq!(t.date_min, dec!(0.70));
        assert_eq!(t.amount_min, dec!(0.80));
    }

    #[test]
    fn test_thresholds_deserialize_partial() {
        let t: ReviewThresholds =
            serde_json::from_str(r#"{"auto_approve": "0.95"}"#).expect("valid thresholds");
        assert_eq!(t.auto_approve, dec!(0.95));
        assert_eq!(t.required_below, dec!(0.75));
    }
}
