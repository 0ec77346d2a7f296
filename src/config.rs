use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use validator::Validate;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_FOLIO_PREFIX: &str = "BHL";
const DEFAULT_FOLIO_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_PAYMENT_CONDITIONS: &str =
    "100% Anticipado a la entrega. (Transferencia Bancaria)";
const DEFAULT_DELIVERY_TIME: &str = "15 días hábiles";
const DEFAULT_WARRANTY: &str = "Garantía: 12 meses sobre defectos de fabricación.";
const DEFAULT_OBSERVATIONS: &str =
    "Sin más por el momento, nos ponemos a sus órdenes para cualquier duda y/o información adicional.";

/// Quote-engine configuration: default tax rate, folio allocation and the
/// terms boilerplate applied when a creation request leaves them unset.
///
/// Threaded explicitly into `QuoteService` so tests can construct services
/// with deterministic values instead of reading ambient state.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct QuoteConfig {
    /// Tax rate applied to quote subtotals, as a fraction (0.16 = 16% IVA)
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,

    /// Literal prefix of every folio (document number)
    #[validate(length(min = 1, max = 8))]
    #[serde(default = "default_folio_prefix")]
    pub folio_prefix: String,

    /// Bounded retry budget for folio allocation conflicts
    #[validate(range(min = 1, max = 10))]
    #[serde(default = "default_folio_max_attempts")]
    pub folio_max_attempts: u32,

    #[serde(default = "default_payment_conditions")]
    pub default_payment_conditions: String,

    #[serde(default = "default_delivery_time")]
    pub default_delivery_time: String,

    #[serde(default = "default_warranty")]
    pub default_warranty: String,

    #[serde(default = "default_observations")]
    pub default_observations: String,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
            folio_prefix: default_folio_prefix(),
            folio_max_attempts: default_folio_max_attempts(),
            default_payment_conditions: default_payment_conditions(),
            default_delivery_time: default_delivery_time(),
            default_warranty: default_warranty(),
            default_observations: default_observations(),
        }
    }
}

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL
    #[validate(length(min = 1))]
    pub database_url: String,

    /// Deployment environment: "development", "test" or "production"
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Log level for the tracing subscriber
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON instead of human-readable lines
    #[serde(default)]
    pub log_json: bool,

    /// Maximum number of database connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// Minimum number of database connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// Run embedded migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// Quote-engine settings
    #[serde(default)]
    #[validate]
    pub quote: QuoteConfig,
}

impl AppConfig {
    /// Constructs a configuration directly, bypassing file/env layering.
    /// Primarily used by tests and the migration binary.
    pub fn new(database_url: String, environment: String) -> Self {
        Self {
            database_url,
            environment,
            log_level: default_log_level(),
            log_json: false,
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            auto_migrate: false,
            quote: QuoteConfig::default(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_db_max_connections() -> u32 {
    DEFAULT_DB_MAX_CONNECTIONS
}

fn default_db_min_connections() -> u32 {
    DEFAULT_DB_MIN_CONNECTIONS
}

fn default_tax_rate() -> Decimal {
    dec!(0.16)
}

fn default_folio_prefix() -> String {
    DEFAULT_FOLIO_PREFIX.to_string()
}

fn default_folio_max_attempts() -> u32 {
    DEFAULT_FOLIO_MAX_ATTEMPTS
}

fn default_payment_conditions() -> String {
    DEFAULT_PAYMENT_CONDITIONS.to_string()
}

fn default_delivery_time() -> String {
    DEFAULT_DELIVERY_TIME.to_string()
}

fn default_warranty() -> String {
    DEFAULT_WARRANTY.to_string()
}

fn default_observations() -> String {
    DEFAULT_OBSERVATIONS.to_string()
}

/// Errors produced while loading or validating configuration
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("configuration load error: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Loads configuration from `config/default.toml`, an environment-specific
/// overlay (`config/{RUN_ENV}.toml`) and `APP__`-prefixed environment
/// variables, in that order of precedence.
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let cfg = Config::builder()
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = cfg.try_deserialize()?;
    app_config.validate()?;

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_defaults_match_business_boilerplate() {
        let cfg = QuoteConfig::default();
        assert_eq!(cfg.tax_rate, dec!(0.16));
        assert_eq!(cfg.folio_prefix, "BHL");
        assert_eq!(cfg.folio_max_attempts, 3);
        assert!(cfg.default_delivery_time.contains("15"));
    }

    #[test]
    fn app_config_constructor_validates() {
        let cfg = AppConfig::new("sqlite::memory:".to_string(), "test".to_string());
        assert!(cfg.validate().is_ok());
        assert!(!cfg.is_production());
    }
}
