use crate::error::ConfigError;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AlertThresholds, BreedStandard, Config, LayingPoint, StatisticsSettings, MAX_WINDOW_DAYS,
};

/// Environment variables with this prefix override file values,
/// e.g. `EGGCOST__ALERTS__MAX_COST_PER_UNIT=0.30`.
const ENV_PREFIX: &str = "EGGCOST";

/// Loads the application configuration from a TOML file.
///
/// This function is the primary entry point for this crate. It reads the configuration file
/// (which may be absent, in which case defaults apply), overlays `EGGCOST__*` environment
/// variables, deserializes everything into our strongly-typed `Config` struct and validates it.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    tracing::debug!(path = %path.display(), breeds = config.breeds.len(), "Configuration loaded.");
    Ok(config)
}

/// Checks that the loaded values are usable by the calculations.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.statistics.window_days == 0 {
        return Err(invalid("statistics.window_days must be at least 1"));
    }
    if config.statistics.window_days > MAX_WINDOW_DAYS {
        return Err(ConfigError::ValidationError(format!(
            "statistics.window_days must be at most {MAX_WINDOW_DAYS}, got {}",
            config.statistics.window_days
        )));
    }
    require_non_negative("statistics.trend_threshold_pct", config.statistics.trend_threshold_pct)?;

    let alerts = &config.alerts;
    if alerts.max_cost_per_unit <= Decimal::ZERO {
        return Err(invalid("alerts.max_cost_per_unit must be greater than 0"));
    }
    require_non_negative("alerts.critical_cost_overrun_pct", alerts.critical_cost_overrun_pct)?;
    require_non_negative("alerts.min_efficiency_pct", alerts.min_efficiency_pct)?;
    require_non_negative("alerts.max_production_drop_pct", alerts.max_production_drop_pct)?;
    require_non_negative("alerts.max_daily_cost_increase_pct", alerts.max_daily_cost_increase_pct)?;
    if alerts.critical_efficiency_factor <= Decimal::ZERO
        || alerts.critical_efficiency_factor > Decimal::ONE
    {
        return Err(invalid("alerts.critical_efficiency_factor must be in (0, 1]"));
    }

    let mut seen = HashSet::new();
    for breed in &config.breeds {
        let key = breed.breed.trim().to_ascii_lowercase();
        if key.is_empty() {
            return Err(invalid("breeds[].breed must not be empty"));
        }
        if !seen.insert(key) {
            return Err(ConfigError::ValidationError(format!(
                "breed '{}' is defined more than once",
                breed.breed
            )));
        }
        for point in &breed.laying_curve {
            if point.rate_pct < Decimal::ZERO || point.rate_pct > Decimal::ONE_HUNDRED {
                return Err(ConfigError::ValidationError(format!(
                    "breed '{}': rate_pct {} at week {} is outside 0..=100",
                    breed.breed, point.rate_pct, point.from_week
                )));
            }
        }
    }

    Ok(())
}

fn require_non_negative(field: &str, value: Decimal) -> Result<(), ConfigError> {
    if value.is_sign_negative() {
        return Err(ConfigError::ValidationError(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
