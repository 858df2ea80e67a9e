use crate::app_config::{AppConfig, FetchConfig};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set variable has an unparseable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a set variable has an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup
/// function.
///
/// The core parsing/validation logic is decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed. Every key has a default; the engine runs
/// with an empty environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected true/false, got \"{other}\""),
            }),
        }
    };

    let log_level = or_default("PRICEWATCH_LOG_LEVEL", "info");
    let max_concurrent_checks = parse_usize("PRICEWATCH_MAX_CONCURRENT_CHECKS", "4")?;

    let timeout_secs = parse_u64("PRICEWATCH_TIMEOUT_SECS", "20")?;
    let delay_min_ms = parse_u64("PRICEWATCH_DELAY_MIN_MS", "1000")?;
    let delay_max_ms = parse_u64("PRICEWATCH_DELAY_MAX_MS", "2000")?;
    let mirror_fallback = parse_bool("PRICEWATCH_MIRROR_FALLBACK", "true")?;

    if delay_max_ms < delay_min_ms {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRICEWATCH_DELAY_MAX_MS".to_string(),
            reason: format!("must be >= PRICEWATCH_DELAY_MIN_MS ({delay_min_ms})"),
        });
    }

    Ok(AppConfig {
        log_level,
        max_concurrent_checks,
        fetch: FetchConfig {
            timeout_secs,
            delay_min_ms,
            delay_max_ms,
            mirror_fallback,
        },
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
