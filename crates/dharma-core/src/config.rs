use crate::app_config::{AppConfig, Environment, LogFormat};
use crate::{ConfigError, DHARMA_SEED_BASE_URL};

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does not read `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation live here, decoupled from the real environment, so
/// tests can drive it from a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("DHARMA_ENV", "development"))?;

    let bind_addr = or_default("DHARMA_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("DHARMA_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("DHARMA_LOG_LEVEL", "info");
    let log_format = parse_log_format(&or_default("DHARMA_LOG_FORMAT", "json"))?;

    let db_max_connections = parse_u32("DHARMA_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("DHARMA_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("DHARMA_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    if db_min_connections > db_max_connections {
        return Err(invalid(
            "DHARMA_DB_MIN_CONNECTIONS",
            format!("must not exceed DHARMA_DB_MAX_CONNECTIONS ({db_max_connections})"),
        ));
    }

    let source_base_url = or_default("DHARMA_SOURCE_BASE_URL", DHARMA_SEED_BASE_URL)
        .trim_end_matches('/')
        .to_string();
    if !source_base_url.starts_with("http://") && !source_base_url.starts_with("https://") {
        return Err(invalid(
            "DHARMA_SOURCE_BASE_URL",
            "must be an absolute http(s) URL".to_string(),
        ));
    }

    let scraper_request_timeout_secs = parse_u64("DHARMA_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default(
        "DHARMA_SCRAPER_USER_AGENT",
        "dharma-radio/0.1 (catalog-sync)",
    );

    let sync_page_delay_ms = parse_u64("DHARMA_SYNC_PAGE_DELAY_MS", "1000")?;
    let sync_batch_size = parse_usize("DHARMA_SYNC_BATCH_SIZE", "10")?;
    if sync_batch_size == 0 {
        return Err(invalid(
            "DHARMA_SYNC_BATCH_SIZE",
            "must be at least 1".to_string(),
        ));
    }
    let sync_batch_delay_ms = parse_u64("DHARMA_SYNC_BATCH_DELAY_MS", "1000")?;
    let sync_max_pages = match lookup("DHARMA_SYNC_MAX_PAGES") {
        Ok(raw) if !raw.trim().is_empty() => Some(
            raw.trim()
                .parse::<u32>()
                .map_err(|e| invalid("DHARMA_SYNC_MAX_PAGES", e.to_string()))?,
        ),
        _ => None,
    };

    let retry_max_attempts = parse_u32("DHARMA_RETRY_MAX_ATTEMPTS", "3")?;
    if retry_max_attempts == 0 {
        return Err(invalid(
            "DHARMA_RETRY_MAX_ATTEMPTS",
            "must be at least 1".to_string(),
        ));
    }
    let retry_initial_delay_ms = parse_u64("DHARMA_RETRY_INITIAL_DELAY_MS", "1000")?;
    let retry_max_delay_ms = parse_u64("DHARMA_RETRY_MAX_DELAY_MS", "10000")?;
    let retry_backoff_factor = parse_u32("DHARMA_RETRY_BACKOFF_FACTOR", "2")?;
    if retry_backoff_factor == 0 {
        return Err(invalid(
            "DHARMA_RETRY_BACKOFF_FACTOR",
            "must be at least 1".to_string(),
        ));
    }
    let page_retry_initial_delay_ms = parse_u64("DHARMA_PAGE_RETRY_INITIAL_DELAY_MS", "3000")?;

    let sync_schedule = match lookup("DHARMA_SYNC_SCHEDULE") {
        Ok(raw) if raw.trim().is_empty() => None,
        Ok(raw) => Some(raw.trim().to_string()),
        Err(_) => Some("0 0 3 * * *".to_string()),
    };

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        log_format,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        source_base_url,
        scraper_request_timeout_secs,
        scraper_user_agent,
        sync_page_delay_ms,
        sync_batch_size,
        sync_batch_delay_ms,
        sync_max_pages,
        retry_max_attempts,
        retry_initial_delay_ms,
        retry_max_delay_ms,
        retry_backoff_factor,
        page_retry_initial_delay_ms,
        sync_schedule,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DHARMA_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

fn parse_log_format(s: &str) -> Result<LogFormat, ConfigError> {
    match s {
        "json" => Ok(LogFormat::Json),
        "pretty" => Ok(LogFormat::Pretty),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DHARMA_LOG_FORMAT".to_string(),
            reason: format!("expected \"json\" or \"pretty\", got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
