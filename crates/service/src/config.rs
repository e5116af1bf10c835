use cinecat_core::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Catalog configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Connection pool size (default: `20`).
    pub max_connections: u32,
    /// Page size used when a list call supplies none (default: `10`).
    pub default_page_size: i64,
    /// Apply pending migrations during bootstrap (default: `true`).
    pub run_migrations: bool,
}

impl CatalogConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default  |
    /// |----------------------|----------|
    /// | `DATABASE_URL`       | required |
    /// | `DB_MAX_CONNECTIONS` | `20`     |
    /// | `DEFAULT_PAGE_SIZE`  | `10`     |
    /// | `RUN_MIGRATIONS`     | `true`   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let max_connections: u32 = parse_or(&lookup, "DB_MAX_CONNECTIONS", 20)?;
        if max_connections == 0 {
            return Err(invalid("DB_MAX_CONNECTIONS", "0", "must be at least 1"));
        }

        let default_page_size: i64 = parse_or(&lookup, "DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if !(1..=MAX_PAGE_SIZE).contains(&default_page_size) {
            return Err(invalid(
                "DEFAULT_PAGE_SIZE",
                &default_page_size.to_string(),
                &format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }

        let run_migrations: bool = parse_or(&lookup, "RUN_MIGRATIONS", true)?;

        Ok(Self {
            database_url,
            max_connections,
            default_page_size,
            run_migrations,
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(var, &raw, &e.to_string())),
    }
}

fn invalid(var: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
