use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
    #[error("DATABASE_URL must be set when STORAGE_BACKEND=sqlite")]
    MissingDatabaseUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mock" => Ok(StorageBackend::Memory),
            "sqlite" | "database" => Ok(StorageBackend::Sqlite),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend: StorageBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// Abandoned booking wizards are dropped after this long.
    pub wizard_idle_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = parse(&lookup, "STORAGE_BACKEND", StorageBackend::Memory)?;
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if backend == StorageBackend::Sqlite && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        Ok(Config {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse(&lookup, "PORT", 8080)?,
            backend,
            database_url,
            max_connections: parse(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            wizard_idle_timeout: Duration::from_secs(parse(&lookup, "WIZARD_IDLE_SECS", 30 * 60)?),
        })
    }
}

fn parse<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_to_in_memory_on_localhost() {
        let config = config(&[]).unwrap();
        assert_eq!(config.backend, StorageBackend::Memory);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.wizard_idle_timeout, Duration::from_secs(1800));
    }

    #[test]
    fn wizard_timeout_is_in_seconds() {
        let config = config(&[("WIZARD_IDLE_SECS", "90")]).unwrap();
        assert_eq!(config.wizard_idle_timeout, Duration::from_secs(90));
        assert!(config_err("WIZARD_IDLE_SECS", "-1"));
    }

    fn config_err(name: &str, value: &str) -> bool {
        matches!(config(&[(name, value)]), Err(ConfigError::Invalid { .. }))
    }

    #[test]
    fn sqlite_needs_a_database_url() {
        assert!(matches!(
            config(&[("STORAGE_BACKEND", "sqlite")]),
            Err(ConfigError::MissingDatabaseUrl)
        ));
        let config = config(&[
            ("STORAGE_BACKEND", "SQLite"),
            ("DATABASE_URL", "sqlite://hotels.db"),
        ])
        .unwrap();
        assert_eq!(config.backend, StorageBackend::Sqlite);
    }

    #[test]
    fn bad_numbers_are_reported() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(err.to_string(), "PORT has invalid value 'eighty'");
        assert!(config(&[("STORAGE_BACKEND", "redis")]).is_err());
    }
}
