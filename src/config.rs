use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

const MIN_BODY_BYTES: usize = 64 * 1024; // 64KB
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024; // 50MB
const DEFAULT_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub timezone: Option<String>,
    pub max_body_bytes: Option<usize>,
    pub cors_allowed_origin: Option<String>,
    pub workers: Option<usize>,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        let mut config: Config = cfg.try_deserialize()?;

        // Значение по умолчанию для timezone, если не указано
        if config.timezone.is_none() {
            config.timezone = Some("UTC".to_string());
        }

        config.validate()?;

        Ok(config)
    }

    /// Получает временную зону из конфигурации
    pub fn get_timezone(&self) -> Result<Tz, chrono_tz::ParseError> {
        let tz_str = self.timezone.as_deref().unwrap_or("UTC");
        tz_str.parse::<Tz>()
    }

    /// Calendar date "today" in the configured zone. Subscription windows are
    /// compared against this date, never against the server's local clock.
    pub fn today(&self) -> NaiveDate {
        let now = Utc::now();
        match self.get_timezone() {
            Ok(tz) => now.with_timezone(&tz).date_naive(),
            Err(_) => now.date_naive(),
        }
    }

    /// Валидирует конфигурацию
    pub(crate) fn validate(&self) -> Result<(), config::ConfigError> {
        if !self
            .host
            .chars()
            .all(|c| c.is_alphanumeric() || ".:-_".contains(c))
        {
            return Err(config::ConfigError::Message(
                "Invalid host format".to_string(),
            ));
        }

        if self.port < 1024 {
            return Err(config::ConfigError::Message(
                "Port must be 1024 or higher for security reasons".to_string(),
            ));
        }

        if let Some(tz_str) = &self.timezone {
            if tz_str.parse::<Tz>().is_err() {
                return Err(config::ConfigError::Message(format!(
                    "Invalid timezone: {}",
                    tz_str
                )));
            }
        }

        if let Some(limit) = self.max_body_bytes {
            if !(MIN_BODY_BYTES..=MAX_BODY_BYTES).contains(&limit) {
                return Err(config::ConfigError::Message(format!(
                    "max_body_bytes must be between {} and {} bytes",
                    MIN_BODY_BYTES, MAX_BODY_BYTES
                )));
            }
        }

        if self.workers == Some(0) {
            return Err(config::ConfigError::Message(
                "workers must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

impl Config {
    pub fn effective_max_body_bytes(&self) -> usize {
        self.max_body_bytes.unwrap_or(DEFAULT_BODY_BYTES)
    }

    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub connect_timeout_secs: Option<u64>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
    pub sql_log: Option<bool>,
}

impl DatabaseSettings {
    pub fn default_from_url(url: String) -> Self {
        Self {
            url,
            max_connections: parse_env_var("DATABASE_MAX_CONNECTIONS"),
            min_connections: parse_env_var("DATABASE_MIN_CONNECTIONS"),
            connect_timeout_secs: parse_env_var("DATABASE_CONNECT_TIMEOUT_SECS"),
            acquire_timeout_secs: parse_env_var("DATABASE_ACQUIRE_TIMEOUT_SECS"),
            idle_timeout_secs: parse_env_var("DATABASE_IDLE_TIMEOUT_SECS"),
            sql_log: parse_env_var("DATABASE_SQL_LOG"),
        }
    }
}

fn parse_env_var<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env::var(key).ok().and_then(|value| value.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            timezone: Some("Asia/Manila".to_string()),
            max_body_bytes: None,
            cors_allowed_origin: None,
            workers: None,
        }
    }

    #[test]
    fn accepts_sane_configuration() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn rejects_privileged_port() {
        let config = Config { port: 80, ..base() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unknown_timezone() {
        let config = Config {
            timezone: Some("Mars/Olympus".to_string()),
            ..base()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_body_limit() {
        let config = Config {
            max_body_bytes: Some(10),
            ..base()
        };
        assert!(config.validate().is_err());
        assert_eq!(base().effective_max_body_bytes(), DEFAULT_BODY_BYTES);
    }

    #[test]
    fn rejects_suspicious_host() {
        let config = Config {
            host: "localhost; rm -rf".to_string(),
            ..base()
        };
        assert!(config.validate().is_err());
    }
}
