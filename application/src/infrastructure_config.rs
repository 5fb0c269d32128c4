use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub db: DbConfig,
    pub credits: CreditsConfig,
    pub match_cache: MatchCacheConfig,
    pub retry: RetryConfig,
    pub matching: MatchingConfig,
    pub logging: LoggingConfig,
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: SecretString,
    pub pool_size: u32,
    pub query_timeout_secs: u64,
}

impl Serialize for DbConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("DbConfig", 3)?;
        state.serialize_field("database_url", "[REDACTED]")?;
        state.serialize_field("pool_size", &self.pool_size)?;
        state.serialize_field("query_timeout_secs", &self.query_timeout_secs)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for DbConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct DbConfigHelper {
            database_url: String,
            pool_size: u32,
            query_timeout_secs: u64,
        }

        let helper = DbConfigHelper::deserialize(deserializer)?;
        Ok(DbConfig {
            database_url: SecretString::from(helper.database_url),
            pool_size: helper.pool_size,
            query_timeout_secs: helper.query_timeout_secs,
        })
    }
}

impl DbConfig {
    #[must_use]
    pub fn redacted_url(&self) -> String {
        let url_str = self.database_url.expose_secret();
        match url::Url::parse(url_str) {
            Ok(mut url) => {
                if url.password().is_some() {
                    url.set_password(Some("***")).ok();
                }
                url.to_string()
            }
            Err(_) => "[INVALID_URL]".to_string(),
        }
    }

    #[must_use]
    pub fn database_url(&self) -> &str {
        self.database_url.expose_secret()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditsConfig {
    /// Credits seeded into a lazily created account.
    pub signup_grant: i32,
    /// Age past which a hold left unresolved is auto-reverted.
    pub hold_ttl_seconds: u64,
    pub sweep_interval_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchCacheConfig {
    pub ttl_seconds: u64,
    pub max_entries_per_user: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff_ms: u64,
    pub jitter_min_percent: u8,
    pub jitter_max_percent: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub include_location: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "pretty")]
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub env: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                cors_origin: None,
            },
            db: DbConfig {
                database_url: SecretString::from("postgresql://localhost/careerdesk"),
                pool_size: 10,
                query_timeout_secs: 5,
            },
            credits: CreditsConfig {
                signup_grant: 5,
                hold_ttl_seconds: 900,
                sweep_interval_seconds: 60,
            },
            match_cache: MatchCacheConfig {
                ttl_seconds: 7200,
                max_entries_per_user: 10,
            },
            retry: RetryConfig {
                max_attempts: 2,
                backoff_ms: 2000,
                jitter_min_percent: 0,
                jitter_max_percent: 10,
            },
            matching: MatchingConfig {
                base_url: "http://localhost:8091".to_string(),
                request_timeout_secs: 60,
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: false,
            },
            environment: EnvironmentConfig {
                env: "development".to_string(),
            },
        }
    }
}

impl Config {
    pub fn validate(&self) -> AppResult<()> {
        if self.db.database_url.expose_secret().is_empty() {
            return Err(AppError::ConfigError {
                message: "database_url cannot be empty".to_string(),
            });
        }

        if self.db.pool_size == 0 {
            return Err(AppError::ConfigError {
                message: "db pool_size must be greater than 0".to_string(),
            });
        }

        if self.db.query_timeout_secs == 0 {
            return Err(AppError::ConfigError {
                message: "query_timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.credits.signup_grant < 0 {
            return Err(AppError::ConfigError {
                message: "signup_grant must be greater than or equal to 0".to_string(),
            });
        }

        if self.credits.hold_ttl_seconds == 0 || self.credits.sweep_interval_seconds == 0 {
            return Err(AppError::ConfigError {
                message: "hold_ttl_seconds and sweep_interval_seconds must be greater than 0"
                    .to_string(),
            });
        }

        if self.match_cache.ttl_seconds == 0 {
            return Err(AppError::ConfigError {
                message: "match cache ttl_seconds must be greater than 0".to_string(),
            });
        }

        if self.match_cache.max_entries_per_user == 0 {
            return Err(AppError::ConfigError {
                message: "max_entries_per_user must be greater than 0".to_string(),
            });
        }

        if self.retry.max_attempts == 0 {
            return Err(AppError::ConfigError {
                message: "retry max_attempts must be greater than 0".to_string(),
            });
        }

        if self.retry.backoff_ms == 0 {
            return Err(AppError::ConfigError {
                message: "retry backoff_ms must be greater than 0".to_string(),
            });
        }

        if self.retry.jitter_min_percent > self.retry.jitter_max_percent {
            return Err(AppError::ConfigError {
                message: "jitter_min_percent must be <= jitter_max_percent".to_string(),
            });
        }

        if self.retry.jitter_max_percent > 100 {
            return Err(AppError::ConfigError {
                message: "jitter_max_percent must be <= 100".to_string(),
            });
        }

        if self.matching.base_url.is_empty() {
            return Err(AppError::ConfigError {
                message: "matching base_url cannot be empty".to_string(),
            });
        }

        if url::Url::parse(&self.matching.base_url).is_err() {
            return Err(AppError::ConfigError {
                message: format!("matching base_url is not a valid URL: {}", self.matching.base_url),
            });
        }

        if self.matching.request_timeout_secs == 0 {
            return Err(AppError::ConfigError {
                message: "matching request_timeout_secs must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_default_cache_bounds_match_product_policy() {
        let config = Config::default();
        assert_eq!(config.match_cache.ttl_seconds, 7200);
        assert_eq!(config.match_cache.max_entries_per_user, 10);
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.backoff_ms, 2000);
    }

    #[test]
    fn test_rejects_zero_pool_size() {
        let mut config = Config::default();
        config.db.pool_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_jitter_range() {
        let mut config = Config::default();
        config.retry.jitter_min_percent = 30;
        config.retry.jitter_max_percent = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unparseable_matching_url() {
        let mut config = Config::default();
        config.matching.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_redacts_database_password() {
        let config = DbConfig {
            database_url: SecretString::from("postgresql://user:hunter2@db:5432/careerdesk"),
            pool_size: 5,
            query_timeout_secs: 5,
        };
        let redacted = config.redacted_url();
        assert!(!redacted.contains("hunter2"));
        assert!(redacted.contains("***"));
    }
}
