use crate::health::{CheckDepth, FailurePolicy};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub health: HealthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    pub policy: FailurePolicy,
    pub check_depth: CheckDepth,
    /// Upper bound for a single probe, in seconds. Zero disables the bound.
    pub check_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            health: HealthConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 10,
            min_connections: 1,
            connection_timeout_seconds: 30,
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            policy: FailurePolicy::CollectAll,
            check_depth: CheckDepth::Query,
            check_timeout_seconds: 10,
        }
    }
}

impl DatabaseConfig {
    /// Path of the backing file for file-backed sqlite URLs, if any.
    pub fn file_path(&self) -> Option<PathBuf> {
        let rest = self.url.strip_prefix("sqlite:")?;
        let rest = rest.strip_prefix("//").unwrap_or(rest);
        let rest = match rest.split_once('?') {
            Some((path, _)) => path,
            None => rest,
        };
        if rest.is_empty() || rest.starts_with(':') {
            return None;
        }
        Some(PathBuf::from(rest))
    }
}

impl HealthConfig {
    pub fn check_timeout(&self) -> Option<Duration> {
        if self.check_timeout_seconds == 0 {
            None
        } else {
            Some(Duration::from_secs(self.check_timeout_seconds))
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder.add_source(
            Environment::with_prefix("APP")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.database.url.is_empty() {
            return Err(ConfigError::Message(
                "Database URL cannot be empty".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "Database max_connections cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Message(
                "Database min_connections cannot exceed max_connections".to_string(),
            ));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.health.policy, FailurePolicy::CollectAll);
        assert_eq!(config.health.check_depth, CheckDepth::Query);
    }

    #[test]
    fn test_bind_address() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_pool_bounds() {
        let mut config = AppConfig::default();
        config.database.min_connections = 20;
        config.database.max_connections = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_database_file_path() {
        let mut config = DatabaseConfig::default();
        assert_eq!(config.file_path(), None);

        config.url = "sqlite:./data.db".to_string();
        assert_eq!(config.file_path(), Some(PathBuf::from("./data.db")));

        config.url = "sqlite:./data.db?mode=rwc".to_string();
        assert_eq!(config.file_path(), Some(PathBuf::from("./data.db")));

        config.url = "sqlite::memory:".to_string();
        assert_eq!(config.file_path(), None);
    }

    #[test]
    fn test_check_timeout_zero_disables_bound() {
        let mut config = HealthConfig::default();
        assert!(config.check_timeout().is_some());

        config.check_timeout_seconds = 0;
        assert!(config.check_timeout().is_none());
    }

    #[test]
    fn test_policy_and_depth_parse_from_kebab_case() {
        let policy: FailurePolicy = serde_json::from_str("\"fail-fast\"").unwrap();
        assert_eq!(policy, FailurePolicy::FailFast);

        let depth: CheckDepth = serde_json::from_str("\"connect\"").unwrap();
        assert_eq!(depth, CheckDepth::Connect);
    }
}
