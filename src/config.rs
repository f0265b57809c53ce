use std::env;
use anyhow::{bail, Context, Result};

/// Which repository implementation backs the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Spanner(SpannerConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannerConfig {
    pub emulator_host: Option<String>,
    pub project: String,
    pub instance: String,
    pub database: String,
}

impl SpannerConfig {
    pub fn database_path(&self) -> String {
        format!(
            "projects/{}/instances/{}/databases/{}",
            self.project, self.instance, self.database
        )
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match lookup("STORAGE_BACKEND").as_deref() {
            None | Some("memory") => StorageBackend::Memory,
            Some("spanner") => StorageBackend::Spanner(SpannerConfig {
                emulator_host: lookup("SPANNER_EMULATOR_HOST"),
                project: lookup("SPANNER_PROJECT")
                    .context("SPANNER_PROJECT environment variable is required")?,
                instance: lookup("SPANNER_INSTANCE")
                    .context("SPANNER_INSTANCE environment variable is required")?,
                database: lookup("SPANNER_DATABASE")
                    .context("SPANNER_DATABASE environment variable is required")?,
            }),
            Some(other) => bail!(
                "STORAGE_BACKEND must be one of: memory, spanner, got '{}'",
                other
            ),
        };

        let service_port = lookup("SERVICE_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Config {
            storage,
            service_port,
            service_host,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service_host, self.service_port)
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        match &self.storage {
            StorageBackend::Memory => tracing::info!("  Storage backend: in-memory"),
            StorageBackend::Spanner(spanner) => {
                tracing::info!("  Storage backend: spanner");
                tracing::info!("  Spanner emulator: {}",
                    spanner.emulator_host.as_deref().unwrap_or("disabled (using production)"));
                tracing::info!("  Spanner database: {}", spanner.database_path());
            }
        }
        tracing::info!("  Service listening on: {}", self.bind_address());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    const SPANNER_VARS: [(&str, &str); 4] = [
        ("STORAGE_BACKEND", "spanner"),
        ("SPANNER_PROJECT", "test-project"),
        ("SPANNER_INSTANCE", "test-instance"),
        ("SPANNER_DATABASE", "test-database"),
    ];

    #[test]
    fn test_config_with_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.service_port, 3000);
        assert_eq!(config.service_host, "0.0.0.0");
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_config_with_spanner() {
        let mut vars = SPANNER_VARS.to_vec();
        vars.push(("SPANNER_EMULATOR_HOST", "localhost:9010"));
        vars.push(("SERVICE_PORT", "8080"));
        vars.push(("SERVICE_HOST", "127.0.0.1"));

        let config = load(&vars).unwrap();

        let StorageBackend::Spanner(spanner) = config.storage else {
            panic!("expected spanner backend");
        };
        assert_eq!(spanner.emulator_host, Some("localhost:9010".to_string()));
        assert_eq!(
            spanner.database_path(),
            "projects/test-project/instances/test-instance/databases/test-database"
        );
        assert_eq!(config.service_port, 8080);
        assert_eq!(config.service_host, "127.0.0.1");
    }

    #[test]
    fn test_missing_required_spanner_var() {
        let vars: Vec<_> = SPANNER_VARS
            .iter()
            .copied()
            .filter(|(k, _)| *k != "SPANNER_DATABASE")
            .collect();

        let error = load(&vars).unwrap_err();
        assert!(error.to_string().contains("SPANNER_DATABASE"));
    }

    #[test]
    fn test_spanner_vars_ignored_for_memory() {
        let config = load(&[("SPANNER_PROJECT", "test-project")]).unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
    }

    #[test]
    fn test_unknown_backend() {
        let error = load(&[("STORAGE_BACKEND", "postgres")]).unwrap_err();
        assert!(error.to_string().contains("STORAGE_BACKEND"));
    }

    #[test]
    fn test_invalid_port() {
        let error = load(&[("SERVICE_PORT", "not-a-number")]).unwrap_err();
        assert!(error.to_string().contains("SERVICE_PORT"));
    }

    #[test]
    fn test_port_out_of_range() {
        assert!(load(&[("SERVICE_PORT", "99999")]).is_err());
    }
}
