// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub database_path: PathBuf,
    pub log_path: PathBuf,
    pub seed_data_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/culturemap.db"),
            log_path: PathBuf::from("/tmp/culturemap.log"),
            seed_data_path: PathBuf::from("data"),
        }
    }
}

impl EnvironmentConfig {
    /// Load configuration based on environment, from config.yaml when present
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let config_path = PathBuf::from("config.yaml");
        let config = if config_path.exists() {
            Self::load_from_file(&config_path, &environment)?
        } else {
            info!("config.yaml not found, using default paths");
            Self::default()
        };

        Ok(Self {
            database_path: Self::resolve_path(&config.database_path)?,
            log_path: Self::resolve_path(&config.log_path)?,
            seed_data_path: Self::resolve_path(&config.seed_data_path)?,
        })
    }

    pub fn get_environment() -> String {
        std::env::var("CULTUREMAP_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(config_path: &Path, environment: &str) -> Result<Self> {
        let config_content =
            std::fs::read_to_string(config_path).context("Failed to read config.yaml")?;
        Self::parse(&config_content, environment)
    }

    fn parse(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;

        Ok(match environment {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }

    /// Ensure the database and log parent directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        for path in [&self.database_path, &self.log_path] {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        info!("All configured directories ensured to exist");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
local:
  database_path: data/local.db
  log_path: /tmp/local.log
  seed_data_path: data
production:
  database_path: /app/data/culturemap.db
  log_path: /var/log/culturemap.log
  seed_data_path: /app/data
"#;

    #[test]
    fn test_parse_selects_environment_section() {
        let local = EnvironmentConfig::parse(SAMPLE, "local").unwrap();
        assert_eq!(local.database_path, PathBuf::from("data/local.db"));

        let production = EnvironmentConfig::parse(SAMPLE, "production").unwrap();
        assert_eq!(
            production.database_path,
            PathBuf::from("/app/data/culturemap.db")
        );
    }

    #[test]
    fn test_unknown_environment_falls_back_to_local() {
        let config = EnvironmentConfig::parse(SAMPLE, "staging").unwrap();
        assert_eq!(config.log_path, PathBuf::from("/tmp/local.log"));
    }

    #[test]
    fn test_parse_rejects_malformed_yaml() {
        assert!(EnvironmentConfig::parse("local: [", "local").is_err());
    }
}
