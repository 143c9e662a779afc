// src/core/config_manager.rs
//! Unified configuration: file-based paths plus environment-provided credentials

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::environment::EnvironmentConfig;

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_GLASSDOOR_HOST: &str = "real-time-glassdoor-data.p.rapidapi.com";
pub const DEFAULT_LINKEDIN_JOBS_HOST: &str = "linkedin-job-search-api.p.rapidapi.com";
pub const DEFAULT_JSEARCH_HOST: &str = "jsearch.p.rapidapi.com";
pub const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org/v2";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEV_SESSION_SECRET: &str = "culturemap-dev-session-secret";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub service: ServiceConfig,
}

/// Credentials and endpoints for everything the server talks to.
/// A missing key disables the matching integration rather than failing startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub session_secret: String,
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub openai_model: String,
    pub glassdoor_api_key: Option<String>,
    pub glassdoor_base_url: String,
    pub glassdoor_host: String,
    pub linkedin_jobs_api_key: Option<String>,
    pub linkedin_jobs_base_url: String,
    pub linkedin_jobs_host: String,
    pub jsearch_api_key: Option<String>,
    pub jsearch_base_url: String,
    pub jsearch_host: String,
    pub news_api_key: Option<String>,
    pub news_api_url: String,
    pub timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            session_secret: DEV_SESSION_SECRET.to_string(),
            openai_api_key: None,
            openai_api_url: DEFAULT_OPENAI_URL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            glassdoor_api_key: None,
            glassdoor_base_url: format!("https://{}", DEFAULT_GLASSDOOR_HOST),
            glassdoor_host: DEFAULT_GLASSDOOR_HOST.to_string(),
            linkedin_jobs_api_key: None,
            linkedin_jobs_base_url: format!("https://{}", DEFAULT_LINKEDIN_JOBS_HOST),
            linkedin_jobs_host: DEFAULT_LINKEDIN_JOBS_HOST.to_string(),
            jsearch_api_key: None,
            jsearch_base_url: format!("https://{}", DEFAULT_JSEARCH_HOST),
            jsearch_host: DEFAULT_JSEARCH_HOST.to_string(),
            news_api_key: None,
            news_api_url: DEFAULT_NEWS_API_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ConfigManager {
    /// Load all configurations
    pub fn load() -> Result<Self> {
        let environment = EnvironmentConfig::load()?;
        let service = Self::load_service()?;

        Ok(Self {
            environment,
            service,
        })
    }

    /// Load service configuration from the process environment
    fn load_service() -> Result<ServiceConfig> {
        let defaults = ServiceConfig::default();

        let session_secret = match env_opt("SESSION_SECRET") {
            Some(secret) => secret,
            None if EnvironmentConfig::get_environment() == "production" => {
                anyhow::bail!("SESSION_SECRET must be set in production")
            }
            None => {
                warn!("SESSION_SECRET not set, using development secret");
                defaults.session_secret.clone()
            }
        };

        let timeout_seconds = match env_opt("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("HTTP_TIMEOUT_SECS must be a positive integer")?,
            None => defaults.timeout_seconds,
        };

        let glassdoor_host = env_opt("GLASSDOOR_API_HOST").unwrap_or(defaults.glassdoor_host);
        let linkedin_jobs_host =
            env_opt("RAPIDAPI_LINKEDIN_JOBS_HOST").unwrap_or(defaults.linkedin_jobs_host);
        let jsearch_host = env_opt("RAPIDAPI_JSEARCH_HOST").unwrap_or(defaults.jsearch_host);

        let config = ServiceConfig {
            session_secret,
            openai_api_key: env_opt("OPENAI_API_KEY"),
            openai_api_url: env_opt("OPENAI_API_URL").unwrap_or(defaults.openai_api_url),
            openai_model: env_opt("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            glassdoor_api_key: env_opt("GLASSDOOR_API_KEY"),
            glassdoor_base_url: format!("https://{}", glassdoor_host),
            glassdoor_host,
            linkedin_jobs_api_key: env_opt("RAPIDAPI_LINKEDIN_JOBS_KEY"),
            linkedin_jobs_base_url: format!("https://{}", linkedin_jobs_host),
            linkedin_jobs_host,
            jsearch_api_key: env_opt("RAPIDAPI_JSEARCH_KEY"),
            jsearch_base_url: format!("https://{}", jsearch_host),
            jsearch_host,
            news_api_key: env_opt("NEWS_API_KEY"),
            news_api_url: env_opt("NEWS_API_URL").unwrap_or(defaults.news_api_url),
            timeout_seconds,
        };

        info!(
            "Integrations configured: llm={}, glassdoor={}, linkedin_jobs={}, jsearch={}, news={}",
            config.openai_api_key.is_some(),
            config.glassdoor_api_key.is_some(),
            config.linkedin_jobs_api_key.is_some(),
            config.jsearch_api_key.is_some(),
            config.news_api_key.is_some()
        );

        Ok(config)
    }

    /// Ensure all required directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        self.environment.ensure_directories().await
    }
}

/// Read an env var, treating empty values as unset
fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_service_config_has_no_credentials() {
        let config = ServiceConfig::default();
        assert!(config.openai_api_key.is_none());
        assert!(config.glassdoor_api_key.is_none());
        assert_eq!(
            config.jsearch_base_url,
            format!("https://{}", DEFAULT_JSEARCH_HOST)
        );
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_env_opt_ignores_blank_values() {
        std::env::set_var("CULTUREMAP_TEST_BLANK_VAR", "   ");
        assert_eq!(env_opt("CULTUREMAP_TEST_BLANK_VAR"), None);
        std::env::set_var("CULTUREMAP_TEST_SET_VAR", " value ");
        assert_eq!(
            env_opt("CULTUREMAP_TEST_SET_VAR"),
            Some("value".to_string())
        );
    }
}
