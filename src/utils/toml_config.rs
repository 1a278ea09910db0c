//! TOML-based configuration for Delve
//!
//! Configuration lives in `delve.toml`. Every field has a default, so the file
//! itself is optional; the only thing that must exist is the credential
//! environment variable named by `provider.api_key_env`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure loaded from delve.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DelveConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub research: ResearchConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Environment variable containing the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model used for planning and synthesis
    #[serde(default = "default_model")]
    pub model: String,

    /// Model used for web search
    #[serde(default = "default_model")]
    pub search_model: String,

    /// One of `low`, `medium`, `high`
    #[serde(default = "default_search_context_size")]
    pub search_context_size: String,

    #[serde(default = "default_user_location_country")]
    pub user_location_country: String,

    /// Per-request timeout applied by the HTTP client
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_search_context_size() -> String {
    "medium".to_string()
}

fn default_user_location_country() -> String {
    "US".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            api_base: default_api_base(),
            model: default_model(),
            search_model: default_model(),
            search_context_size: default_search_context_size(),
            user_location_country: default_user_location_country(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ============= Research Configuration =============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Maximum characters of each search body handed to synthesis
    #[serde(default = "default_body_char_limit")]
    pub body_char_limit: usize,

    /// Appended to a body that was cut
    #[serde(default = "default_ellipsis")]
    pub ellipsis: String,

    /// Description used when report sources are backfilled
    #[serde(default = "default_placeholder_description")]
    pub placeholder_description: String,
}

fn default_body_char_limit() -> usize {
    800
}

fn default_ellipsis() -> String {
    "...".to_string()
}

fn default_placeholder_description() -> String {
    "Research source".to_string()
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            body_char_limit: default_body_char_limit(),
            ellipsis: default_ellipsis(),
            placeholder_description: default_placeholder_description(),
        }
    }
}

// ============= Configuration Loading & Validation =============

const SEARCH_CONTEXT_SIZES: &[&str] = &["low", "medium", "high"];

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' is not set")]
    MissingEnvVar(String),
}

impl From<ConfigError> for crate::types::AppError {
    fn from(err: ConfigError) -> Self {
        crate::types::AppError::Config(err.to_string())
    }
}

impl DelveConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a file, falling back to defaults when it is absent
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::FileNotFound(path)) => {
                tracing::debug!("No config at {:?}, using defaults", path);
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// Parse and validate configuration text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DelveConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for internal consistency
    ///
    /// The credential is not checked here; see [`DelveConfig::api_key`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.api_key_env.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "provider.api_key_env must name an environment variable".to_string(),
            ));
        }

        if self.provider.api_base.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "provider.api_base must not be empty".to_string(),
            ));
        }

        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "provider.timeout_secs must be greater than zero".to_string(),
            ));
        }

        if !SEARCH_CONTEXT_SIZES.contains(&self.provider.search_context_size.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "provider.search_context_size must be one of {:?}, got '{}'",
                SEARCH_CONTEXT_SIZES, self.provider.search_context_size
            )));
        }

        if self.research.body_char_limit == 0 {
            return Err(ConfigError::ValidationError(
                "research.body_char_limit must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok().filter(|v| !v.trim().is_empty())
    }

    /// Get the generation service credential from the environment
    pub fn api_key(&self) -> Result<String, ConfigError> {
        self.resolve_env(&self.provider.api_key_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.provider.api_key_env.clone()))
    }

    /// Socket address string for the HTTP server
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
