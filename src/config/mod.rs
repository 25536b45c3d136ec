mod env;

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::error::{NavigatorError, Result};
use std::fs;

pub use env::{get_env_value, redact};

/// Default GitHub REST API endpoint
pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";

/// Main configuration struct for the application
///
/// Built once at startup and handed to the client, summarizer and server
/// constructors. Nothing reads the process environment after this value exists.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Hosting provider settings
    pub github: GitHubConfig,
    /// AI provider settings
    pub openai: OpenAiConfig,
    /// HTTP server settings
    pub server: ServerConfig,
    /// Fallback log level when `RUST_LOG` is not set
    pub log_level: String,
}

/// Settings for the GitHub contents client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Bearer token; absent means unauthenticated (rate-limited) access
    pub token: Option<String>,
    /// REST API base URL
    pub api_base: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Settings for the chat completion summarizer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key; absent disables summaries
    pub api_key: Option<String>,
    /// Alternative API base (proxies, compatible providers)
    pub api_base: Option<String>,
    /// Chat model name
    pub model: String,
    /// Completion token cap
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Longest file excerpt sent for a file summary, in characters
    pub file_summary_max_chars: usize,
}

/// Settings for the HTTP listener
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind
    pub bind_addr: String,
    /// The single browser origin allowed by CORS
    pub allowed_origin: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: DEFAULT_GITHUB_API_BASE.to_string(),
            user_agent: concat!("code-navigator/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

impl GitHubConfig {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: None,
            model: "gpt-4".to_string(),
            max_tokens: 128,
            temperature: 0.7,
            file_summary_max_chars: 12_000,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            allowed_origin: "http://localhost:5173".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration the way the binaries do
    ///
    /// Starts from `path` when given, otherwise from the default config file
    /// location if it exists, then applies `.env` and process environment
    /// overrides and validates the result.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        // A missing .env file is the common case
        let _ = dotenvy::dotenv();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            NavigatorError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            NavigatorError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    /// `<config_dir>/code-navigator/config.toml`
    pub fn default_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|dir| dir.join("code-navigator").join("config.toml"))
    }

    /// Applies environment variable overrides on top of the current values
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(get_env_value)
    }

    /// Applies overrides from an arbitrary lookup; empty values count as unset
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("GITHUB_TOKEN") {
            self.github.token = Some(token);
        }
        if let Some(base) = lookup("GITHUB_API_BASE_URL") {
            self.github.api_base = base;
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.openai.api_key = Some(key);
        }
        if let Some(base) = lookup("OPENAI_API_BASE") {
            self.openai.api_base = Some(base);
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            self.openai.model = model;
        }
        if let Some(value) = lookup("OPENAI_MAX_TOKENS") {
            self.openai.max_tokens = parse_override("OPENAI_MAX_TOKENS", &value)?;
        }
        if let Some(value) = lookup("OPENAI_TEMPERATURE") {
            self.openai.temperature = parse_override("OPENAI_TEMPERATURE", &value)?;
        }
        if let Some(addr) = lookup("NAVIGATOR_BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Some(origin) = lookup("NAVIGATOR_ALLOWED_ORIGIN") {
            self.server.allowed_origin = origin;
        }
        if let Some(level) = lookup("NAVIGATOR_LOG_LEVEL") {
            self.log_level = level;
        }
        Ok(())
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(token) = &self.github.token {
            if token.trim().is_empty() {
                return Err(NavigatorError::Config("GitHub token is empty".into()));
            }
        }
        if let Some(key) = &self.openai.api_key {
            if key.trim().is_empty() {
                return Err(NavigatorError::Config("OpenAI API key is empty".into()));
            }
        }
        url::Url::parse(&self.github.api_base)?;
        self.bind_addr()?;
        axum::http::HeaderValue::from_str(&self.server.allowed_origin)
            .map_err(|e| NavigatorError::Config(format!("Invalid allowed origin: {}", e)))?;
        Ok(())
    }

    /// Parsed listen address
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let addr = &self.server.bind_addr;
        addr.parse()
            .map_err(|e| NavigatorError::Config(format!("Invalid bind address {}: {}", addr, e)))
    }

    /// Effective log level
    pub fn log_level(&self) -> &str {
        if self.log_level.is_empty() {
            "info"
        } else {
            &self.log_level
        }
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| NavigatorError::Config(format!("Invalid value for {}: {}", key, e)))
}
