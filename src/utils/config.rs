use crate::types::{AppError, Result};
use std::env;
use std::time::Duration;

/// Default chat model when `AGENT_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gpt-4-turbo";
/// Fixed user agent sent with every page fetch.
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; ResearchAssistant/1.0)";
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_TAVILY_API_BASE: &str = "https://api.tavily.com";

/// Application configuration, read once and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub tavily_api_key: String,
    pub openai_api_base: String,
    pub tavily_api_base: String,
    pub agent_model: String,
    pub agent_temperature: f32,
    /// Default result count for web searches
    pub max_search_results: usize,
    /// HTTP request timeout in seconds
    pub request_timeout: u64,
    pub user_agent: String,
}

impl Config {
    /// Build a configuration with the given keys and default settings
    pub fn new(openai_api_key: impl Into<String>, tavily_api_key: impl Into<String>) -> Self {
        Self {
            openai_api_key: openai_api_key.into(),
            tavily_api_key: tavily_api_key.into(),
            openai_api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            tavily_api_base: DEFAULT_TAVILY_API_BASE.to_string(),
            agent_model: DEFAULT_MODEL.to_string(),
            agent_temperature: 0.3,
            max_search_results: 5,
            request_timeout: 30,
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Load from the process environment (and `.env`, if present), failing
    /// fast when a required API key is missing.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let config = Config {
            openai_api_key: var("OPENAI_API_KEY").unwrap_or_default(),
            tavily_api_key: var("TAVILY_API_KEY").unwrap_or_default(),
            openai_api_base: var("OPENAI_API_BASE")
                .unwrap_or_else(|| DEFAULT_OPENAI_API_BASE.to_string()),
            tavily_api_base: var("TAVILY_API_BASE")
                .unwrap_or_else(|| DEFAULT_TAVILY_API_BASE.to_string()),
            agent_model: var("AGENT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            agent_temperature: parse_var("AGENT_TEMPERATURE", var("AGENT_TEMPERATURE"), 0.3)?,
            max_search_results: parse_var("MAX_SEARCH_RESULTS", var("MAX_SEARCH_RESULTS"), 5)?,
            request_timeout: parse_var("REQUEST_TIMEOUT", var("REQUEST_TIMEOUT"), 30)?,
            user_agent: USER_AGENT.to_string(),
        };

        config.validate_required_keys()?;
        Ok(config)
    }

    /// Ensure both API keys are present
    pub fn validate_required_keys(&self) -> Result<()> {
        if self.openai_api_key.trim().is_empty() {
            return Err(AppError::Config(
                "OPENAI_API_KEY environment variable is required".to_string(),
            ));
        }
        if self.tavily_api_key.trim().is_empty() {
            return Err(AppError::Config(
                "TAVILY_API_KEY environment variable is required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        Some(value) => value.trim().parse().map_err(|_| {
            AppError::Config(format!("{} has an invalid value: '{}'", name, value))
        }),
        None => Ok(default),
    }
}
