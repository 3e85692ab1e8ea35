use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// LLM endpoint settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Web search provider settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Write debug logs to a file under the config directory
    #[serde(default)]
    pub debug: bool,

    /// Override the debug log file location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            search: SearchConfig::default(),
            debug: false,
            debug_log_path: None,
        }
    }
}

/// Anthropic Messages API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// API key (overridden by ANTHROPIC_API_KEY)
    #[serde(default)]
    pub api_key: String,

    /// Optional custom API base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Temperature (0.0 - 1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            api_base: None,
            max_tokens: Some(8192),
            temperature: None,
        }
    }
}

/// Search provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Brave Search API key (overridden by BRAVE_API_KEY)
    #[serde(default)]
    pub brave_api_key: String,

    /// Default locale for searches
    #[serde(default = "default_region")]
    pub region: String,

    /// Default maximum hits per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            brave_api_key: String::new(),
            region: default_region(),
            max_results: default_max_results(),
        }
    }
}

fn default_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

fn default_region() -> String {
    crate::search::DEFAULT_REGION.to_string()
}

fn default_max_results() -> usize {
    crate::search::DEFAULT_MAX_RESULTS
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Failed to get config directory")?
        .join("nomikai");

    fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

    Ok(config_dir.join("config.toml"))
}

/// Load configuration from file, or create default if not exists.
/// Environment variables win over file values for the API keys.
pub fn load_or_create_config() -> Result<Config> {
    let path = config_path()?;

    let mut config = if path.exists() {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")?
    } else {
        let config = Config::default();
        save_config(&config)?;

        println!("Created default config at: {}", path.display());
        println!("Please edit this file to add your API credentials.");

        config
    };

    if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
        if !key.is_empty() {
            config.llm.api_key = key;
        }
    }
    if let Ok(key) = std::env::var("BRAVE_API_KEY") {
        if !key.is_empty() {
            config.search.brave_api_key = key;
        }
    }

    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path()?;
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(&path, content).context("Failed to write config file")?;
    Ok(())
}
