use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub llm_config: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the browser form
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "public".to_string()
}

/// Settings for the upstream completion service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_provider")]
    pub llm_provider: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub llm_api_key: Option<String>,
    pub organization_id: Option<String>,
    pub project_id: Option<String>,
}

fn default_llm_provider() -> String {
    "openai_llm".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini-2024-07-18".to_string()
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            llm_provider: default_llm_provider(),
            base_url: default_base_url(),
            model: default_model(),
            llm_api_key: None,
            organization_id: None,
            project_id: None,
        }
    }
}

impl LlmConfig {
    /// The credential, if one is set and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.llm_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }
        let content = fs::read_to_string(path)?;
        let path_lower = path.to_lowercase();
        Self::parse(&content, path_lower.ends_with(".json"))
    }

    /// Parse YAML (or JSON when `is_json`) after `${VAR}` substitution
    pub fn parse(content: &str, is_json: bool) -> Result<Self> {
        let content = substitute_env_vars(content)?;
        let config = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(config)
    }

    /// Try each candidate path in order, falling back to built-in defaults.
    /// Returns the config and the path it came from, if any.
    pub fn resolve(paths: &[String]) -> Result<(Self, Option<String>)> {
        let mut loaded = None;
        for path in paths {
            if !Path::new(path).exists() {
                tracing::debug!("No config at {}", path);
                continue;
            }
            // A config file that exists but does not parse is an operator error
            let config = Self::load(path)?;
            loaded = Some((config, path.clone()));
            break;
        }

        let (mut config, source) = match loaded {
            Some((config, path)) => (config, Some(path)),
            None => (Self::default(), None),
        };
        config.apply_env_overrides();
        Ok((config, source))
    }

    fn apply_env_overrides(&mut self) {
        if self.llm_config.api_key().is_none() {
            self.llm_config.llm_api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.system_config.port = port;
        }
    }
}

/// Replace environment variables: ${VAR_NAME}. Unset variables become empty.
fn substitute_env_vars(content: &str) -> Result<String> {
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    let replaced = pattern.replace_all(content, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_default()
    });
    Ok(replaced.into_owned())
}
