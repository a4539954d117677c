use crate::core::engine::ReadingSettings;
use crate::utils::error::{FortuneError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_required_field,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Startup configuration. Every section and field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSettings,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Ask the language model; otherwise placeholder fortunes are used.
    pub use_ai: bool,
    /// Production run: JSON logs and no debug prompt dumps.
    pub live: bool,
    pub assets_dir: String,
    pub spread_index: usize,
    pub min_question_length: usize,
    pub remember_inputs: bool,
    pub state_dir: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            use_ai: false,
            live: false,
            assets_dir: "./assets".to_string(),
            spread_index: 0,
            min_question_length: 10,
            remember_inputs: true,
            state_dir: ".".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4-0125-preview".to_string(),
            api_key: None,
            timeout_seconds: 60,
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FortuneError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FortuneError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| FortuneError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Key from the config file, else from `OPENAI_API_KEY`. Unresolved
    /// `${...}` references count as absent.
    pub fn api_key(&self) -> Option<String> {
        self.llm
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty() && !key.starts_with("${"))
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.llm.timeout_seconds)
    }

    pub fn reading_settings(&self) -> ReadingSettings {
        ReadingSettings {
            min_question_length: self.app.min_question_length,
            timeout: self.timeout(),
            assets_dir: self.app.assets_dir.clone(),
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_path("app.assets_dir", &self.app.assets_dir)?;
        validate_path("app.state_dir", &self.app.state_dir)?;
        validate_range("app.min_question_length", self.app.min_question_length, 1, 1000)?;
        validate_range("llm.timeout_seconds", self.llm.timeout_seconds, 1, 600)?;

        if self.app.use_ai {
            validate_url("llm.endpoint", &self.llm.endpoint)?;
            validate_non_empty_string("llm.model", &self.llm.model)?;
            validate_required_field("llm.api_key", &self.api_key())?;
        }

        Ok(())
    }
}
