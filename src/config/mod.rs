use crate::core::error::DocChatError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    OpenRouter,
    DeepSeek,
    Anthropic,
}

impl Provider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Some(Provider::OpenAI),
            "openrouter" => Some(Provider::OpenRouter),
            "deepseek" => Some(Provider::DeepSeek),
            "anthropic" => Some(Provider::Anthropic),
            _ => None,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::OpenRouter => "https://openrouter.ai/api/v1",
            Provider::DeepSeek => "https://api.deepseek.com/v1",
            Provider::Anthropic => "https://api.anthropic.com/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAI => "gpt-4.1-mini",
            Provider::OpenRouter => "google/gemini-2.0-flash-001",
            Provider::DeepSeek => "deepseek-chat",
            Provider::Anthropic => "claude-3-5-haiku-latest",
        }
    }

    /// Environment variable consulted when the config file carries no key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::OpenRouter => "OPENROUTER_API_KEY",
            Provider::DeepSeek => "DEEPSEEK_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl Default for Provider {
    fn default() -> Self {
        Provider::OpenAI
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    pub active_provider: Option<Provider>,
    #[serde(default)]
    pub providers: HashMap<Provider, ProviderConfig>,
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".docchat")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    pub fn load() -> Result<Config, DocChatError> {
        let path = Self::config_path();

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config = serde_yml::from_str::<Config>(&contents)
                .map_err(|e| DocChatError::Config(format!("Parse {}: {}", path.display(), e)))?;
            return Ok(config);
        }

        let config = Config::default();
        let _ = config.save();
        Ok(config)
    }

    pub fn save(&self) -> Result<(), DocChatError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(&path, yaml_content)?;
        Ok(())
    }

    pub fn transcript_dir() -> PathBuf {
        Self::config_dir().join("transcripts")
    }

    /// Effective settings for one provider: config file values with the
    /// API key falling back to the provider's environment variable.
    ///
    /// The chat surface requires a key; without one startup fails.
    pub fn provider_config(&self, provider: Provider) -> Result<ProviderConfig, DocChatError> {
        let mut effective = self.providers.get(&provider).cloned().unwrap_or_default();

        if effective.api_key.is_none() {
            effective.api_key = std::env::var(provider.api_key_env()).ok();
        }

        match &effective.api_key {
            Some(key) if !key.trim().is_empty() => Ok(effective),
            _ => Err(DocChatError::Config(format!(
                "No API key for {:?}: set it in {} or via {}; chat is disabled without one",
                provider,
                Self::config_path().display(),
                provider.api_key_env(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!(Provider::from_str("OpenAI"), Some(Provider::OpenAI));
        assert_eq!(Provider::from_str("ANTHROPIC"), Some(Provider::Anthropic));
        assert_eq!(Provider::from_str("mystery"), None);
    }

    #[test]
    fn config_round_trips_through_yaml() {
        let mut providers = HashMap::new();
        providers.insert(
            Provider::OpenAI,
            ProviderConfig {
                api_key: Some("sk-test".to_string()),
                base_url: None,
                model: Some("gpt-4.1-mini".to_string()),
                temperature: Some(0.2),
            },
        );
        let config = Config {
            active_provider: Some(Provider::OpenAI),
            providers,
        };

        let yaml = serde_yml::to_string(&config).unwrap();
        let parsed: Config = serde_yml::from_str(&yaml).unwrap();

        assert_eq!(parsed.active_provider, Some(Provider::OpenAI));
        let pc = &parsed.providers[&Provider::OpenAI];
        assert_eq!(pc.api_key.as_deref(), Some("sk-test"));
        assert_eq!(pc.temperature, Some(0.2));
    }

    #[test]
    fn missing_api_key_disables_chat() {
        let config = Config::default();
        // Use a provider whose env var is very unlikely to be set in CI.
        unsafe { std::env::remove_var("DEEPSEEK_API_KEY") };
        let err = config.provider_config(Provider::DeepSeek).unwrap_err();
        assert!(matches!(err, DocChatError::Config(_)));
    }
}
