use crate::config::{Provider, ProviderConfig};
use crate::core::error::DocChatError;
use crate::providers::{
    LLMProvider, anthropic::AnthropicProvider, deepseek::DeepSeekProvider, openai::OpenAIProvider,
    openrouter::OpenRouterProvider,
};
use std::collections::HashMap;

type ProviderCreator =
    Box<dyn Fn(&ProviderConfig) -> Result<Box<dyn LLMProvider>, DocChatError> + Send + Sync>;

pub struct ProviderFactory {
    creators: HashMap<Provider, ProviderCreator>,
}

impl ProviderFactory {
    pub fn new() -> Self {
        let mut creators: HashMap<Provider, ProviderCreator> = HashMap::new();

        creators.insert(
            Provider::OpenAI,
            Box::new(|config: &ProviderConfig| {
                let model = config
                    .model
                    .clone()
                    .unwrap_or_else(|| Provider::OpenAI.default_model().to_string());
                let provider = match &config.base_url {
                    Some(base_url) => OpenAIProvider::with_endpoint(
                        base_url.clone(),
                        config.api_key.clone(),
                        model,
                        config.temperature,
                    ),
                    None => OpenAIProvider::new(config.api_key.clone(), model, config.temperature),
                };
                Ok(Box::new(provider) as Box<dyn LLMProvider>)
            }),
        );

        creators.insert(
            Provider::OpenRouter,
            Box::new(|config: &ProviderConfig| {
                let model = config
                    .model
                    .clone()
                    .unwrap_or_else(|| Provider::OpenRouter.default_model().to_string());
                let provider = match &config.base_url {
                    Some(base_url) => OpenRouterProvider::with_endpoint(
                        base_url.clone(),
                        config.api_key.clone(),
                        model,
                        config.temperature,
                    ),
                    None => {
                        OpenRouterProvider::new(config.api_key.clone(), model, config.temperature)
                    }
                };
                Ok(Box::new(provider) as Box<dyn LLMProvider>)
            }),
        );

        creators.insert(
            Provider::DeepSeek,
            Box::new(|config: &ProviderConfig| {
                let model = config
                    .model
                    .clone()
                    .unwrap_or_else(|| Provider::DeepSeek.default_model().to_string());
                let provider = match &config.base_url {
                    Some(base_url) => DeepSeekProvider::with_endpoint(
                        base_url.clone(),
                        config.api_key.clone(),
                        model,
                        config.temperature,
                    ),
                    None => {
                        DeepSeekProvider::new(config.api_key.clone(), model, config.temperature)
                    }
                };
                Ok(Box::new(provider) as Box<dyn LLMProvider>)
            }),
        );

        creators.insert(
            Provider::Anthropic,
            Box::new(|config: &ProviderConfig| {
                let model = config
                    .model
                    .clone()
                    .unwrap_or_else(|| Provider::Anthropic.default_model().to_string());
                let provider = match &config.base_url {
                    Some(base_url) => AnthropicProvider::with_endpoint(
                        base_url.clone(),
                        config.api_key.clone(),
                        model,
                        config.temperature,
                    ),
                    None => {
                        AnthropicProvider::new(config.api_key.clone(), model, config.temperature)
                    }
                };
                Ok(Box::new(provider) as Box<dyn LLMProvider>)
            }),
        );

        Self { creators }
    }

    pub fn create(
        &self,
        provider: &Provider,
        config: &ProviderConfig,
    ) -> Result<Box<dyn LLMProvider>, DocChatError> {
        self.creators
            .get(provider)
            .ok_or_else(|| DocChatError::Config(format!("Provider not found: {:?}", provider)))
            .and_then(|creator| creator(config))
    }
}

impl Default for ProviderFactory {
    fn default() -> Self {
        Self::new()
    }
}
