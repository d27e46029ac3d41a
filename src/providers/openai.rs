use super::{LLMProvider, Message};
use crate::core::error::DocChatError;
use crate::providers::openai_compatible::OpenAICompatibleProvider;
use futures::stream::BoxStream;

#[derive(Clone)]
pub struct OpenAIProvider {
    inner: OpenAICompatibleProvider,
}

impl OpenAIProvider {
    pub fn new(api_key: Option<String>, model: String, temperature: Option<f32>) -> Self {
        Self::with_endpoint(
            "https://api.openai.com/v1".to_string(),
            api_key,
            model,
            temperature,
        )
    }

    pub fn with_endpoint(
        endpoint: String,
        api_key: Option<String>,
        model: String,
        temperature: Option<f32>,
    ) -> Self {
        Self {
            inner: OpenAICompatibleProvider::new(
                endpoint,
                api_key.unwrap_or_default(),
                model,
                temperature,
                None,
            ),
        }
    }
}

#[async_trait::async_trait]
impl LLMProvider for OpenAIProvider {
    async fn get_response(&self, messages: &[Message]) -> Result<String, DocChatError> {
        self.inner.get_response(messages).await
    }

    async fn get_response_stream(
        &self,
        messages: &[Message],
    ) -> Result<BoxStream<'static, Result<String, DocChatError>>, DocChatError> {
        self.inner.get_response_stream(messages).await
    }

    fn set_model(&mut self, model: &str) {
        self.inner.model = model.to_string();
    }

    fn clone_provider(&self) -> Box<dyn LLMProvider> {
        Box::new(self.clone())
    }
}
