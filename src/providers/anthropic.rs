use crate::core::error::DocChatError;
use crate::providers::base_client::HttpClient;
use crate::providers::{LLMProvider, Message, Role};
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

const MAX_TOKENS: u32 = 4096;

/// Parser for Anthropic's event-typed streaming response
pub fn anthropic_stream_parser(data: String) -> Result<Option<String>, DocChatError> {
    let mut content = String::new();

    for line in data.lines() {
        if line.starts_with("data:") {
            let data_json = line[5..].trim();
            if data_json.is_empty() {
                continue;
            }
            let parsed: Value = match serde_json::from_str(data_json) {
                Ok(v) => v,
                Err(_) => continue,
            };

            if parsed["type"] == "content_block_delta" {
                if let Some(delta) = parsed.get("delta") {
                    if delta["type"] == "text_delta" {
                        if let Some(text) = delta.get("text").and_then(|t| t.as_str()) {
                            content.push_str(text);
                        }
                    }
                }
            } else if parsed["type"] == "error" {
                if let Some(message) = parsed
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                {
                    return Err(DocChatError::Gateway(format!(
                        "Anthropic stream error: {}",
                        message
                    )));
                }
            }
        }
    }

    if content.is_empty() {
        Ok(None)
    } else {
        Ok(Some(content))
    }
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<AnthropicMessage>,
    stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

#[derive(Clone)]
pub struct AnthropicProvider {
    client: HttpClient,
    model: String,
    temperature: Option<f32>,
}

impl AnthropicProvider {
    pub fn new(api_key: Option<String>, model: String, temperature: Option<f32>) -> Self {
        Self::with_endpoint(
            "https://api.anthropic.com/v1".to_string(),
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
        let mut extra_headers = HashMap::new();
        extra_headers.insert("anthropic-version".to_string(), "2023-06-01".to_string());
        Self {
            client: HttpClient::new(
                endpoint,
                Some(("x-api-key".to_string(), api_key.unwrap_or_default())),
                Some(extra_headers),
            ),
            model,
            temperature,
        }
    }

    /// Anthropic carries the system instruction outside the turn list.
    fn build_payload(&self, messages: &[Message], stream: bool) -> AnthropicRequest {
        let system = messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.clone());

        let turns = messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| AnthropicMessage {
                role: match m.role {
                    Role::User => "user".to_string(),
                    Role::Assistant => "assistant".to_string(),
                    Role::System => unreachable!(),
                },
                content: m.content.clone(),
            })
            .collect();

        AnthropicRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: turns,
            stream: Some(stream),
            system,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    async fn get_response(&self, messages: &[Message]) -> Result<String, DocChatError> {
        let payload = self.build_payload(messages, false);

        let response = self.client.post("messages", &payload).await?;
        let response_body = response.text().await?;
        let parsed: AnthropicResponse = serde_json::from_str(&response_body)?;

        match parsed.content.first() {
            Some(block) => Ok(block.text.trim().to_string()),
            None => Err(DocChatError::Gateway(
                "Empty response from Anthropic".to_string(),
            )),
        }
    }

    async fn get_response_stream(
        &self,
        messages: &[Message],
    ) -> Result<BoxStream<'static, Result<String, DocChatError>>, DocChatError> {
        let payload = self.build_payload(messages, true);

        let response = self.client.post("messages", &payload).await?;
        let stream = self
            .client
            .stream_response(response, anthropic_stream_parser)
            .await?;

        Ok(stream)
    }

    fn set_model(&mut self, model: &str) {
        self.model = model.to_string();
    }

    fn clone_provider(&self) -> Box<dyn LLMProvider> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_extracts_text_deltas() {
        let data = "data: {\"type\":\"content_block_delta\",\"delta\":{\"type\":\"text_delta\",\"text\":\"hi\"}}\n".to_string();
        assert_eq!(anthropic_stream_parser(data).unwrap().as_deref(), Some("hi"));
    }

    #[test]
    fn parser_surfaces_stream_errors() {
        let data = "data: {\"type\":\"error\",\"error\":{\"message\":\"overloaded\"}}\n".to_string();
        assert!(anthropic_stream_parser(data).is_err());
    }

    #[test]
    fn system_turn_is_lifted_out_of_message_list() {
        let provider = AnthropicProvider::new(Some("k".into()), "claude".into(), None);
        let payload = provider.build_payload(
            &[Message::system("instructions"), Message::user("question")],
            false,
        );
        assert_eq!(payload.system.as_deref(), Some("instructions"));
        assert_eq!(payload.messages.len(), 1);
        assert_eq!(payload.messages[0].role, "user");
    }
}
