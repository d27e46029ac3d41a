use crate::core::error::DocChatError;
use crate::providers::base_client::HttpClient;
use crate::providers::{Message, Role};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Common parser for OpenAI-compatible streaming responses
pub fn openai_stream_parser(data: String) -> Result<Option<String>, DocChatError> {
    let mut content = String::new();

    for line in data.lines() {
        if line.starts_with("data:") {
            let data = line[5..].trim();
            if data == "[DONE]" {
                return Ok(None);
            }
            if data.is_empty() {
                continue;
            }

            let parsed: serde_json::Value = serde_json::from_str(data).map_err(|e| {
                DocChatError::Serialization(format!("Failed to parse stream data: {}", e))
            })?;

            if let Some(choices) = parsed.get("choices").and_then(|c| c.as_array()) {
                if let Some(first_choice) = choices.first() {
                    if let Some(delta) = first_choice.get("delta") {
                        if let Some(text) = delta.get("content").and_then(|c| c.as_str()) {
                            content.push_str(text);
                        }
                    }
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
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatCompletionMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatCompletionMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: String,
}

fn to_request_messages(messages: &[Message]) -> Vec<ChatCompletionMessage> {
    messages
        .iter()
        .map(|m| ChatCompletionMessage {
            role: match m.role {
                Role::System => "system".to_string(),
                Role::User => "user".to_string(),
                Role::Assistant => "assistant".to_string(),
            },
            content: m.content.clone(),
        })
        .collect()
}

#[derive(Clone)]
pub struct OpenAICompatibleProvider {
    client: HttpClient,
    pub model: String,
    pub temperature: Option<f32>,
}

impl OpenAICompatibleProvider {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        temperature: Option<f32>,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Self {
        let auth_header = Some(("Authorization".to_string(), format!("Bearer {}", api_key)));

        Self {
            client: HttpClient::new(base_url, auth_header, extra_headers),
            model,
            temperature,
        }
    }

    pub async fn get_response(&self, messages: &[Message]) -> Result<String, DocChatError> {
        let payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: to_request_messages(messages),
            stream: None,
            temperature: self.temperature,
        };

        let response = self.client.post("chat/completions", &payload).await?;

        let response_body: String = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&response_body)?;

        if parsed.choices.is_empty() {
            return Err(DocChatError::Gateway(
                "No choices in API response".to_string(),
            ));
        }

        Ok(parsed.choices[0].message.content.trim().to_string())
    }

    pub async fn get_response_stream(
        &self,
        messages: &[Message],
    ) -> Result<futures::stream::BoxStream<'static, Result<String, DocChatError>>, DocChatError>
    {
        let payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: to_request_messages(messages),
            stream: Some(true),
            temperature: self.temperature,
        };

        let response = self.client.post("chat/completions", &payload).await?;

        let stream = self
            .client
            .stream_response(response, openai_stream_parser)
            .await?;

        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_extracts_delta_content() {
        let data = "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\
                    data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n"
            .to_string();
        let parsed = openai_stream_parser(data).unwrap();
        assert_eq!(parsed.as_deref(), Some("Hello"));
    }

    #[test]
    fn parser_signals_done() {
        let parsed = openai_stream_parser("data: [DONE]\n".to_string()).unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn parser_skips_non_data_lines() {
        let data = ": keep-alive\n\nevent: ping\n".to_string();
        let parsed = openai_stream_parser(data).unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn parser_rejects_malformed_payload() {
        let parsed = openai_stream_parser("data: {not json}\n".to_string());
        assert!(parsed.is_err());
    }
}
