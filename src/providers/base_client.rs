use crate::core::error::DocChatError;
use async_stream::stream;
use futures::stream::{BoxStream, StreamExt};
use reqwest::{Client, Response};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// A parser for one batch of complete SSE lines. Returns the text content
/// carried by those lines, or `None` when they carry no content.
pub type StreamParser = fn(String) -> Result<Option<String>, DocChatError>;

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    endpoint: String,
    auth_header: Option<(String, String)>,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    pub fn new(
        endpoint: String,
        auth_header: Option<(String, String)>,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            auth_header,
            extra_headers: extra_headers.unwrap_or_default(),
        }
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, DocChatError> {
        let url = format!("{}/{}", self.endpoint, path);
        debug!(url = %url, "sending completion request");

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");

        if let Some((name, value)) = &self.auth_header {
            request = request.header(name, value);
        }
        for (key, value) in &self.extra_headers {
            request = request.header(key, value);
        }

        let response = request.json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocChatError::Gateway(format!("HTTP {}: {}", status, body)));
        }

        Ok(response)
    }

    /// Turn a streaming response body into a stream of text fragments.
    ///
    /// SSE events may be split across transport chunks; only complete lines
    /// are handed to the parser, the rest is carried to the next chunk.
    pub async fn stream_response(
        &self,
        response: Response,
        parser: StreamParser,
    ) -> Result<BoxStream<'static, Result<String, DocChatError>>, DocChatError> {
        let mut bytes = response.bytes_stream();

        let s = stream! {
            let mut carry = String::new();
            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(DocChatError::from(e));
                        break;
                    }
                };
                carry.push_str(&String::from_utf8_lossy(&chunk));

                let mut complete = String::new();
                while let Some(pos) = carry.find('\n') {
                    complete.extend(carry.drain(..=pos));
                }
                if complete.is_empty() {
                    continue;
                }

                match parser(complete) {
                    Ok(Some(content)) => yield Ok(content),
                    Ok(None) => continue,
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                }
            }
        };

        Ok(s.boxed())
    }
}
