//! Chat-completions HTTP client
//!
//! Thin blocking-style client for the server's OpenAI-compatible
//! `/v1/chat/completions` endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Message, ModelPreset};

/// Errors from a chat request
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request timed out - the model might be overloaded")]
    Timeout,
    #[error("server error ({status}): {body}")]
    Http { status: u16, body: String },
    #[error("no response generated")]
    EmptyResponse,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Client bound to one running server
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Client for a server on localhost at the given port.
    pub fn for_port(port: u16) -> Result<Self, ClientError> {
        Self::new(format!("http://127.0.0.1:{port}"))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send the full history and return the assistant's reply text.
    pub async fn chat_completion(
        &self,
        messages: &[Message],
        preset: &ModelPreset,
    ) -> Result<String, ClientError> {
        let request = ChatRequest {
            model: "default",
            messages,
            max_tokens: preset.max_tokens,
            temperature: preset.temperature,
            top_p: preset.top_p,
            stream: false,
        };

        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .timeout(Duration::from_secs(preset.request_timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout
                } else {
                    ClientError::Request(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(ClientError::EmptyResponse)
    }
}
