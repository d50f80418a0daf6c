//! Text-generation backends.
//!
//! [`CompletionBackend`] is the seam between the report generator and the
//! network: the generator validates configuration and builds the prompt, a
//! backend turns one request into one completion. [`GroqBackend`] talks to
//! an OpenAI-compatible chat completions endpoint.

use std::future::Future;
use std::pin::Pin;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::BackendConfig;
use crate::error::GenerationError;

/// One fully assembled completion call.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub api_key: &'a str,
    pub temperature: f32,
    pub prompt: &'a str,
}

pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>>;

pub trait CompletionBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Send `request` and return the completion text as received.
    fn complete<'a>(&'a self, request: CompletionRequest<'a>) -> CompletionFuture<'a>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Chat completions client for Groq (or any OpenAI-compatible server).
#[derive(Debug, Clone)]
pub struct GroqBackend {
    client: reqwest::Client,
    base_url: String,
}

impl GroqBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, GenerationError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn send(&self, request: CompletionRequest<'_>) -> Result<String, GenerationError> {
        let body = ChatRequest {
            model: request.model,
            temperature: request.temperature,
            messages: [ChatMessage {
                role: "user",
                content: request.prompt,
            }],
        };

        debug!(
            "POST {} (model={}, prompt={} bytes)",
            self.endpoint(),
            request.model,
            request.prompt.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(request.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_completion(&text)
    }
}

impl CompletionBackend for GroqBackend {
    fn name(&self) -> &str {
        "groq"
    }

    fn complete<'a>(&'a self, request: CompletionRequest<'a>) -> CompletionFuture<'a> {
        Box::pin(self.send(request))
    }
}

/// Pull the first choice's content out of a chat completions body.
fn parse_completion(body: &str) -> Result<String, GenerationError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(GenerationError::EmptyResponse)
}
