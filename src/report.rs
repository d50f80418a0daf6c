use std::fmt;

use log::{debug, info};

use crate::backend::{CompletionBackend, CompletionRequest};
use crate::config::BackendConfig;
use crate::error::GenerationError;
use crate::pdf::ExtractedText;
use crate::prompt::{self, PROMPT_VERSION};

/// The exact payload for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    prompt: String,
}

impl AnalysisRequest {
    /// Embed the whole text in the analysis template. Nothing is truncated.
    pub fn new(text: &ExtractedText) -> Self {
        Self {
            prompt: prompt::render(text.as_str()),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn version(&self) -> &'static str {
        PROMPT_VERSION
    }
}

/// The backend's response, untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult(String);

impl AnalysisResult {
    pub fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns extracted report text into an ESG analysis via a [`CompletionBackend`].
pub struct ReportGenerator<B> {
    config: BackendConfig,
    backend: B,
}

impl<B: CompletionBackend> ReportGenerator<B> {
    pub fn new(config: BackendConfig, backend: B) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run one analysis.
    ///
    /// Empty text is still sent. Configuration problems are reported before
    /// the backend is touched; backend failures are returned as-is, without
    /// retrying.
    pub async fn generate(&self, text: &ExtractedText) -> Result<AnalysisResult, GenerationError> {
        let api_key = self.config.validate()?;
        let request = AnalysisRequest::new(text);

        info!(
            "Requesting analysis from {} (model={}, prompt {}, {} bytes of report text)",
            self.backend.name(),
            self.config.model,
            request.version(),
            text.len()
        );

        let completion = self
            .backend
            .complete(CompletionRequest {
                model: &self.config.model,
                api_key,
                temperature: self.config.temperature,
                prompt: request.prompt(),
            })
            .await?;

        debug!("Received {} bytes of analysis", completion.len());
        Ok(AnalysisResult::new(completion))
    }
}
