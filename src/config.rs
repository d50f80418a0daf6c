use std::fmt;
use std::time::Duration;

use crate::error::GenerationError;

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// Sampling temperature used for every analysis.
pub const TEMPERATURE: f32 = 0.7;

pub const API_KEY_ENV: &str = "GROQ_API_KEY";
pub const MODEL_ENV: &str = "GROQ_MODEL";
pub const BASE_URL_ENV: &str = "GROQ_BASE_URL";

/// Everything the generator needs to reach its backend.
///
/// Built once and handed to [`ReportGenerator`](crate::report::ReportGenerator);
/// nothing here is re-read from the environment afterwards.
#[derive(Clone)]
pub struct BackendConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub base_url: String,
    /// Whole-request timeout for the HTTP client. `None` leaves it unbounded.
    pub timeout: Option<Duration>,
}

impl BackendConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Read `GROQ_API_KEY`, `GROQ_MODEL` and `GROQ_BASE_URL`.
    ///
    /// A missing key is not an error here; [`validate`](Self::validate)
    /// reports it before anything is sent.
    pub fn from_env() -> Self {
        let mut config = Self {
            api_key: non_empty_var(API_KEY_ENV),
            ..Self::default()
        };
        if let Some(model) = non_empty_var(MODEL_ENV) {
            config.model = model;
        }
        if let Some(base_url) = non_empty_var(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        config
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Check the config is usable, returning the credential.
    pub fn validate(&self) -> Result<&str, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(GenerationError::MissingCredential)?;

        if self.model.trim().is_empty() {
            return Err(GenerationError::MissingModel);
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(GenerationError::InvalidTemperature(self.temperature));
        }

        Ok(api_key)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            temperature: TEMPERATURE,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

// Keep the credential out of logs
impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
