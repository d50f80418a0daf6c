use thiserror::Error;

use crate::pdf::ExtractedText;

/// The supplied bytes could not be turned into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    #[error("PDF library panicked while reading the document (malformed PDF)")]
    Panicked,
}

/// The backend call could not produce an analysis.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("missing API credential (set GROQ_API_KEY or pass --api-key)")]
    MissingCredential,

    #[error("missing model identifier")]
    MissingModel,

    #[error("invalid sampling temperature {0} (expected 0.0..=2.0)")]
    InvalidTemperature(f32),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("backend returned an empty completion")]
    EmptyResponse,
}

/// Failure of a full document run, tagged with the stage that stopped it.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("text extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("no extractable text found in {page_count} page(s)")]
    NoExtractableText { page_count: usize },

    /// Extraction succeeded; the text is kept so the caller can show partial progress.
    #[error("analysis failed after extracting {} characters: {}", extracted.len(), source)]
    Generation {
        extracted: ExtractedText,
        #[source]
        source: GenerationError,
    },
}

impl PipelineError {
    /// Short stage label used in logs and summaries.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Extraction(_) | PipelineError::NoExtractableText { .. } => "extraction",
            PipelineError::Generation { .. } => "generation",
        }
    }
}
