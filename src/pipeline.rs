use log::{info, warn};

use crate::backend::CompletionBackend;
use crate::error::PipelineError;
use crate::pdf::{ExtractedText, TextExtractor};
use crate::report::{AnalysisResult, ReportGenerator};

/// Output of a successful run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub text: ExtractedText,
    pub result: AnalysisResult,
}

/// Extraction followed by generation for one document at a time.
pub struct Pipeline<B> {
    extractor: TextExtractor,
    generator: ReportGenerator<B>,
    allow_empty_text: bool,
}

impl<B: CompletionBackend> Pipeline<B> {
    pub fn new(generator: ReportGenerator<B>) -> Self {
        Self {
            extractor: TextExtractor::new(),
            generator,
            allow_empty_text: false,
        }
    }

    /// Send documents with no extractable text to the backend anyway.
    pub fn allow_empty_text(mut self, allow: bool) -> Self {
        self.allow_empty_text = allow;
        self
    }

    pub fn generator(&self) -> &ReportGenerator<B> {
        &self.generator
    }

    pub fn extract(&self, document: &[u8]) -> Result<ExtractedText, PipelineError> {
        let text = self.extractor.extract(document)?;
        info!(
            "Extracted {} characters from {} page(s)",
            text.as_str().chars().count(),
            text.page_count()
        );
        Ok(text)
    }

    pub async fn analyze(&self, document: &[u8]) -> Result<Analysis, PipelineError> {
        let text = self.extract(document)?;

        if text.is_blank() {
            if !self.allow_empty_text {
                return Err(PipelineError::NoExtractableText {
                    page_count: text.page_count(),
                });
            }
            warn!("No extractable text; requesting analysis of an empty report");
        }

        match self.generator.generate(&text).await {
            Ok(result) => Ok(Analysis { text, result }),
            Err(source) => Err(PipelineError::Generation {
                extracted: text,
                source,
            }),
        }
    }
}
