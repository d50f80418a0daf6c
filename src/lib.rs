//! ESG evaluation of green finance project reports.
//!
//! A PDF report goes through two steps: [`pdf::TextExtractor`] pulls the
//! page text out, and [`report::ReportGenerator`] embeds it in a fixed
//! seven-section analysis prompt and returns whatever the language model
//! answers. [`pipeline::Pipeline`] runs both for one document;
//! [`analyzer::ReportAnalyzer`] runs the pipeline over files on disk.

pub mod analyzer;
pub mod backend;
pub mod config;
pub mod error;
pub mod mock;
pub mod pdf;
pub mod pipeline;
pub mod progress;
pub mod prompt;
pub mod report;
pub mod sections;

pub use backend::{CompletionBackend, CompletionRequest, GroqBackend};
pub use config::BackendConfig;
pub use error::{ExtractionError, GenerationError, PipelineError};
pub use pdf::{ExtractedText, TextExtractor};
pub use pipeline::{Analysis, Pipeline};
pub use report::{AnalysisRequest, AnalysisResult, ReportGenerator};
