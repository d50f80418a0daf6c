use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Instant;
use log::{error, info, warn};
use walkdir::WalkDir;

use crate::backend::CompletionBackend;
use crate::error::PipelineError;
use crate::pdf::ExtractedText;
use crate::pipeline::Pipeline;
use crate::progress::ProgressTracker;
use crate::report::AnalysisResult;

/// Upload limit applied before a file is read.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 200 * 1024 * 1024;

/// How far a file got through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Not read: unreadable or over the size limit.
    Rejected,
    /// Read, but no usable text came out.
    Extraction,
    /// Text extracted, analysis failed.
    Generation,
    /// Everything asked for succeeded (extraction alone in extract-only runs).
    Complete,
}

#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub file_path: PathBuf,
    pub file_size: u64,
    pub page_count: usize,
    pub extracted_chars: usize,
    pub processing_time_seconds: f64,
    pub stage: Stage,
    pub text: Option<ExtractedText>,
    pub result: Option<AnalysisResult>,
    pub error_message: Option<String>,
}

impl FileOutcome {
    pub fn success(&self) -> bool {
        self.stage == Stage::Complete
    }

    fn failed(file_path: &Path, file_size: u64, stage: Stage, started: Instant, message: String) -> Self {
        Self {
            file_path: file_path.to_path_buf(),
            file_size,
            page_count: 0,
            extracted_chars: 0,
            processing_time_seconds: started.elapsed().as_secs_f64(),
            stage,
            text: None,
            result: None,
            error_message: Some(message),
        }
    }

    fn extracted(
        file_path: &Path,
        file_size: u64,
        stage: Stage,
        started: Instant,
        text: ExtractedText,
    ) -> Self {
        Self {
            file_path: file_path.to_path_buf(),
            file_size,
            page_count: text.page_count(),
            extracted_chars: text.as_str().chars().count(),
            processing_time_seconds: started.elapsed().as_secs_f64(),
            stage,
            text: Some(text),
            result: None,
            error_message: None,
        }
    }
}

pub struct ReportAnalyzer<B> {
    pipeline: Pipeline<B>,
    max_file_size: u64,
    show_progress: bool,
}

impl<B: CompletionBackend> ReportAnalyzer<B> {
    pub fn new(pipeline: Pipeline<B>) -> Self {
        Self {
            pipeline,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            show_progress: true,
        }
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn pipeline(&self) -> &Pipeline<B> {
        &self.pipeline
    }

    /// Find all PDF files in directory tree
    pub fn find_pdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut pdf_files = Vec::new();

        for entry in WalkDir::new(dir) {
            let entry = entry?;
            let path = entry.path();

            if path.is_file()
                && path
                    .extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
            {
                pdf_files.push(path.to_path_buf());
            }
        }

        pdf_files.sort();
        Ok(pdf_files)
    }

    /// Analyze files one after another
    pub async fn analyze_files(&self, pdf_files: &[PathBuf]) -> Vec<FileOutcome> {
        let progress = self
            .show_progress
            .then(|| ProgressTracker::new(pdf_files.len()));

        let mut results = Vec::with_capacity(pdf_files.len());
        for (index, pdf_path) in pdf_files.iter().enumerate() {
            if let Some(progress) = &progress {
                progress.start(pdf_path);
            }
            let outcome = self.analyze_file(pdf_path, index + 1).await;
            if let Some(progress) = &progress {
                progress.increment();
            }
            results.push(outcome);
        }

        if let Some(progress) = &progress {
            progress.finish();
        }
        results
    }

    /// Stat the file, apply the size limit, then read it.
    async fn read_document(&self, pdf_path: &Path, start_time: Instant) -> std::result::Result<(Vec<u8>, u64), FileOutcome> {
        let display_path = pdf_path.display();

        let file_size = match tokio::fs::metadata(pdf_path).await {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                error!("Cannot stat {}: {}", display_path, e);
                return Err(FileOutcome::failed(pdf_path, 0, Stage::Rejected, start_time, e.to_string()));
            }
        };

        if file_size > self.max_file_size {
            let message = format!(
                "file is {} bytes, above the {} byte limit",
                file_size, self.max_file_size
            );
            warn!("Skipping {}: {}", display_path, message);
            return Err(FileOutcome::failed(pdf_path, file_size, Stage::Rejected, start_time, message));
        }

        match tokio::fs::read(pdf_path).await {
            Ok(bytes) => Ok((bytes, file_size)),
            Err(e) => {
                error!("Cannot read {}: {}", display_path, e);
                Err(FileOutcome::failed(pdf_path, file_size, Stage::Rejected, start_time, e.to_string()))
            }
        }
    }

    /// Extract the text of a single PDF file without analyzing it.
    pub async fn extract_file(&self, pdf_path: &Path) -> FileOutcome {
        let start_time = Instant::now();
        let (document, file_size) = match self.read_document(pdf_path, start_time).await {
            Ok(read) => read,
            Err(outcome) => return outcome,
        };

        match self.pipeline.extract(&document) {
            Ok(text) => FileOutcome::extracted(pdf_path, file_size, Stage::Complete, start_time, text),
            Err(e) => {
                error!("Extraction failed for {}: {}", pdf_path.display(), e);
                FileOutcome::failed(pdf_path, file_size, Stage::Extraction, start_time, e.to_string())
            }
        }
    }

    /// Analyze a single PDF file. Failures are reported in the outcome.
    pub async fn analyze_file(&self, pdf_path: &Path, file_index: usize) -> FileOutcome {
        let start_time = Instant::now();
        let display_path = pdf_path.display().to_string();

        info!("Processing ({}): {}", file_index, display_path);

        let (document, file_size) = match self.read_document(pdf_path, start_time).await {
            Ok(read) => read,
            Err(outcome) => return outcome,
        };

        match self.pipeline.analyze(&document).await {
            Ok(analysis) => {
                info!("Analyzed {}", display_path);
                let mut outcome =
                    FileOutcome::extracted(pdf_path, file_size, Stage::Complete, start_time, analysis.text);
                outcome.result = Some(analysis.result);
                outcome
            }
            Err(PipelineError::Generation { extracted, source }) => {
                error!(
                    "Analysis failed for {} after extracting text: {}",
                    display_path, source
                );
                let mut outcome =
                    FileOutcome::extracted(pdf_path, file_size, Stage::Generation, start_time, extracted);
                outcome.error_message = Some(source.to_string());
                outcome
            }
            Err(e) => {
                error!("Extraction failed for {}: {}", display_path, e);
                let mut outcome =
                    FileOutcome::failed(pdf_path, file_size, Stage::Extraction, start_time, e.to_string());
                if let PipelineError::NoExtractableText { page_count } = e {
                    outcome.page_count = page_count;
                }
                outcome
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use crate::mock::{MockBackend, MockResponse};
    use crate::pdf::fixtures::pdf_with_pages;
    use crate::report::ReportGenerator;

    fn analyzer(backend: MockBackend) -> ReportAnalyzer<MockBackend> {
        let generator = ReportGenerator::new(BackendConfig::new("gsk_test"), backend);
        ReportAnalyzer::new(Pipeline::new(generator)).with_progress(false)
    }

    #[test]
    fn finds_pdfs_recursively_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("b.pdf"), b"").unwrap();
        std::fs::write(dir.path().join("a.PDF"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();
        std::fs::write(dir.path().join("nested/c.pdf"), b"").unwrap();

        let found = ReportAnalyzer::<MockBackend>::find_pdf_files(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.PDF"),
                PathBuf::from("b.pdf"),
                PathBuf::from("nested/c.pdf"),
            ]
        );
    }

    #[tokio::test]
    async fn oversize_file_is_rejected_unread() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.pdf");
        std::fs::write(&path, pdf_with_pages(&["Solar Farm Alpha"])).unwrap();

        let a = analyzer(MockBackend::seven_sections()).with_max_file_size(10);
        let outcome = a.analyze_file(&path, 1).await;
        assert_eq!(outcome.stage, Stage::Rejected);
        assert!(outcome.error_message.unwrap().contains("byte limit"));
        assert_eq!(a.pipeline().generator().backend().call_count(), 0);
    }

    #[tokio::test]
    async fn extract_only_applies_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.pdf");
        std::fs::write(&path, pdf_with_pages(&["Solar Farm Alpha"])).unwrap();

        let a = analyzer(MockBackend::seven_sections()).with_max_file_size(10);
        let outcome = a.extract_file(&path).await;
        assert_eq!(outcome.stage, Stage::Rejected);
        assert!(outcome.text.is_none());
        assert!(outcome.error_message.unwrap().contains("byte limit"));
    }

    #[tokio::test]
    async fn extract_only_reports_each_file() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.pdf");
        let good = dir.path().join("good.pdf");
        std::fs::write(&bad, b"garbage").unwrap();
        std::fs::write(&good, pdf_with_pages(&["Wind Park Beta", "Budget: $5M"])).unwrap();

        let a = analyzer(MockBackend::seven_sections());
        let bad_outcome = a.extract_file(&bad).await;
        assert_eq!(bad_outcome.stage, Stage::Extraction);
        assert!(bad_outcome.error_message.unwrap().contains("failed to parse PDF"));

        let good_outcome = a.extract_file(&good).await;
        assert!(good_outcome.success());
        assert_eq!(good_outcome.page_count, 2);
        assert!(good_outcome.text.unwrap().as_str().contains("Wind Park Beta"));
        assert_eq!(a.pipeline().generator().backend().call_count(), 0);
    }

    #[tokio::test]
    async fn batch_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.pdf");
        let bad = dir.path().join("bad.pdf");
        let missing = dir.path().join("missing.pdf");
        std::fs::write(&good, pdf_with_pages(&["Solar Farm Alpha"])).unwrap();
        std::fs::write(&bad, b"garbage").unwrap();

        let a = analyzer(MockBackend::seven_sections());
        let outcomes = a.analyze_files(&[bad, missing, good]).await;

        let stages: Vec<_> = outcomes.iter().map(|o| o.stage).collect();
        assert_eq!(stages, vec![Stage::Extraction, Stage::Rejected, Stage::Complete]);
        assert!(outcomes[2].success());
        assert_eq!(outcomes[2].page_count, 1);
        assert!(outcomes[2]
            .result
            .as_ref()
            .unwrap()
            .as_str()
            .contains("Solar Farm Alpha"));
        assert_eq!(a.pipeline().generator().backend().call_count(), 1);
    }

    #[tokio::test]
    async fn generation_failure_is_partial_progress() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, pdf_with_pages(&["Solar Farm Alpha"])).unwrap();

        let a = analyzer(MockBackend::new(MockResponse::Status {
            status: 500,
            body: "internal error".into(),
        }));
        let outcome = a.analyze_file(&path, 1).await;
        assert_eq!(outcome.stage, Stage::Generation);
        assert_eq!(outcome.page_count, 1);
        assert!(outcome.extracted_chars > 0);
        assert_eq!(
            outcome.error_message.as_deref(),
            Some("backend returned 500: internal error")
        );
    }
}
