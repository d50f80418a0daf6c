//! Mock generation backend for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::backend::{CompletionBackend, CompletionFuture, CompletionRequest};
use crate::error::GenerationError;
use crate::sections::SECTION_HEADERS;

/// What [`MockBackend`] answers with.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this text.
    Text(String),
    /// Return a seven-section report whose Project Information section
    /// quotes the report text found in the prompt.
    SevenSections,
    /// Simulate a non-success HTTP status.
    Status { status: u16, body: String },
    /// Simulate an empty completion.
    Empty,
}

/// A captured call.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRequest {
    pub model: String,
    pub api_key: String,
    pub temperature: f32,
    pub prompt: String,
}

/// A hand-rolled [`CompletionBackend`] that counts and records its calls.
pub struct MockBackend {
    response: MockResponse,
    call_count: AtomicUsize,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockBackend {
    pub fn new(response: MockResponse) -> Self {
        Self {
            response,
            call_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn seven_sections() -> Self {
        Self::new(MockResponse::SevenSections)
    }

    /// How many times `complete()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl CompletionBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn complete<'a>(&'a self, request: CompletionRequest<'a>) -> CompletionFuture<'a> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                model: request.model.to_string(),
                api_key: request.api_key.to_string(),
                temperature: request.temperature,
                prompt: request.prompt.to_string(),
            });
        }
        let response = self.response.clone();

        Box::pin(async move {
            match response {
                MockResponse::Text(text) => Ok(text),
                MockResponse::SevenSections => Ok(seven_section_report(report_excerpt(request.prompt))),
                MockResponse::Status { status, body } => Err(GenerationError::Api { status, body }),
                MockResponse::Empty => Err(GenerationError::EmptyResponse),
            }
        })
    }
}

/// A well-formed report with every mandated header, in order.
pub fn seven_section_report(project_details: &str) -> String {
    let mut report = String::new();
    for (i, header) in SECTION_HEADERS.iter().enumerate() {
        report.push_str(&format!("## {}. {}\n\n", i + 1, header));
        if i == 0 {
            report.push_str("| Field | Value |\n|---|---|\n");
            report.push_str(&format!("| Source | {} |\n", project_details.trim()));
        } else {
            report.push_str("Placeholder analysis.\n");
        }
        report.push('\n');
    }
    report
}

// The report text sits between these two template lines
fn report_excerpt(prompt: &str) -> &str {
    let start = prompt
        .find("The Content of the report:\n")
        .map(|i| i + "The Content of the report:\n".len())
        .unwrap_or(0);
    let end = prompt[start..]
        .find("\n\nThe output structure should be like:")
        .map(|i| start + i)
        .unwrap_or(prompt.len());
    &prompt[start..end]
}
