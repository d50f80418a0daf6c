//! Structural check of a generated report.
//!
//! Runs on top of an [`AnalysisResult`] after generation. It only looks for
//! the seven headers; it never rewrites the result or checks the numbers.

use crate::report::AnalysisResult;

pub const SECTION_HEADERS: [&str; 7] = [
    "Project Information",
    "ESG Scores",
    "Overall ESG Score",
    "Risk Assessment",
    "Optimization Recommendations",
    "Conclusion",
    "Final Suggestion",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionCheck {
    /// Headers not found anywhere in the result.
    pub missing: Vec<&'static str>,
    /// Whether every header that is present follows the previous one.
    pub in_order: bool,
}

impl SectionCheck {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.in_order
    }
}

pub fn check(result: &AnalysisResult) -> SectionCheck {
    let haystack = result.as_str().to_lowercase();
    let mut missing = Vec::new();
    let mut in_order = true;
    let mut cursor = 0;

    for header in SECTION_HEADERS {
        let needle = header.to_lowercase();
        match haystack[cursor..].find(&needle) {
            Some(pos) => cursor += pos + needle.len(),
            None if haystack.contains(&needle) => in_order = false,
            None => missing.push(header),
        }
    }

    SectionCheck { missing, in_order }
}

/// Byte range of `header`'s section: from the header to the next known header.
pub fn section_span(result: &AnalysisResult, header: &str) -> Option<std::ops::Range<usize>> {
    let text = result.as_str();
    let start = find_ascii_ci(text, header, 0)?;
    let after = start + header.len();
    let end = SECTION_HEADERS
        .iter()
        .filter_map(|h| find_ascii_ci(text, h, after))
        .min()
        .unwrap_or(text.len());
    Some(start..end)
}

// Case-insensitive search that returns offsets into the original string.
fn find_ascii_ci(text: &str, needle: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || from > bytes.len() || bytes.len() - from < needle.len() {
        return None;
    }
    (from..=bytes.len() - needle.len()).find(|&i| bytes[i..i + needle.len()].eq_ignore_ascii_case(needle))
}
