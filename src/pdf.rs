use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use log::{debug, info, warn};

use crate::error::ExtractionError;

/// Text of a whole document, pages concatenated in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    text: String,
    page_count: usize,
}

impl ExtractedText {
    pub fn new(text: impl Into<String>, page_count: usize) -> Self {
        Self {
            text: text.into(),
            page_count,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True when only whitespace was recovered.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl fmt::Display for ExtractedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the text of every page, in order.
    ///
    /// Unreadable pages contribute nothing. Only a document that cannot be
    /// opened at all is an error; an empty result is not.
    pub fn extract(&self, document: &[u8]) -> Result<ExtractedText, ExtractionError> {
        guarded(|| self.extract_with_fallback(document, pdf_extract_text))
    }

    fn extract_with_fallback(
        &self,
        document: &[u8],
        fallback: impl FnOnce(&[u8]) -> Result<String, String>,
    ) -> Result<ExtractedText, ExtractionError> {
        let document_pdf = lopdf::Document::load_mem(document)
            .map_err(|e| ExtractionError::Parse(e.to_string()))?;

        let pages = document_pdf.get_pages();
        let page_count = pages.len();
        let mut text = String::new();

        // BTreeMap keys iterate in page order
        for page_num in pages.keys() {
            match document_pdf.extract_text(&[*page_num]) {
                Ok(page_text) => {
                    if page_text.is_empty() {
                        debug!("Page {} has no text", page_num);
                        continue;
                    }
                    text.push_str(&page_text);
                    if !page_text.ends_with('\n') {
                        text.push('\n');
                    }
                }
                Err(e) => {
                    warn!("Failed to extract text from page {}: {}", page_num, e);
                }
            }
        }

        // Try pdf-extract as fallback if lopdf found nothing
        if text.trim().is_empty() && page_count > 0 {
            match fallback(document) {
                Ok(extracted) if extracted.trim().len() > text.trim().len() => {
                    info!("Using pdf-extract fallback ({} pages)", page_count);
                    return Ok(ExtractedText::new(extracted, page_count));
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("pdf-extract fallback failed: {}", e);
                }
            }
        }

        Ok(ExtractedText::new(text, page_count))
    }
}

fn pdf_extract_text(document: &[u8]) -> Result<String, String> {
    match catch_quietly(|| pdf_extract::extract_text_from_mem(document)) {
        Some(Ok(text)) => Ok(text),
        Some(Err(e)) => Err(e.to_string()),
        None => Err("pdf-extract panicked".to_string()),
    }
}

thread_local! {
    static QUIET_PANICS: Cell<bool> = const { Cell::new(false) };
}

static PANIC_HOOK: Once = Once::new();

// Panics inside catch_quietly go to the debug log; all others reach the previous hook
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if QUIET_PANICS.with(Cell::get) {
                debug!("PDF library panicked: {}", info);
            } else {
                previous(info);
            }
        }));
    });
}

/// Run `f`, returning `None` if it panics. The panic message is logged, not printed.
fn catch_quietly<T>(f: impl FnOnce() -> T) -> Option<T> {
    install_panic_hook();
    let was_quiet = QUIET_PANICS.with(|q| q.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    QUIET_PANICS.with(|q| q.set(was_quiet));
    result.ok()
}

// lopdf and pdf-extract both panic on some malformed inputs
fn guarded<T>(f: impl FnOnce() -> Result<T, ExtractionError>) -> Result<T, ExtractionError> {
    catch_quietly(f).unwrap_or(Err(ExtractionError::Panicked))
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Build an in-memory PDF with one page per entry; empty entries give blank pages.
    pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page_text in pages {
            let operations = if page_text.is_empty() {
                Vec::new()
            } else {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*page_text)]),
                    Operation::new("ET", vec![]),
                ]
            };
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode content"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("save fixture pdf");
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::pdf_with_pages;
    use super::*;

    #[test]
    fn extracts_single_page() {
        let pdf = pdf_with_pages(&["Solar Farm Alpha"]);
        let text = TextExtractor::new().extract(&pdf).unwrap();
        assert_eq!(text.page_count(), 1);
        assert!(text.as_str().contains("Solar Farm Alpha"));
    }

    #[test]
    fn keeps_page_order() {
        let pdf = pdf_with_pages(&["First page", "Second page", "Third page"]);
        let text = TextExtractor::new().extract(&pdf).unwrap();
        assert_eq!(text.page_count(), 3);

        let s = text.as_str();
        let first = s.find("First page").unwrap();
        let second = s.find("Second page").unwrap();
        let third = s.find("Third page").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn blank_pages_give_empty_text() {
        let pdf = pdf_with_pages(&["", ""]);
        let text = TextExtractor::new().extract(&pdf).unwrap();
        assert_eq!(text.page_count(), 2);
        assert!(text.is_blank());
    }

    #[test]
    fn same_bytes_same_text() {
        let pdf = pdf_with_pages(&["Wind", "Hydro"]);
        let extractor = TextExtractor::new();
        assert_eq!(extractor.extract(&pdf).unwrap(), extractor.extract(&pdf).unwrap());
    }

    #[test]
    fn garbage_is_an_error() {
        let extractor = TextExtractor::new();
        let inputs: [&[u8]; 3] = [b"", b"not a pdf at all", &[0xff, 0x00, 0x13, 0x37]];
        for bytes in inputs {
            assert!(extractor.extract(bytes).is_err());
        }
    }

    #[test]
    fn fallback_text_is_used_when_lopdf_finds_none() {
        let pdf = pdf_with_pages(&["", ""]);
        let text = TextExtractor::new()
            .extract_with_fallback(&pdf, |_| Ok("Recovered by pdf-extract\n".to_string()))
            .unwrap();
        assert_eq!(text.as_str(), "Recovered by pdf-extract\n");
        assert_eq!(text.page_count(), 2);
    }

    #[test]
    fn fallback_is_ignored_when_blank_or_failing() {
        let pdf = pdf_with_pages(&[""]);
        let extractor = TextExtractor::new();

        let text = extractor
            .extract_with_fallback(&pdf, |_| Ok(" \n\n ".to_string()))
            .unwrap();
        assert_eq!(text.as_str(), "");

        let text = extractor
            .extract_with_fallback(&pdf, |_| Err("no fonts".to_string()))
            .unwrap();
        assert_eq!(text.as_str(), "");
        assert_eq!(text.page_count(), 1);
    }

    #[test]
    fn fallback_not_consulted_when_lopdf_has_text() {
        let pdf = pdf_with_pages(&["Solar Farm Alpha"]);
        let text = TextExtractor::new()
            .extract_with_fallback(&pdf, |_| panic!("fallback should not run"))
            .unwrap();
        assert!(text.as_str().contains("Solar Farm Alpha"));
    }

    #[test]
    fn library_panic_becomes_error() {
        let result: Result<ExtractedText, _> = guarded(|| panic!("broken xref"));
        assert!(matches!(result, Err(ExtractionError::Panicked)));

        let result = guarded(|| Ok(ExtractedText::new("ok", 1)));
        assert_eq!(result.unwrap().as_str(), "ok");
    }

    #[test]
    fn quiet_mode_is_restored_after_panic() {
        assert_eq!(catch_quietly(|| -> u8 { panic!("boom") }), None);
        assert!(!QUIET_PANICS.with(Cell::get));

        // Nested calls keep the outer scope quiet
        let outer = catch_quietly(|| {
            let inner = catch_quietly(|| 1);
            (inner, QUIET_PANICS.with(Cell::get))
        });
        assert_eq!(outer, Some((Some(1), true)));
    }

    #[test]
    fn error_has_readable_cause() {
        let err = TextExtractor::new().extract(b"hello").unwrap_err();
        assert!(err.to_string().starts_with("failed to parse PDF"));
    }
}
