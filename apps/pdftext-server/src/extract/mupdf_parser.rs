//! PDF text extraction using MuPDF
//!
//! MuPDF's fz_context is not thread-safe, so a fresh document is opened for
//! every call. Callers run this on a blocking thread.

use mupdf::{Document, MetadataName};
use serde_json::{Map, Value};

use super::{ParsedPdf, PdfParseError, PdfParser};

const PDF_MIME: &str = "application/pdf";

/// How far into the file the `%PDF-` header may appear
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Separator between the text of consecutive pages
const PAGE_SEPARATOR: &str = "\n\n";

impl From<mupdf::Error> for PdfParseError {
    fn from(e: mupdf::Error) -> Self {
        PdfParseError::Parser(e.to_string())
    }
}

/// Production parser backed by MuPDF
#[derive(Debug, Clone, Copy, Default)]
pub struct MuPdfParser;

impl MuPdfParser {
    pub fn new() -> Self {
        Self
    }

    fn open_document(bytes: &[u8]) -> Result<Document, PdfParseError> {
        if !has_pdf_header(bytes) {
            return Err(PdfParseError::InvalidPdf("Invalid PDF structure".to_string()));
        }
        Document::from_bytes(bytes, PDF_MIME).map_err(|e| PdfParseError::InvalidPdf(e.to_string()))
    }

    fn extract_text(doc: &Document, page_count: i32) -> Result<String, PdfParseError> {
        let mut pages = Vec::with_capacity(page_count.max(0) as usize);
        for index in 0..page_count {
            let page = doc.load_page(index)?;
            pages.push(page.to_text()?);
        }
        Ok(pages.join(PAGE_SEPARATOR))
    }

    /// Build the info dictionary from the metadata MuPDF exposes
    fn extract_info(doc: &Document) -> Map<String, Value> {
        let get_meta = |name: MetadataName| -> Option<String> {
            doc.metadata(name).ok().filter(|s| !s.is_empty())
        };

        let mut info = Map::new();
        let entries = [
            ("Title", MetadataName::Title),
            ("Author", MetadataName::Author),
            ("Subject", MetadataName::Subject),
            ("Keywords", MetadataName::Keywords),
            ("Creator", MetadataName::Creator),
            ("Producer", MetadataName::Producer),
            ("CreationDate", MetadataName::CreationDate),
            ("ModDate", MetadataName::ModDate),
        ];
        for (key, name) in entries {
            if let Some(value) = get_meta(name) {
                info.insert(key.to_string(), Value::String(value));
            }
        }

        if let Some(version) = get_meta(MetadataName::Format).and_then(|f| format_version(&f)) {
            info.insert("PDFFormatVersion".to_string(), Value::String(version));
        }

        let encrypted = get_meta(MetadataName::Encryption)
            .map(|e| !e.eq_ignore_ascii_case("none"))
            .unwrap_or(false);
        info.insert("IsEncrypted".to_string(), Value::Bool(encrypted));

        info
    }
}

impl PdfParser for MuPdfParser {
    fn parse(&self, bytes: &[u8]) -> Result<ParsedPdf, PdfParseError> {
        let doc = Self::open_document(bytes)?;
        let page_count = doc.page_count()?;

        let text = Self::extract_text(&doc, page_count)?;
        let info = Self::extract_info(&doc);
        let version = doc
            .metadata(MetadataName::Format)
            .ok()
            .and_then(|f| format_version(&f));

        Ok(ParsedPdf {
            text,
            page_count: page_count.max(0) as u32,
            info: Some(info),
            version,
        })
    }
}

/// Whether `%PDF-` appears near the start of the data
pub fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(5).any(|w| w == b"%PDF-")
}

/// `"PDF 1.7"` -> `"1.7"`
fn format_version(format: &str) -> Option<String> {
    let version = format.trim().strip_prefix("PDF").unwrap_or(format).trim();
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}
