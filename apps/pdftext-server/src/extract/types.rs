//! Extraction types

use serde::Serialize;
use serde_json::{Map, Value};

/// Version reported when the parser cannot determine one
pub const UNKNOWN_VERSION: &str = "Unknown";

/// Raw output of a [`super::PdfParser`], before normalization
#[derive(Debug, Clone, Default)]
pub struct ParsedPdf {
    pub text: String,
    pub page_count: u32,
    pub info: Option<Map<String, Value>>,
    pub version: Option<String>,
}

/// Normalized extraction output, one per request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub text: String,
    pub page_count: u32,
    pub document_info: Map<String, Value>,
    pub format_version: String,
}

impl From<ParsedPdf> for ExtractionResult {
    fn from(parsed: ParsedPdf) -> Self {
        Self {
            text: parsed.text,
            page_count: parsed.page_count,
            document_info: parsed.info.unwrap_or_default(),
            format_version: parsed
                .version
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
        }
    }
}
