//! Result assembly
//!
//! Builds the success envelope from an extraction result plus the
//! request's origin (upload or remote URL).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::extract::ExtractionResult;

/// Where the extracted document came from, as reported to the client
#[derive(Debug, Clone)]
pub enum ResponseOrigin {
    Upload { filename: String, file_size: u64 },
    /// `url` is the client's original string, before share-link resolution
    Remote { filename: String, url: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub pages: u32,
    pub info: Map<String, Value>,
    pub version: String,
}

/// Success response for both extraction endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResponse {
    pub success: bool,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub text: String,
    pub metadata: ResponseMetadata,
    pub extracted_at: DateTime<Utc>,
    pub text_length: usize,
    pub word_count: usize,
}

/// Count whitespace-delimited, non-empty tokens
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Length of the text in characters
pub fn text_length(text: &str) -> usize {
    text.chars().count()
}

/// Build the response. The timestamp is taken here, at assembly time.
pub fn assemble(origin: ResponseOrigin, extraction: ExtractionResult) -> ExtractionResponse {
    let (filename, file_size, url) = match origin {
        ResponseOrigin::Upload { filename, file_size } => (filename, Some(file_size), None),
        ResponseOrigin::Remote { filename, url } => (filename, None, Some(url)),
    };

    ExtractionResponse {
        success: true,
        filename,
        file_size,
        url,
        text_length: text_length(&extraction.text),
        word_count: word_count(&extraction.text),
        text: extraction.text,
        metadata: ResponseMetadata {
            pages: extraction.page_count,
            info: extraction.document_info,
            version: extraction.format_version,
        },
        extracted_at: Utc::now(),
    }
}
