//! Extraction adapter
//!
//! Wraps the external PDF parsing capability behind [`PdfParser`] and turns
//! its output into an [`ExtractionResult`]. Parsing is CPU-bound, so it runs
//! on the blocking thread pool. Each request gets exactly one parse attempt;
//! failures are surfaced, never retried.

pub mod mupdf_parser;
pub mod types;

use std::sync::Arc;

use thiserror::Error;

use crate::error::{ExtractError, Result};

pub use mupdf_parser::MuPdfParser;
pub use types::{ExtractionResult, ParsedPdf, UNKNOWN_VERSION};

/// PDF parsing errors
#[derive(Error, Debug)]
pub enum PdfParseError {
    /// Bytes are not a PDF the parser understands
    #[error("{0}")]
    InvalidPdf(String),
    /// Document opened but could not be read
    #[error("{0}")]
    Parser(String),
}

/// External PDF parsing capability
pub trait PdfParser: Send + Sync {
    /// Parse a complete PDF held in memory
    fn parse(&self, bytes: &[u8]) -> std::result::Result<ParsedPdf, PdfParseError>;
}

/// Run the parser once and normalize its output.
pub async fn extract(parser: Arc<dyn PdfParser>, bytes: Vec<u8>) -> Result<ExtractionResult> {
    let size = bytes.len();

    let parsed = tokio::task::spawn_blocking(move || parser.parse(&bytes))
        .await
        .map_err(|e| ExtractError::Internal(format!("Parser task failed: {}", e)))?
        .map_err(|e| ExtractError::ParseFailure(e.to_string()))?;

    tracing::debug!(
        size = size,
        pages = parsed.page_count,
        chars = parsed.text.len(),
        "PDF parsed"
    );

    Ok(parsed.into())
}
