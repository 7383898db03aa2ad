//! Document acquisition
//!
//! Obtains raw PDF bytes for one request, either from a multipart upload
//! staged in the scratch directory or from a remote URL.
//!
//! - `upload`: streams the `pdf` field to disk, enforcing type and size
//! - `remote`: resolves share links and performs the outbound GET

pub mod remote;
pub mod upload;

pub use remote::{build_client, fetch_remote};
pub use upload::{is_pdf_upload, read_staged, stage_upload, StagedUpload};

/// Raw bytes of a PDF, held only for the duration of a request
#[derive(Debug, Clone)]
pub struct AcquiredDocument {
    pub bytes: Vec<u8>,
    pub size_bytes: u64,
    pub source_description: String,
}

impl AcquiredDocument {
    pub fn new(bytes: Vec<u8>, source_description: impl Into<String>) -> Self {
        Self {
            size_bytes: bytes.len() as u64,
            bytes,
            source_description: source_description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_matches_bytes() {
        let doc = AcquiredDocument::new(b"%PDF-1.7 body".to_vec(), "test");
        assert_eq!(doc.size_bytes, doc.bytes.len() as u64);
        assert_eq!(doc.source_description, "test");
    }
}
