//! Upload acquisition
//!
//! Reads the multipart body field by field. The PDF field is checked for type
//! before anything is written, then streamed chunk by chunk into a scratch
//! file so an oversized upload is rejected as soon as it crosses the limit
//! rather than after buffering it.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use tokio::io::AsyncWriteExt;

use crate::config::UploadConfig;
use crate::error::{ExtractError, Result};
use crate::scratch::{ensure_scratch_dir, extension_of, generate_scratch_name, ScratchFile};
use crate::source::PdfSource;

use super::AcquiredDocument;

const PDF_MIME: &str = "application/pdf";

/// An upload written to the scratch directory
#[derive(Debug)]
pub struct StagedUpload {
    pub file: ScratchFile,
    pub original_filename: String,
    pub size: u64,
}

impl StagedUpload {
    /// Source record for this upload
    pub fn source(&self) -> PdfSource {
        PdfSource::Uploaded {
            temporary_path: self.file.path().map(|p| p.to_path_buf()).unwrap_or_default(),
            original_filename: self.original_filename.clone(),
            declared_size: self.size,
        }
    }
}

/// Accept `application/pdf` content or a `.pdf` filename.
pub fn is_pdf_upload(content_type: Option<&str>, filename: &str) -> bool {
    let mime_matches = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().eq_ignore_ascii_case(PDF_MIME))
        .unwrap_or(false);

    mime_matches || extension_of(filename).eq_ignore_ascii_case(".pdf")
}

fn size_limit_message(max: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if max % MIB == 0 {
        format!("PDF file size must be less than {}MB", max / MIB)
    } else {
        format!("PDF file size must be less than {} bytes", max)
    }
}

fn multipart_error(e: MultipartError, config: &UploadConfig) -> ExtractError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ExtractError::PayloadTooLarge(size_limit_message(config.max_file_size))
    } else {
        ExtractError::MissingInput(format!("Invalid multipart upload: {}", e.body_text()))
    }
}

/// Stage the PDF field of a multipart body into the scratch directory.
///
/// Other fields, and a PDF-named field without a filename, are skipped;
/// reading stops once a file is staged.
pub async fn stage_upload(multipart: &mut Multipart, config: &UploadConfig) -> Result<StagedUpload> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, config))?
    {
        if field.name() != Some(config.field_name.as_str()) {
            tracing::debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }

        let Some(original_filename) = field.file_name().map(|s| s.to_string()) else {
            tracing::debug!(field = ?field.name(), "Skipping non-file field");
            continue;
        };
        let content_type = field.content_type().map(|s| s.to_string());

        tracing::debug!(
            filename = %original_filename,
            content_type = ?content_type,
            "Received upload field"
        );

        if !is_pdf_upload(content_type.as_deref(), &original_filename) {
            return Err(ExtractError::InvalidType(
                "Only PDF files are allowed".to_string(),
            ));
        }

        ensure_scratch_dir(&config.scratch_dir).await?;
        let path = config.scratch_dir.join(generate_scratch_name(
            &config.field_name,
            &extension_of(&original_filename),
        ));

        // Declared before the handle so the handle closes first on early return.
        let scratch = ScratchFile::new(path.clone());
        let mut out = tokio::fs::File::create(&path).await?;
        let mut size: u64 = 0;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, config))?
        {
            size += chunk.len() as u64;
            if size > config.max_file_size {
                drop(out);
                scratch.remove().await;
                tracing::warn!(
                    filename = %original_filename,
                    limit = config.max_file_size,
                    "Upload exceeded size limit"
                );
                return Err(ExtractError::PayloadTooLarge(size_limit_message(
                    config.max_file_size,
                )));
            }
            out.write_all(&chunk).await?;
        }
        out.flush().await?;
        drop(out);

        tracing::info!(
            filename = %original_filename,
            size = size,
            path = %path.display(),
            "Upload staged"
        );

        return Ok(StagedUpload {
            file: scratch,
            original_filename,
            size,
        });
    }

    Err(ExtractError::MissingInput("No PDF file uploaded".to_string()))
}

/// Read a staged upload fully into memory
pub async fn read_staged(staged: &StagedUpload) -> Result<AcquiredDocument> {
    let path = staged
        .file
        .path()
        .ok_or_else(|| ExtractError::Internal("Staged upload was already removed".to_string()))?;

    let bytes = tokio::fs::read(path).await?;
    Ok(AcquiredDocument::new(
        bytes,
        format!("upload '{}'", staged.original_filename),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_pdf_upload() {
        assert!(is_pdf_upload(Some("application/pdf"), "scan.bin"));
        assert!(is_pdf_upload(Some("Application/PDF; charset=binary"), ""));
        assert!(is_pdf_upload(Some("application/octet-stream"), "Report.PDF"));
        assert!(is_pdf_upload(None, "paper.pdf"));
        assert!(!is_pdf_upload(Some("text/plain"), "notes.txt"));
        assert!(!is_pdf_upload(None, "pdf"));
        assert!(!is_pdf_upload(Some("image/png"), "image.pdf.png"));
    }

    #[test]
    fn test_size_limit_message() {
        assert_eq!(
            size_limit_message(10 * 1024 * 1024),
            "PDF file size must be less than 10MB"
        );
        assert_eq!(size_limit_message(1000), "PDF file size must be less than 1000 bytes");
    }

    #[tokio::test]
    async fn test_read_staged() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pdf-1-abc.pdf");
        tokio::fs::write(&path, b"%PDF-1.4 hello").await.unwrap();

        let staged = StagedUpload {
            file: ScratchFile::new(path.clone()),
            original_filename: "hello.pdf".to_string(),
            size: 14,
        };

        let doc = read_staged(&staged).await.unwrap();
        assert_eq!(doc.bytes, b"%PDF-1.4 hello");
        assert_eq!(doc.size_bytes, 14);
        assert_eq!(doc.source_description, "upload 'hello.pdf'");

        staged.file.remove().await;
        assert!(!path.exists());
    }
}
