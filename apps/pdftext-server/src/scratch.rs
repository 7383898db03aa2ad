//! Scratch directory for staged uploads
//!
//! Uploaded files are written here for the lifetime of a single request.
//! Names are unique per upload (timestamp plus a random UUID component), so
//! concurrent requests never share a file. [`ScratchFile`] guarantees each
//! staged file is removed exactly once.

use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

/// Build a collision-resistant scratch file name.
///
/// Format: `<field>-<unix millis>-<random><ext>`, where `ext` is the original
/// extension including its leading dot (or empty).
pub fn generate_scratch_name(field_name: &str, original_extension: &str) -> String {
    format!(
        "{}-{}-{}{}",
        field_name,
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        original_extension
    )
}

/// Extension of a client filename, with leading dot, or empty.
pub fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

/// Create the scratch directory if needed
pub async fn ensure_scratch_dir(path: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(path).await
}

/// A staged file owned by one request.
///
/// Call [`ScratchFile::remove`] on every exit path. If the guard is dropped
/// first (panic, cancelled future) the file is removed synchronously instead.
#[derive(Debug)]
pub struct ScratchFile {
    path: Option<PathBuf>,
}

impl ScratchFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Path of the staged file, `None` once removed
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Delete the file. Failures are logged and swallowed.
    pub async fn remove(mut self) {
        if let Some(path) = self.path.take() {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => tracing::debug!(path = %path.display(), "Removed scratch file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "Scratch file already gone");
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Failed to remove scratch file: {}", e);
                }
            }
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %path.display(),
                        "Failed to remove scratch file on drop: {}",
                        e
                    );
                }
            } else {
                tracing::debug!(path = %path.display(), "Removed scratch file on drop");
            }
        }
    }
}
