//! PDF source resolution
//!
//! Turns a client-supplied reference into the form the rest of the pipeline
//! works with. Share links from known document hosts are rewritten to their
//! direct-download URLs; nothing here touches the network.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use crate::scratch::extension_of;

/// Filename reported for remote documents when nothing better is known
pub const DEFAULT_REMOTE_FILENAME: &str = "document.pdf";

/// Where the PDF for one request comes from
#[derive(Debug, Clone)]
pub enum PdfSource {
    /// File staged in the scratch directory by the upload handler
    Uploaded {
        temporary_path: PathBuf,
        original_filename: String,
        declared_size: u64,
    },
    /// Document fetched over HTTP
    Remote {
        url: String,
        filename: Option<String>,
    },
}

impl PdfSource {
    /// Short human-readable description for logs
    pub fn describe(&self) -> String {
        match self {
            PdfSource::Uploaded {
                original_filename,
                declared_size,
                ..
            } => format!("upload '{}' ({} bytes)", original_filename, declared_size),
            PdfSource::Remote { url, .. } => format!("remote {}", url),
        }
    }
}

fn drive_file_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^https?://drive\.google\.com/file/d/([A-Za-z0-9_-]+)(?:[/?#].*)?$")
            .expect("drive file pattern is valid")
    })
}

fn drive_open_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^https?://drive\.google\.com/open\?(?:.*&)?id=([A-Za-z0-9_-]+)(?:[&#].*)?$")
            .expect("drive open pattern is valid")
    })
}

/// Rewrite viewer/share links into a direct-download URL.
///
/// Input that matches no known pattern is returned unchanged.
pub fn resolve_fetch_url(raw: &str) -> String {
    let trimmed = raw.trim();

    let id = drive_file_regex()
        .captures(trimmed)
        .or_else(|| drive_open_regex().captures(trimmed))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());

    match id {
        Some(id) => format!("https://drive.google.com/uc?export=download&id={}", id),
        None => raw.to_string(),
    }
}

/// Pick the filename echoed back for a remote document.
///
/// An explicit client value wins verbatim; otherwise the last URL path
/// segment is used when it carries an extension. Rewritten share links and
/// extensionless segments fall back to [`DEFAULT_REMOTE_FILENAME`].
pub fn remote_filename(url: &str, explicit: Option<&str>) -> String {
    if let Some(name) = explicit {
        return name.to_string();
    }

    if resolve_fetch_url(url) != url {
        return DEFAULT_REMOTE_FILENAME.to_string();
    }

    let without_query = url.split(['?', '#']).next().unwrap_or("");
    let path = without_query
        .split_once("://")
        .map(|(_, rest)| rest.split_once('/').map(|(_, path)| path).unwrap_or(""))
        .unwrap_or(without_query);

    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .map(|segment| {
            urlencoding::decode(segment)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| segment.to_string())
        })
        .filter(|name| !extension_of(name).is_empty())
        .unwrap_or_else(|| DEFAULT_REMOTE_FILENAME.to_string())
}
