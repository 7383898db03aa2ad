//! Remote acquisition
//!
//! Fetches a PDF over HTTP. The whole body is buffered in memory; by default
//! there is neither a size cap nor a timeout; both are opt-in through
//! [`FetchConfig`].

use std::error::Error as StdError;

use reqwest::Client;

use crate::config::FetchConfig;
use crate::error::{ExtractError, Result};
use crate::source::resolve_fetch_url;

use super::AcquiredDocument;

/// Upper bound on the up-front buffer reservation taken from Content-Length
const MAX_PREALLOCATION: u64 = 16 * 1024 * 1024;

/// Build the shared outbound client
pub fn build_client(config: &FetchConfig) -> reqwest::Result<Client> {
    let mut builder = Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// Render an error with its full source chain, skipping causes the
/// top-level message already includes.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

fn fetch_failure(err: &reqwest::Error) -> ExtractError {
    ExtractError::FetchFailure(format!("Failed to fetch PDF from URL: {}", error_chain(err)))
}

/// Fetch the document behind `url` after share-link resolution.
pub async fn fetch_remote(client: &Client, config: &FetchConfig, url: &str) -> Result<AcquiredDocument> {
    let resolved = resolve_fetch_url(url);
    if resolved != url {
        tracing::info!(original = %url, resolved = %resolved, "Rewrote share link");
    }

    tracing::debug!(url = %resolved, "Fetching remote PDF");

    let mut response = client
        .get(&resolved)
        .send()
        .await
        .map_err(|e| fetch_failure(&e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ExtractError::FetchFailure(format!(
            "Failed to fetch PDF from URL: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        )));
    }

    let reserve = response
        .content_length()
        .unwrap_or(0)
        .min(config.max_body_size.unwrap_or(MAX_PREALLOCATION))
        .min(MAX_PREALLOCATION);
    let mut bytes = Vec::with_capacity(reserve as usize);

    while let Some(chunk) = response.chunk().await.map_err(|e| fetch_failure(&e))? {
        if let Some(max) = config.max_body_size {
            if (bytes.len() + chunk.len()) as u64 > max {
                return Err(ExtractError::FetchFailure(format!(
                    "Failed to fetch PDF from URL: response exceeds {} bytes",
                    max
                )));
            }
        }
        bytes.extend_from_slice(&chunk);
    }

    tracing::info!(url = %resolved, size = bytes.len(), "Remote PDF fetched");

    Ok(AcquiredDocument::new(bytes, format!("remote {}", resolved)))
}
