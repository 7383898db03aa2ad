//! Application state management

use std::sync::Arc;
use std::time::Instant;

use reqwest::Client;

use crate::acquire::build_client;
use crate::config::Config;
use crate::extract::{MuPdfParser, PdfParser};

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Shared application state
///
/// Immutable after construction; requests share nothing else.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    http_client: Client,
    parser: Arc<dyn PdfParser>,
    started_at: Instant,
}

impl AppState {
    /// Create state backed by the MuPDF parser
    pub fn new(config: Config) -> Result<Self, StateError> {
        Self::with_parser(config, Arc::new(MuPdfParser::new()))
    }

    /// Create state with a specific parser implementation
    pub fn with_parser(config: Config, parser: Arc<dyn PdfParser>) -> Result<Self, StateError> {
        let http_client = build_client(&config.fetch)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                http_client,
                parser,
                started_at: Instant::now(),
            }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the outbound HTTP client
    pub fn http_client(&self) -> &Client {
        &self.inner.http_client
    }

    /// Get a handle to the PDF parser
    pub fn parser(&self) -> Arc<dyn PdfParser> {
        Arc::clone(&self.inner.parser)
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> f64 {
        self.inner.started_at.elapsed().as_secs_f64()
    }
}
