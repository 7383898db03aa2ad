//! Request lifecycle
//!
//! Runs the ingestion stages in order for one request:
//!
//! ```text
//! Start -> Acquiring -> Extracting -> Assembling -> Responded
//!              \             \             \
//!               +-------------+-------------+--> Failed
//! ```
//!
//! For uploads the staged scratch file is removed exactly once: right after
//! extraction on success, or before the error is returned on failure.

use std::fmt;

use axum::extract::Multipart;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::acquire::{fetch_remote, read_staged, stage_upload, StagedUpload};
use crate::error::{ExtractError, Result};
use crate::extract::{extract, ExtractionResult};
use crate::response::{assemble, ExtractionResponse, ResponseOrigin};
use crate::source::{remote_filename, PdfSource};
use crate::state::AppState;

/// Body of `POST /extract-text-url`
///
/// Fields are loosely typed so that a wrong type reports as missing input
/// instead of a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct UrlExtractionRequest {
    #[serde(default)]
    pub url: Option<Value>,
    #[serde(default)]
    pub filename: Option<Value>,
}

/// Pipeline stage of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Acquiring,
    Extracting,
    Assembling,
    Responded,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Acquiring => "acquiring",
            Stage::Extracting => "extracting",
            Stage::Assembling => "assembling",
            Stage::Responded => "responded",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks and logs stage transitions for one request
#[derive(Debug)]
pub struct StageTracker {
    request_id: Uuid,
    kind: &'static str,
    stage: Stage,
}

impl StageTracker {
    pub fn new(kind: &'static str) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            kind,
            stage: Stage::Start,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn enter(&mut self, next: Stage) {
        tracing::debug!(
            request_id = %self.request_id,
            kind = self.kind,
            from = %self.stage,
            to = %next,
            "Stage transition"
        );
        self.stage = next;
    }

    /// Record a terminal failure and hand the error back
    pub fn fail(&mut self, error: ExtractError) -> ExtractError {
        tracing::debug!(
            request_id = %self.request_id,
            kind = self.kind,
            stage = %self.stage,
            error = error.category(),
            "Request failed"
        );
        self.stage = Stage::Failed;
        error
    }
}

/// Upload pipeline: stage, read, extract, clean up, assemble.
pub async fn run_upload(state: &AppState, mut multipart: Multipart) -> Result<ExtractionResponse> {
    let mut tracker = StageTracker::new("upload");
    tracker.enter(Stage::Acquiring);

    let staged = stage_upload(&mut multipart, &state.config().upload)
        .await
        .map_err(|e| tracker.fail(e))?;

    tracing::info!(source = %staged.source().describe(), "Processing uploaded PDF");

    let outcome = extract_staged(state, &staged, &mut tracker).await;
    staged.file.remove().await;
    let extraction = outcome.map_err(|e| tracker.fail(e))?;

    tracker.enter(Stage::Assembling);
    let response = assemble(
        ResponseOrigin::Upload {
            filename: staged.original_filename,
            file_size: staged.size,
        },
        extraction,
    );
    tracker.enter(Stage::Responded);

    Ok(response)
}

async fn extract_staged(
    state: &AppState,
    staged: &StagedUpload,
    tracker: &mut StageTracker,
) -> Result<ExtractionResult> {
    let document = read_staged(staged).await?;
    tracker.enter(Stage::Extracting);
    extract(state.parser(), document.bytes).await
}

/// URL pipeline: validate, fetch, extract, assemble.
pub async fn run_remote(state: &AppState, request: UrlExtractionRequest) -> Result<ExtractionResponse> {
    let mut tracker = StageTracker::new("remote");

    let url = match request.url {
        Some(Value::String(url)) if !url.trim().is_empty() => url,
        _ => {
            return Err(tracker.fail(ExtractError::MissingInput(
                "No PDF URL provided".to_string(),
            )))
        }
    };
    let explicit_filename = match request.filename {
        None | Some(Value::Null) => None,
        Some(Value::String(name)) => Some(name),
        Some(other) => Some(other.to_string()),
    };

    let source = PdfSource::Remote {
        url: url.clone(),
        filename: explicit_filename.clone(),
    };
    tracing::info!(source = %source.describe(), "Processing remote PDF");

    tracker.enter(Stage::Acquiring);
    let document = fetch_remote(state.http_client(), &state.config().fetch, &url)
        .await
        .map_err(|e| tracker.fail(e))?;

    tracker.enter(Stage::Extracting);
    let extraction = extract(state.parser(), document.bytes)
        .await
        .map_err(|e| tracker.fail(e))?;

    tracker.enter(Stage::Assembling);
    let response = assemble(
        ResponseOrigin::Remote {
            filename: remote_filename(&url, explicit_filename.as_deref()),
            url,
        },
        extraction,
    );
    tracker.enter(Stage::Responded);

    Ok(response)
}
