//! PDF Text Server Library
//!
//! Accepts a PDF as a multipart upload or a remote URL, extracts its text and
//! metadata, and answers with normalized JSON. The main server binary is in
//! main.rs.
//!
//! # Modules
//!
//! - `source`: share-link resolution and the per-request source record
//! - `acquire`: upload staging and remote fetch
//! - `extract`: parser adapter (MuPDF in production)
//! - `response`: success envelope assembly
//! - `pipeline`: per-request lifecycle and scratch cleanup
//! - `signing`: HMAC-SHA512 utility
//! - `routes`: HTTP surface

pub mod acquire;
pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod response;
pub mod routes;
pub mod scratch;
pub mod signing;
pub mod source;
pub mod state;

pub use config::Config;
pub use error::{ExtractError, Result};
pub use routes::build_router;
pub use state::AppState;
