//! Configuration management for PDF Text Server

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default upload cap: 10MB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Multipart field carrying the uploaded PDF
pub const DEFAULT_UPLOAD_FIELD: &str = "pdf";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Scratch directory for staged uploads
    pub scratch_dir: PathBuf,
    /// Multipart field name holding the file
    pub field_name: String,
    /// Largest accepted upload in bytes
    pub max_file_size: u64,
}

#[derive(Debug, Clone, Default)]
pub struct FetchConfig {
    /// Outbound request timeout. `None` leaves the request unbounded.
    pub timeout: Option<Duration>,
    /// Optional cap on remote bodies. `None` buffers whatever the server sends.
    pub max_body_size: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            upload: UploadConfig {
                scratch_dir: PathBuf::from("uploads"),
                field_name: DEFAULT_UPLOAD_FIELD.to_string(),
                max_file_size: DEFAULT_MAX_UPLOAD_BYTES,
            },
            fetch: FetchConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("PORT")?.unwrap_or(3000),
            },
            upload: UploadConfig {
                scratch_dir: env::var("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("uploads")),
                field_name: DEFAULT_UPLOAD_FIELD.to_string(),
                max_file_size: parse_var("MAX_UPLOAD_BYTES")?.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            },
            fetch: FetchConfig {
                timeout: parse_var::<u64>("FETCH_TIMEOUT_SECS")?.map(Duration::from_secs),
                max_body_size: parse_var("FETCH_MAX_BYTES")?,
            },
        })
    }
}

/// Read an optional variable, failing only when it is set but unparseable.
fn parse_var<T>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                name,
                value: raw,
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.upload.field_name, "pdf");
        assert_eq!(config.upload.max_file_size, 10_485_760);
        assert!(config.fetch.timeout.is_none());
        assert!(config.fetch.max_body_size.is_none());
    }

    #[test]
    fn test_parse_var_missing_is_none() {
        let value: Option<u16> = parse_var("PDFTEXT_TEST_UNSET_VARIABLE").unwrap();
        assert!(value.is_none());
    }
}
