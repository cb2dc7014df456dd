use std::time::Duration;

use thiserror::Error;

/// Errors from decoding image metadata
#[derive(Debug, Clone, Error)]
pub enum MetadataError {
    /// The bytes are not a decodable JPEG
    #[error("JPEG decode error: {message}")]
    Decode { message: String },
}

/// Errors from converting a baseline JPEG to progressive encoding
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source bytes could not be decoded
    #[error("source JPEG could not be decoded: {message}")]
    Decode { message: String },

    /// No progressive output could be produced
    #[error("progressive encode failed: {message}")]
    Encode { message: String },

    /// File-system failure while committing the converted file
    #[error("I/O error during conversion: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from invalid threshold or scale configuration values
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Thresholds must satisfy 0 < mobile < tablet
    #[error(
        "invalid display thresholds: mobile {mobile} px must be positive and below tablet {tablet} px"
    )]
    InvalidThresholds { mobile: u32, tablet: u32 },

    /// Scale factors must lie in (0, 1]
    #[error("invalid {class} scale factor {value}: must be in (0, 1]")]
    InvalidScale { class: &'static str, value: f64 },

    /// A configured directory is unusable
    #[error("unusable {role} directory '{path}': {message}")]
    Directory {
        role: &'static str,
        path: String,
        message: String,
    },
}

/// Errors from reading stored image bytes
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// The backing file no longer exists
    #[error("image file not found: {0}")]
    NotFound(String),

    /// Any other read failure
    #[error("image read error: {0}")]
    Io(String),
}

impl SourceError {
    /// Map a std I/O error onto the source error taxonomy.
    pub fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            SourceError::NotFound(path.display().to_string())
        } else {
            SourceError::Io(format!("{}: {}", path.display(), err))
        }
    }
}

/// Errors surfaced to callers of the delivery service
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// Display width must be a positive integer
    #[error("invalid display width {width}: must be positive")]
    InvalidWidth { width: u32 },

    /// No cataloged image matches the requested name
    #[error("image not found: {name}")]
    NotFound { name: String },

    /// The read did not complete within the caller-supplied budget
    #[error("timed out after {limit:?} while reading '{name}'")]
    Timeout { name: String, limit: Duration },

    /// The backing store failed underneath a cataloged record
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Errors that abort an entire ingestion run.
///
/// Per-file failures never surface here; they are recorded as skip
/// outcomes in the run's report.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The source directory could not be listed
    #[error("cannot read source directory '{path}': {source}")]
    SourceDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The progressive output directory could not be prepared
    #[error("cannot prepare progressive directory '{path}': {source}")]
    ProgressiveDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
