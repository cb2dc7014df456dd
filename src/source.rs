//! Image byte retrieval.
//!
//! The catalog stores metadata and paths, not pixel data; whoever needs
//! the actual bytes goes through an [`ImageSource`]. The abstraction
//! keeps the delivery service independent of where images live (local
//! disk in production, in-memory fixtures in tests) and gives the read
//! path a single seam to wrap in a timeout.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::SourceError;

// =============================================================================
// ImageSource Trait
// =============================================================================

/// Trait for fetching the raw bytes of a cataloged image.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Read the complete byte sequence of the image at `path`.
    ///
    /// # Errors
    ///
    /// [`SourceError::NotFound`] when the backing file has disappeared
    /// since indexing, [`SourceError::Io`] for any other read failure.
    async fn read_image(&self, path: &Path) -> Result<Bytes, SourceError>;
}

// =============================================================================
// Filesystem Source
// =============================================================================

/// [`ImageSource`] backed by the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageSource;

impl FsImageSource {
    /// Create a new filesystem source.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageSource for FsImageSource {
    async fn read_image(&self, path: &Path) -> Result<Bytes, SourceError> {
        match tokio::fs::read(path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(err) => Err(SourceError::from_io(path, err)),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
