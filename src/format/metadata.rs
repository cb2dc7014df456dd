//! Image metadata extraction.
//!
//! Reports the pixel dimensions and byte size of a JPEG byte sequence.
//! Dimensions come from the container header; the full pixel data is
//! never decoded here.

use std::io::Cursor;

use image::ImageReader;
use serde::Serialize;

use crate::error::MetadataError;

// =============================================================================
// Image Metadata
// =============================================================================

/// Metadata of a single image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageMetadata {
    /// Pixel width, always positive for a decodable image.
    pub width: u32,

    /// Pixel height, always positive for a decodable image.
    pub height: u32,

    /// Length of the input byte sequence.
    pub byte_size: u64,
}

/// Extract metadata from a complete JPEG byte sequence.
///
/// # Errors
///
/// Returns [`MetadataError::Decode`] when the bytes are not a readable
/// JPEG. Callers in the ingestion path log the failure and skip the
/// file; a metadata failure never aborts a batch.
pub fn extract(bytes: &[u8]) -> Result<ImageMetadata, MetadataError> {
    let reader = ImageReader::with_format(Cursor::new(bytes), image::ImageFormat::Jpeg);

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| MetadataError::Decode {
            message: e.to_string(),
        })?;

    Ok(ImageMetadata {
        width,
        height,
        byte_size: bytes.len() as u64,
    })
}

// =============================================================================
// Tests
// =============================================================================
