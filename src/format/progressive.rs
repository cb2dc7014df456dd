//! Baseline → progressive JPEG conversion.
//!
//! Progressive JPEGs store multiple interleaved scans of increasing
//! fidelity, so a byte-truncated prefix still renders a coarse version
//! of the whole image. The delivery pipeline depends on that property;
//! every image is therefore re-encoded progressively before it enters
//! the catalog.
//!
//! # Design Decisions
//!
//! - **Always decode/encode**: sources are fully decoded and re-encoded,
//!   even when they already happen to be progressive. Re-encoding a
//!   progressive JPEG is format-wise a no-op; detecting it is not this
//!   module's job.
//!
//! - **Commit ordering**: on disk, the progressive file is written,
//!   flushed and synced before the baseline source is deleted. A failure
//!   at any point before the sync leaves the source untouched.
//!
//! - **Encoder split**: decoding uses the `image` crate; encoding uses
//!   `jpeg-encoder`, which supports progressive scan scripts (the
//!   `image` crate's JPEG encoder is baseline-only).

use std::io::Cursor;
use std::path::Path;

use bytes::Bytes;
use image::ImageReader;
use jpeg_encoder::{ColorType, Encoder};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::ConvertError;

/// JPEG quality used for progressive re-encodes (1-100).
pub const DEFAULT_ENCODE_QUALITY: u8 = 80;

/// Largest dimension a JPEG frame can describe on either side.
const MAX_JPEG_DIMENSION: u32 = 65_535;

// =============================================================================
// Progressive Converter
// =============================================================================

/// Converter from baseline to progressive JPEG encoding.
///
/// # Example
///
/// ```ignore
/// use progressive_streamer::format::ProgressiveConverter;
///
/// let converter = ProgressiveConverter::new();
/// let progressive = converter.convert(&baseline_bytes)?;
/// ```
#[derive(Debug, Clone)]
pub struct ProgressiveConverter {
    quality: u8,
}

impl ProgressiveConverter {
    /// Create a converter with the default encode quality.
    pub fn new() -> Self {
        Self {
            quality: DEFAULT_ENCODE_QUALITY,
        }
    }

    /// Create a converter with a specific encode quality (1-100).
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    /// Re-encode a JPEG byte sequence with progressive scan ordering.
    ///
    /// Pure in-memory transcode; no file-system effects.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::Decode`] when the source is not a decodable JPEG
    /// - [`ConvertError::Encode`] when progressive output cannot be
    ///   produced (including frames beyond the JPEG dimension limit)
    pub fn convert(&self, source: &[u8]) -> Result<Bytes, ConvertError> {
        let reader = ImageReader::with_format(Cursor::new(source), image::ImageFormat::Jpeg);

        let img = reader.decode().map_err(|e| ConvertError::Decode {
            message: e.to_string(),
        })?;

        let (width, height) = (img.width(), img.height());
        if width > MAX_JPEG_DIMENSION || height > MAX_JPEG_DIMENSION {
            return Err(ConvertError::Encode {
                message: format!("image {width}x{height} exceeds the JPEG dimension limit"),
            });
        }

        let rgb = img.to_rgb8();

        let mut output = Vec::new();
        let mut encoder = Encoder::new(&mut output, self.quality);
        encoder.set_progressive(true);

        encoder
            .encode(rgb.as_raw(), width as u16, height as u16, ColorType::Rgb)
            .map_err(|e| ConvertError::Encode {
                message: e.to_string(),
            })?;

        Ok(Bytes::from(output))
    }

    /// Convert a file on disk, committing with convert-then-delete
    /// ordering.
    ///
    /// Reads `source`, re-encodes it progressively, writes the result to
    /// `dest` (flushed and synced to stable storage), and only then
    /// deletes `source`. When `source` and `dest` are the same path the
    /// delete step is skipped. Returns the progressive bytes so callers
    /// can extract metadata without re-reading the file.
    ///
    /// # Errors
    ///
    /// Conversion errors as for [`convert`](Self::convert), plus
    /// [`ConvertError::Io`] for any file-system failure. On error the
    /// source file is left in place.
    pub async fn convert_file(&self, source: &Path, dest: &Path) -> Result<Bytes, ConvertError> {
        let source_bytes = fs::read(source).await?;
        let progressive = self.convert(&source_bytes)?;

        let mut file = fs::File::create(dest).await?;
        file.write_all(&progressive).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        if source != dest {
            fs::remove_file(source).await?;
        }

        debug!(
            source = %source.display(),
            dest = %dest.display(),
            bytes = progressive.len(),
            "converted to progressive JPEG"
        );

        Ok(progressive)
    }
}

impl Default for ProgressiveConverter {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
