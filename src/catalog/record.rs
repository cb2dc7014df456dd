//! Cataloged image records.

use std::path::{Path, PathBuf};

use serde::Serialize;

// =============================================================================
// Image Extension
// =============================================================================

/// File extension of a cataloged image.
///
/// The pipeline only ever indexes JPEG files, so the set is closed.
/// Matching is ASCII-case-insensitive (`photo.JPG` passes the gate);
/// the record keeps the canonical lowercase form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageExtension {
    Jpg,
    Jpeg,
}

impl ImageExtension {
    /// Parse a raw file extension, if it is one the pipeline supports.
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("jpg") {
            Some(ImageExtension::Jpg)
        } else if ext.eq_ignore_ascii_case("jpeg") {
            Some(ImageExtension::Jpeg)
        } else {
            None
        }
    }

    /// Parse the extension of a path, if supported.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// The canonical lowercase extension string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageExtension::Jpg => "jpg",
            ImageExtension::Jpeg => "jpeg",
        }
    }
}

// =============================================================================
// Image Record
// =============================================================================

/// A single ingested image.
///
/// Created by the ingestion pipeline after a successful conversion and
/// metadata extraction, and immutable afterwards. `width` and `height`
/// are always positive: a file whose metadata cannot be extracted is
/// never indexed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRecord {
    /// Original filename including extension; the catalog key.
    pub name: String,

    /// Location of the progressive JPEG on disk.
    pub path: PathBuf,

    /// File extension (`jpg` or `jpeg`).
    pub extension: ImageExtension,

    /// Pixel width.
    pub width: u32,

    /// Pixel height.
    pub height: u32,

    /// Size of the progressive file in bytes.
    pub byte_size: u64,
}

// =============================================================================
// Tests
// =============================================================================
