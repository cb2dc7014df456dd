//! Test utilities for integration tests.
//!
//! Fixture JPEG builders and a mock image source with request tracking.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};

use progressive_streamer::error::SourceError;
use progressive_streamer::source::ImageSource;

// =============================================================================
// Fixture Images
// =============================================================================

/// Encode a baseline JPEG with a simple gradient pattern.
pub fn create_baseline_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
    });

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, 90);
    encoder.encode_image(&img).unwrap();
    buf
}

/// Check that data carries JPEG SOI and EOI markers.
pub fn is_valid_jpeg(data: &[u8]) -> bool {
    data.len() >= 4
        && data[0] == 0xFF
        && data[1] == 0xD8
        && data[data.len() - 2] == 0xFF
        && data[data.len() - 1] == 0xD9
}

// =============================================================================
// Mock Image Source with Request Tracking
// =============================================================================

/// An in-memory image source that counts reads.
///
/// Useful for verifying the delivery cache actually prevents repeated
/// reads of the backing store.
pub struct TrackingMockSource {
    files: HashMap<PathBuf, Bytes>,
    read_count: Arc<AtomicUsize>,
}

impl TrackingMockSource {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            read_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, data: Vec<u8>) -> Self {
        self.files.insert(path.into(), Bytes::from(data));
        self
    }

    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }

    /// Handle to the counter, usable after the source moves into a
    /// service.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        self.read_count.clone()
    }
}

#[async_trait]
impl ImageSource for TrackingMockSource {
    async fn read_image(&self, path: &Path) -> Result<Bytes, SourceError> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(path.display().to_string()))
    }
}
