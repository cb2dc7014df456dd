//! Configuration management for the progressive streamer.
//!
//! Supports command-line arguments via clap and environment variables
//! with the `PSTREAM_` prefix, with sensible defaults for every tunable.
//!
//! # Fallback policy
//!
//! Bad threshold or scale values must never take the process down or
//! fail a request: [`Config::device_thresholds`] and
//! [`Config::scale_policy`] log what they reject and substitute the
//! conservative choice (default thresholds; `1.0` scale, i.e. serve the
//! full image). [`Config::validate`] exists so startup can still report
//! exactly what was wrong.
//!
//! # Environment Variables
//!
//! - `PSTREAM_SOURCE_DIR` - Directory of baseline JPEGs (required)
//! - `PSTREAM_PROGRESSIVE_DIR` - Output directory (required)
//! - `PSTREAM_MOBILE_MAX_WIDTH` - Mobile cut-off in pixels (default: 640)
//! - `PSTREAM_TABLET_MAX_WIDTH` - Tablet cut-off in pixels (default: 1280)
//! - `PSTREAM_MOBILE_SCALE` - Mobile byte-retention factor (default: 0.5)
//! - `PSTREAM_TABLET_SCALE` - Tablet byte-retention factor (default: 0.75)
//! - `PSTREAM_DESKTOP_SCALE` - Desktop byte-retention factor (default: 1.0)
//! - `PSTREAM_INGEST_WORKERS` - Concurrent conversions (default: 4)
//! - `PSTREAM_CACHE_BYTES` - Delivery cache capacity (default: 50MB)

use std::path::PathBuf;

use clap::Parser;
use tracing::warn;

use crate::delivery::DEFAULT_DELIVERY_CACHE_CAPACITY;
use crate::device::{
    DeviceThresholds, ScalePolicy, DEFAULT_DESKTOP_SCALE, DEFAULT_MOBILE_MAX_WIDTH,
    DEFAULT_MOBILE_SCALE, DEFAULT_TABLET_MAX_WIDTH, DEFAULT_TABLET_SCALE,
};
use crate::error::ConfigError;
use crate::ingest::DEFAULT_INGEST_WORKERS;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Progressive Streamer - adaptive delivery of progressive JPEG images.
///
/// Re-encodes a directory of baseline JPEGs into progressive form at
/// startup and indexes them for device-scaled, byte-truncated delivery.
#[derive(Parser, Debug, Clone)]
#[command(name = "progressive-streamer")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Directories
    // =========================================================================
    /// Directory containing the baseline JPEG images to ingest.
    #[arg(long, env = "PSTREAM_SOURCE_DIR")]
    pub source_dir: PathBuf,

    /// Directory the progressive JPEGs are written to.
    ///
    /// May equal the source directory for in-place re-encoding.
    #[arg(long, env = "PSTREAM_PROGRESSIVE_DIR")]
    pub progressive_dir: PathBuf,

    // =========================================================================
    // Device Classification
    // =========================================================================
    /// Widest display still classified as mobile (pixels).
    #[arg(long, default_value_t = DEFAULT_MOBILE_MAX_WIDTH, env = "PSTREAM_MOBILE_MAX_WIDTH")]
    pub mobile_max_width: u32,

    /// Widest display still classified as tablet (pixels).
    ///
    /// Anything wider is desktop.
    #[arg(long, default_value_t = DEFAULT_TABLET_MAX_WIDTH, env = "PSTREAM_TABLET_MAX_WIDTH")]
    pub tablet_max_width: u32,

    // =========================================================================
    // Delivery Scales
    // =========================================================================
    /// Fraction of image bytes served to mobile devices, in (0, 1].
    #[arg(long, default_value_t = DEFAULT_MOBILE_SCALE, env = "PSTREAM_MOBILE_SCALE")]
    pub mobile_scale: f64,

    /// Fraction of image bytes served to tablet devices, in (0, 1].
    #[arg(long, default_value_t = DEFAULT_TABLET_SCALE, env = "PSTREAM_TABLET_SCALE")]
    pub tablet_scale: f64,

    /// Fraction of image bytes served to desktop devices, in (0, 1].
    #[arg(long, default_value_t = DEFAULT_DESKTOP_SCALE, env = "PSTREAM_DESKTOP_SCALE")]
    pub desktop_scale: f64,

    // =========================================================================
    // Operational Knobs
    // =========================================================================
    /// Maximum number of concurrent conversion workers during ingestion.
    #[arg(long, default_value_t = DEFAULT_INGEST_WORKERS, env = "PSTREAM_INGEST_WORKERS")]
    pub ingest_workers: usize,

    /// Delivery response cache capacity in bytes.
    #[arg(long, default_value_t = DEFAULT_DELIVERY_CACHE_CAPACITY, env = "PSTREAM_CACHE_BYTES")]
    pub cache_bytes: usize,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Report the first invalid tunable, if any.
    ///
    /// Validation failures are diagnostics, not show-stoppers: the
    /// accessors below substitute fallbacks for anything reported here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        DeviceThresholds::new(self.mobile_max_width, self.tablet_max_width)?;
        ScalePolicy::new(self.mobile_scale, self.tablet_scale, self.desktop_scale)?;
        Ok(())
    }

    /// Classification thresholds, falling back to defaults when the
    /// configured values violate `0 < mobile < tablet`.
    pub fn device_thresholds(&self) -> DeviceThresholds {
        match DeviceThresholds::new(self.mobile_max_width, self.tablet_max_width) {
            Ok(thresholds) => thresholds,
            Err(e) => {
                warn!(error = %e, "falling back to default display thresholds");
                DeviceThresholds::default()
            }
        }
    }

    /// Scale policy with each invalid factor replaced by `1.0`.
    pub fn scale_policy(&self) -> ScalePolicy {
        let (policy, _rejected) =
            ScalePolicy::sanitized(self.mobile_scale, self.tablet_scale, self.desktop_scale);
        policy
    }
}

// =============================================================================
// Tests
// =============================================================================
