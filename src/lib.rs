//! # Progressive Streamer
//!
//! An ingestion and adaptive-delivery pipeline for progressive JPEG
//! images.
//!
//! At startup the pipeline scans a directory of baseline JPEGs,
//! re-encodes each into progressive form, extracts its metadata, and
//! indexes it in an in-memory catalog. At request time a caller names
//! an image and reports the requesting device's display width; the
//! pipeline classifies the device, reads the progressive file, and
//! answers with a byte prefix scaled to the device class. Because
//! progressive JPEGs interleave scans of increasing fidelity, the
//! prefix still renders a coarse version of the full image.
//!
//! The HTTP boundary that would expose this over the network is out of
//! scope; [`IngestPipeline`] and [`DeliveryService`] are the surface it
//! would call.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`mod@format`] - JPEG metadata extraction, progressive re-encoding,
//!   marker probes
//! - [`catalog`] - the name-keyed in-memory index of ingested images
//! - [`source`] - byte retrieval behind the [`ImageSource`] seam
//! - [`device`] - display-width classification and per-class scales
//! - [`delivery`] - truncation, response caching, the delivery service
//! - [`ingest`] - the startup ingestion pipeline
//! - [`config`] - CLI and configuration types
//! - [`error`] - per-domain error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use progressive_streamer::{
//!     Catalog, DeliveryRequest, DeliveryService, DeviceThresholds, FsImageSource,
//!     IngestPipeline, ProgressiveConverter, ScalePolicy,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let catalog = Arc::new(Catalog::new());
//!
//!     let pipeline = IngestPipeline::new(
//!         catalog.clone(),
//!         ProgressiveConverter::new(),
//!         "images/baseline",
//!         "images/progressive",
//!     );
//!     let report = pipeline.run().await.expect("source directory unreadable");
//!     println!("indexed {} images", report.indexed_count());
//!
//!     let service = DeliveryService::new(
//!         catalog,
//!         FsImageSource::new(),
//!         DeviceThresholds::default(),
//!         ScalePolicy::default(),
//!     );
//!     let response = service
//!         .deliver(DeliveryRequest::new("dawn.jpg", 400))
//!         .await
//!         .expect("delivery failed");
//!     println!("served {} bytes for {}", response.data.len(), response.name);
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod delivery;
pub mod device;
pub mod error;
pub mod format;
pub mod ingest;
pub mod source;

// Re-export commonly used types
pub use catalog::{Catalog, ImageExtension, ImageRecord};
pub use config::Config;
pub use delivery::{
    truncate_for_scale, DeliveryCache, DeliveryCacheKey, DeliveryRequest, DeliveryResponse,
    DeliveryService, DEFAULT_DELIVERY_CACHE_CAPACITY,
};
pub use device::{
    is_valid_scale, DeviceClass, DeviceThresholds, ScalePolicy, DEFAULT_DESKTOP_SCALE,
    DEFAULT_MOBILE_MAX_WIDTH, DEFAULT_MOBILE_SCALE, DEFAULT_TABLET_MAX_WIDTH,
    DEFAULT_TABLET_SCALE,
};
pub use error::{
    ConfigError, ConvertError, DeliveryError, IngestError, MetadataError, SourceError,
};
pub use format::{
    extract, is_jpeg, is_progressive_jpeg, ImageMetadata, ProgressiveConverter,
    DEFAULT_ENCODE_QUALITY,
};
pub use ingest::{
    FileOutcome, IngestPipeline, IngestReport, SkipReason, SkippedFile, DEFAULT_INGEST_WORKERS,
};
pub use source::{FsImageSource, ImageSource};
