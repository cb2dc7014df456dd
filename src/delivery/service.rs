//! Delivery service.
//!
//! The main entry point for image requests. A request names an image
//! and reports the requesting device's display width; the service
//! classifies the device, resolves the cataloged record, reads the
//! progressive file, and answers with a byte prefix sized for the
//! device class.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{info, warn};

use crate::catalog::{Catalog, ImageRecord};
use crate::device::{DeviceClass, DeviceThresholds, ScalePolicy};
use crate::error::DeliveryError;
use crate::source::ImageSource;

use super::cache::{DeliveryCache, DeliveryCacheKey, DEFAULT_DELIVERY_CACHE_CAPACITY};
use super::selector::truncate_for_scale;

// =============================================================================
// Delivery Request
// =============================================================================

/// A request for an adaptively delivered image.
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    /// Requested image name (`dawn.jpg`; a bare stem or a foreign
    /// extension resolves to the `.jpg`/`.jpeg` record when present)
    pub name: String,

    /// Display width of the requesting device in pixels
    pub display_width: u32,

    /// Optional budget for reading the image from the backing store;
    /// expiry yields [`DeliveryError::Timeout`] instead of a hung read
    pub timeout: Option<Duration>,
}

impl DeliveryRequest {
    /// Create a request without a read timeout.
    pub fn new(name: impl Into<String>, display_width: u32) -> Self {
        Self {
            name: name.into(),
            display_width,
            timeout: None,
        }
    }

    /// Attach a read timeout to the request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// =============================================================================
// Delivery Response
// =============================================================================

/// Response from the delivery service.
#[derive(Debug, Clone)]
pub struct DeliveryResponse {
    /// The (possibly truncated) progressive JPEG payload
    pub data: Bytes,

    /// Name of the record actually served; differs from the requested
    /// name when stem resolution kicked in
    pub name: String,

    /// Device class the payload was sized for
    pub device_class: DeviceClass,

    /// Retention factor that was applied
    pub scale: f64,

    /// Whether the payload came from the response cache
    pub cache_hit: bool,
}

// =============================================================================
// Delivery Service
// =============================================================================

/// Service answering image requests with device-scaled payloads.
///
/// The full pipeline per request:
///
/// 1. Classify the display width into a [`DeviceClass`]
/// 2. Resolve the record (exact name, then `.jpg`/`.jpeg` stem
///    alternates); a miss is an explicit [`DeliveryError::NotFound`],
///    never a silently substituted image
/// 3. Serve from the response cache when possible
/// 4. Otherwise read the progressive file (honoring the caller's
///    timeout), truncate for the class, cache and respond
///
/// Requests are read-only against the catalog and safe to run
/// concurrently.
pub struct DeliveryService<S: ImageSource> {
    /// The catalog of ingested images
    catalog: Arc<Catalog>,

    /// Backing store for image bytes
    source: S,

    /// Cache of truncated payloads
    cache: DeliveryCache,

    /// Display-width cut-offs
    thresholds: DeviceThresholds,

    /// Per-class retention factors
    scales: ScalePolicy,
}

impl<S: ImageSource> DeliveryService<S> {
    /// Create a service with the default cache capacity.
    pub fn new(
        catalog: Arc<Catalog>,
        source: S,
        thresholds: DeviceThresholds,
        scales: ScalePolicy,
    ) -> Self {
        Self::with_cache_capacity(
            catalog,
            source,
            thresholds,
            scales,
            DEFAULT_DELIVERY_CACHE_CAPACITY,
        )
    }

    /// Create a service with a custom response cache capacity in bytes.
    pub fn with_cache_capacity(
        catalog: Arc<Catalog>,
        source: S,
        thresholds: DeviceThresholds,
        scales: ScalePolicy,
        cache_capacity: usize,
    ) -> Self {
        Self {
            catalog,
            source,
            cache: DeliveryCache::with_capacity(cache_capacity),
            thresholds,
            scales,
        }
    }

    /// Serve an image request.
    ///
    /// # Errors
    ///
    /// - [`DeliveryError::InvalidWidth`] for a zero display width
    /// - [`DeliveryError::NotFound`] when no record matches (including
    ///   the empty-catalog case)
    /// - [`DeliveryError::Timeout`] when the read exceeds the caller's
    ///   budget
    /// - [`DeliveryError::Source`] when the backing store fails
    pub async fn deliver(&self, request: DeliveryRequest) -> Result<DeliveryResponse, DeliveryError> {
        let class = self.thresholds.classify(request.display_width)?;

        let record = self
            .resolve(&request.name)
            .await
            .ok_or_else(|| DeliveryError::NotFound {
                name: request.name.clone(),
            })?;

        let scale = self.scales.factor_for(class);
        let key = DeliveryCacheKey::new(record.name.as_str(), class);

        if let Some(data) = self.cache.get(&key).await {
            return Ok(DeliveryResponse {
                data,
                name: record.name,
                device_class: class,
                scale,
                cache_hit: true,
            });
        }

        let raw = self.read_bytes(&record, request.timeout).await?;
        let data = truncate_for_scale(&raw, scale);
        self.cache.put(key, data.clone()).await;

        info!(
            name = %record.name,
            class = %class,
            scale,
            bytes = data.len(),
            full_bytes = raw.len(),
            "serving progressive image"
        );

        Ok(DeliveryResponse {
            data,
            name: record.name,
            device_class: class,
            scale,
            cache_hit: false,
        })
    }

    /// Resolve a requested name to a cataloged record.
    ///
    /// Exact match first; otherwise the request's stem is retried with
    /// the supported extensions, in a fixed order.
    async fn resolve(&self, name: &str) -> Option<ImageRecord> {
        if let Some(record) = self.catalog.find_by_name(name).await {
            return Some(record);
        }

        let stem = name.rsplit_once('.').map(|(s, _)| s).unwrap_or(name);
        for candidate in [format!("{stem}.jpg"), format!("{stem}.jpeg")] {
            if candidate == name {
                continue;
            }
            if let Some(record) = self.catalog.find_by_name(&candidate).await {
                warn!(requested = name, resolved = %candidate, "resolved image by stem");
                return Some(record);
            }
        }

        None
    }

    /// Read the record's bytes, honoring an optional time budget.
    async fn read_bytes(
        &self,
        record: &ImageRecord,
        limit: Option<Duration>,
    ) -> Result<Bytes, DeliveryError> {
        match limit {
            Some(limit) => {
                match tokio::time::timeout(limit, self.source.read_image(&record.path)).await {
                    Ok(result) => Ok(result?),
                    Err(_) => Err(DeliveryError::Timeout {
                        name: record.name.clone(),
                        limit,
                    }),
                }
            }
            None => Ok(self.source.read_image(&record.path).await?),
        }
    }

    /// Drop all cached responses.
    ///
    /// Call after re-running ingestion; cached payloads were derived
    /// from the previous catalog generation.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /// Response cache statistics as `(current_size, capacity, entries)`.
    pub async fn cache_stats(&self) -> (usize, usize, usize) {
        (
            self.cache.size().await,
            self.cache.capacity(),
            self.cache.len().await,
        )
    }

    /// The catalog this service reads from.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }
}

// =============================================================================
// Tests
// =============================================================================
