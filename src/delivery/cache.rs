//! Response cache for truncated delivery payloads.
//!
//! Truncating is cheap, but the read behind it is not: every cache miss
//! re-reads the progressive file from the backing store. Responses are
//! therefore cached per `(image name, device class)`, the two inputs
//! that fully determine the served bytes between ingestion runs.
//!
//! # Size-Based Eviction
//!
//! The cache tracks the total size of cached payloads in bytes and
//! evicts least-recently-used entries when the capacity is exceeded.

use std::sync::Arc;

use bytes::Bytes;
use lru::LruCache;
use tokio::sync::RwLock;

use crate::device::DeviceClass;

/// Default cache capacity: 50MB
pub const DEFAULT_DELIVERY_CACHE_CAPACITY: usize = 50 * 1024 * 1024;

/// Default maximum number of entries (to bound LRU overhead)
const DEFAULT_MAX_ENTRIES: usize = 10_000;

// =============================================================================
// Cache Key
// =============================================================================

/// Cache key for a truncated response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeliveryCacheKey {
    /// Cataloged image name (the record's name, not the requested alias)
    pub name: Arc<str>,

    /// Device class the payload was truncated for
    pub class: DeviceClass,
}

impl DeliveryCacheKey {
    /// Create a new cache key.
    pub fn new(name: impl Into<Arc<str>>, class: DeviceClass) -> Self {
        Self {
            name: name.into(),
            class,
        }
    }
}

// =============================================================================
// Delivery Cache
// =============================================================================

/// LRU cache for truncated responses with size-based capacity.
///
/// Thread-safe; share across async tasks via `Arc`. Must be cleared
/// after a catalog rebuild, since the payloads it holds were derived
/// from the previous generation of files.
pub struct DeliveryCache {
    /// The underlying LRU cache
    cache: RwLock<LruCache<DeliveryCacheKey, Bytes>>,

    /// Maximum total size in bytes
    max_size: usize,

    /// Current total size in bytes
    current_size: RwLock<usize>,
}

impl DeliveryCache {
    /// Create a cache with the default capacity (50MB).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_DELIVERY_CACHE_CAPACITY)
    }

    /// Create a cache with the specified capacity in bytes.
    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            cache: RwLock::new(LruCache::new(
                std::num::NonZeroUsize::new(DEFAULT_MAX_ENTRIES).unwrap(),
            )),
            max_size,
            current_size: RwLock::new(0),
        }
    }

    /// Get a cached payload, marking it recently used.
    pub async fn get(&self, key: &DeliveryCacheKey) -> Option<Bytes> {
        let mut cache = self.cache.write().await;
        cache.get(key).cloned()
    }

    /// Store a payload, evicting LRU entries while over capacity.
    pub async fn put(&self, key: DeliveryCacheKey, data: Bytes) {
        let data_size = data.len();
        let mut cache = self.cache.write().await;
        let mut current_size = self.current_size.write().await;

        // If key exists, subtract old size first
        if let Some(old_data) = cache.peek(&key) {
            *current_size = current_size.saturating_sub(old_data.len());
        }

        cache.put(key, data);
        *current_size += data_size;

        while *current_size > self.max_size {
            if let Some((_, evicted)) = cache.pop_lru() {
                *current_size = current_size.saturating_sub(evicted.len());
            } else {
                break;
            }
        }
    }

    /// Drop every cached payload.
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        let mut current_size = self.current_size.write().await;
        cache.clear();
        *current_size = 0;
    }

    /// Number of cached payloads.
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.len()
    }

    /// Whether the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Current total size of cached payloads in bytes.
    pub async fn size(&self) -> usize {
        let current_size = self.current_size.read().await;
        *current_size
    }

    /// Maximum capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.max_size
    }
}

impl Default for DeliveryCache {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
