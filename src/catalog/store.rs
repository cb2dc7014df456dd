//! The in-memory image catalog.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::record::ImageRecord;

// =============================================================================
// Catalog
// =============================================================================

/// Name-keyed store of [`ImageRecord`]s.
///
/// The catalog is rebuilt from scratch on every ingestion run ([`clear`]
/// followed by inserts) and queried concurrently at request time. All
/// access goes through a `tokio::sync::RwLock`, so request-path reads
/// run in parallel while ingestion holds exclusive write access only
/// for the duration of each mutation.
///
/// [`all`] iterates in insertion order, which the ingestion pipeline
/// makes lexical by filename; re-running ingestion over an unchanged
/// directory therefore reproduces an identical listing.
///
/// [`clear`]: Catalog::clear
/// [`all`]: Catalog::all
#[derive(Debug, Default)]
pub struct Catalog {
    inner: RwLock<CatalogInner>,
}

#[derive(Debug, Default)]
struct CatalogInner {
    by_name: HashMap<String, ImageRecord>,
    /// Insertion order of keys in `by_name`.
    order: Vec<String>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, overwriting any record with the same name.
    ///
    /// Last write wins on the record; the name keeps its original
    /// position in the listing order.
    pub async fn insert(&self, record: ImageRecord) {
        let mut inner = self.inner.write().await;
        if !inner.by_name.contains_key(&record.name) {
            inner.order.push(record.name.clone());
        }
        inner.by_name.insert(record.name.clone(), record);
    }

    /// Look up a record by exact, case-sensitive name.
    ///
    /// A miss is an absence, not an error; callers decide what a miss
    /// means for them.
    pub async fn find_by_name(&self, name: &str) -> Option<ImageRecord> {
        let inner = self.inner.read().await;
        inner.by_name.get(name).cloned()
    }

    /// All records in insertion order.
    pub async fn all(&self) -> Vec<ImageRecord> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|name| inner.by_name.get(name).cloned())
            .collect()
    }

    /// Remove every record.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.by_name.clear();
        inner.order.clear();
    }

    /// Number of cataloged records.
    pub async fn len(&self) -> usize {
        let inner = self.inner.read().await;
        inner.by_name.len()
    }

    /// Whether the catalog holds no records.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

// =============================================================================
// Tests
// =============================================================================
