//! Image catalog layer.
//!
//! The catalog is the queryable in-memory index of ingested images. It
//! is rebuilt from the file system on every startup by the ingestion
//! pipeline and read concurrently by the delivery service:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            IngestPipeline               │
//! │   (clear + insert, one run at a time)   │
//! └────────────────────┬────────────────────┘
//!                      │ writes
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │               Catalog                   │
//! │  (name-keyed records, insertion order)  │
//! └────────────────────┬────────────────────┘
//!                      │ reads
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            DeliveryService              │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Records hold metadata and a path, never pixel data; the delivery
//! service fetches bytes through an [`crate::source::ImageSource`] at
//! request time.

mod record;
mod store;

pub use record::{ImageExtension, ImageRecord};
pub use store::Catalog;
