//! Ingestion pipeline.
//!
//! One-shot startup pass over a directory of baseline JPEGs: each file
//! is converted to progressive encoding, its metadata extracted, and a
//! record inserted into the catalog. Files the pipeline cannot handle
//! are skipped with a recorded reason; a single bad file never aborts
//! the batch.
//!
//! ```text
//! source dir ──▶ IngestPipeline ──▶ per file:
//!                    │                 ProgressiveConverter
//!                    │                 metadata::extract
//!                    │                 Catalog::insert
//!                    ▼
//!               IngestReport (indexed + skipped)
//! ```
//!
//! The catalog is cleared before every run: ingestion is a full
//! rebuild, never incremental.

mod pipeline;

pub use pipeline::{
    FileOutcome, IngestPipeline, IngestReport, SkipReason, SkippedFile, DEFAULT_INGEST_WORKERS,
};
