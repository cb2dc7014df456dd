//! The ingestion pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::fs;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::catalog::{Catalog, ImageExtension, ImageRecord};
use crate::error::IngestError;
use crate::format::{extract, ProgressiveConverter};

/// Default number of concurrent conversion workers.
pub const DEFAULT_INGEST_WORKERS: usize = 4;

// =============================================================================
// Outcomes and Report
// =============================================================================

/// Why a file was skipped during ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Extension is not `jpg`/`jpeg`
    UnsupportedExtension,

    /// The file could not be converted to progressive encoding
    ConversionFailed { message: String },

    /// The converted bytes yielded no usable metadata
    MetadataFailed { message: String },
}

/// Terminal outcome of a single file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Converted, measured, and inserted into the catalog
    Indexed(ImageRecord),

    /// Left out of the catalog for the recorded reason
    Skipped(SkipReason),
}

/// A skipped file and the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub name: String,
    pub reason: SkipReason,
}

/// Summary of one ingestion run.
///
/// File names appear in the order they were processed (lexical by
/// filename), matching the catalog's insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    /// Names of files now present in the catalog
    pub indexed: Vec<String>,

    /// Files left out, with reasons
    pub skipped: Vec<SkippedFile>,
}

impl IngestReport {
    /// Number of indexed files.
    pub fn indexed_count(&self) -> usize {
        self.indexed.len()
    }

    /// Number of skipped files.
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

// =============================================================================
// Ingest Pipeline
// =============================================================================

/// One-shot ingestion of a directory of baseline JPEGs.
///
/// Each run clears the catalog and rebuilds it from the source
/// directory: supported files are converted to progressive encoding
/// (written to the progressive directory, source deleted after a
/// synced write), measured, and indexed. Unsupported files are deleted
/// unless protected (dotfiles, `.log`). Per-file failures are recorded
/// and never abort the batch.
///
/// Runs are serialized by an internal mutex; conversions within a run
/// execute on up to `workers` concurrent tasks, while catalog inserts
/// and the report keep lexical filename order deterministic.
pub struct IngestPipeline {
    catalog: Arc<Catalog>,
    converter: ProgressiveConverter,
    source_dir: PathBuf,
    progressive_dir: PathBuf,
    workers: usize,
    run_guard: Mutex<()>,
}

/// A file discovered in the source directory.
struct SourceEntry {
    name: String,
    path: PathBuf,
}

impl IngestPipeline {
    /// Create a pipeline with the default worker count.
    pub fn new(
        catalog: Arc<Catalog>,
        converter: ProgressiveConverter,
        source_dir: impl Into<PathBuf>,
        progressive_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalog,
            converter,
            source_dir: source_dir.into(),
            progressive_dir: progressive_dir.into(),
            workers: DEFAULT_INGEST_WORKERS,
            run_guard: Mutex::new(()),
        }
    }

    /// Set the maximum number of concurrent conversion workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Run a full ingestion pass.
    ///
    /// # Errors
    ///
    /// Only whole-batch failures surface here (an unreadable source
    /// directory, an uncreatable progressive directory). Per-file
    /// failures are recorded in the report.
    pub async fn run(&self) -> Result<IngestReport, IngestError> {
        let _guard = self.run_guard.lock().await;

        let entries = self.collect_entries().await?;

        fs::create_dir_all(&self.progressive_dir)
            .await
            .map_err(|e| IngestError::ProgressiveDir {
                path: self.progressive_dir.display().to_string(),
                source: e,
            })?;

        // Full rebuild: nothing from a previous run survives.
        self.catalog.clear().await;
        info!(
            source = %self.source_dir.display(),
            files = entries.len(),
            "rebuilding image catalog"
        );

        let mut outcomes: Vec<Option<FileOutcome>> = vec![None; entries.len()];
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks: JoinSet<(usize, FileOutcome)> = JoinSet::new();

        for (idx, entry) in entries.iter().enumerate() {
            match ImageExtension::from_path(&entry.path) {
                None => {
                    self.discard_unsupported(entry).await;
                    outcomes[idx] = Some(FileOutcome::Skipped(SkipReason::UnsupportedExtension));
                }
                Some(extension) => {
                    let converter = self.converter.clone();
                    let semaphore = semaphore.clone();
                    let source = entry.path.clone();
                    let dest = self.progressive_dir.join(&entry.name);
                    let name = entry.name.clone();

                    tasks.spawn(async move {
                        // The semaphore is never closed; a failed acquire
                        // only means we run without the permit
                        let _permit = semaphore.acquire_owned().await.ok();
                        let outcome = convert_one(&converter, &source, &dest, name, extension).await;
                        (idx, outcome)
                    });
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, outcome)) => outcomes[idx] = Some(outcome),
                Err(e) => error!(error = %e, "conversion worker failed"),
            }
        }

        // Merge in lexical order so catalog order and report order are
        // reproducible run over run.
        let mut report = IngestReport::default();
        for (entry, outcome) in entries.iter().zip(outcomes) {
            match outcome {
                Some(FileOutcome::Indexed(record)) => {
                    info!(
                        name = %record.name,
                        width = record.width,
                        height = record.height,
                        bytes = record.byte_size,
                        "indexed progressive image"
                    );
                    report.indexed.push(record.name.clone());
                    self.catalog.insert(record).await;
                }
                Some(FileOutcome::Skipped(reason)) => {
                    report.skipped.push(SkippedFile {
                        name: entry.name.clone(),
                        reason,
                    });
                }
                None => {
                    // Worker panicked; treat like any other conversion failure
                    report.skipped.push(SkippedFile {
                        name: entry.name.clone(),
                        reason: SkipReason::ConversionFailed {
                            message: "conversion worker did not complete".to_string(),
                        },
                    });
                }
            }
        }

        info!(
            indexed = report.indexed_count(),
            skipped = report.skipped_count(),
            "ingestion run complete"
        );

        Ok(report)
    }

    /// List the source directory's files in lexical filename order.
    async fn collect_entries(&self) -> Result<Vec<SourceEntry>, IngestError> {
        let source_dir_error = |e: std::io::Error| IngestError::SourceDir {
            path: self.source_dir.display().to_string(),
            source: e,
        };

        let mut dir = fs::read_dir(&self.source_dir)
            .await
            .map_err(source_dir_error)?;

        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(source_dir_error)? {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            entries.push(SourceEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                path: entry.path(),
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Remove an unsupported file from the source directory, unless it
    /// is protected.
    async fn discard_unsupported(&self, entry: &SourceEntry) {
        if is_protected(&entry.name) {
            warn!(name = %entry.name, "unsupported file left in place");
            return;
        }

        match fs::remove_file(&entry.path).await {
            Ok(()) => warn!(name = %entry.name, "unsupported file removed from source directory"),
            Err(e) => {
                warn!(name = %entry.name, error = %e, "unsupported file could not be removed")
            }
        }
    }
}

/// Whether an unsupported file is exempt from deletion.
fn is_protected(name: &str) -> bool {
    if name.starts_with('.') {
        return true;
    }
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("log"))
        .unwrap_or(false)
}

/// Convert one file and build its record.
async fn convert_one(
    converter: &ProgressiveConverter,
    source: &Path,
    dest: &Path,
    name: String,
    extension: ImageExtension,
) -> FileOutcome {
    let bytes = match converter.convert_file(source, dest).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(name = %name, error = %e, "conversion failed, file left untouched");
            return FileOutcome::Skipped(SkipReason::ConversionFailed {
                message: e.to_string(),
            });
        }
    };

    match extract(&bytes) {
        Ok(meta) => FileOutcome::Indexed(ImageRecord {
            name,
            path: dest.to_path_buf(),
            extension,
            width: meta.width,
            height: meta.height,
            byte_size: meta.byte_size,
        }),
        Err(e) => {
            error!(name = %name, error = %e, "metadata extraction failed");
            FileOutcome::Skipped(SkipReason::MetadataFailed {
                message: e.to_string(),
            })
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
