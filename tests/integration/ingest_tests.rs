//! Ingestion integration tests.
//!
//! Tests verify:
//! - The startup scenario: JPEGs converted and indexed, other files
//!   removed from the source directory
//! - Full-rebuild semantics across repeated runs
//! - Case-insensitive extension gating
//! - Per-file failure isolation

use std::sync::Arc;

use tempfile::TempDir;

use progressive_streamer::{
    extract, is_progressive_jpeg, Catalog, IngestPipeline, ProgressiveConverter, SkipReason,
};

use super::test_utils::{create_baseline_jpeg, is_valid_jpeg};

fn pipeline(catalog: Arc<Catalog>, source: &TempDir, dest: &TempDir) -> IngestPipeline {
    IngestPipeline::new(
        catalog,
        ProgressiveConverter::new(),
        source.path(),
        dest.path(),
    )
}

#[tokio::test]
async fn test_startup_scenario() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let catalog = Arc::new(Catalog::new());

    std::fs::write(source.path().join("a.jpg"), create_baseline_jpeg(300, 200)).unwrap();
    std::fs::write(source.path().join("b.txt"), "no pixels here").unwrap();

    let report = pipeline(catalog.clone(), &source, &dest)
        .run()
        .await
        .unwrap();

    // Exactly one record, with the extracted dimensions
    assert_eq!(report.indexed, vec!["a.jpg"]);
    assert_eq!(catalog.len().await, 1);
    let record = catalog.find_by_name("a.jpg").await.unwrap();
    assert_eq!((record.width, record.height), (300, 200));

    // b.txt was removed from the source directory
    assert!(!source.path().join("b.txt").exists());

    // The progressive file exists, decodes, and is actually progressive
    let progressive = std::fs::read(dest.path().join("a.jpg")).unwrap();
    assert!(is_valid_jpeg(&progressive));
    assert!(is_progressive_jpeg(&progressive));
    let meta = extract(&progressive).unwrap();
    assert_eq!((meta.width, meta.height), (300, 200));
    assert_eq!(record.byte_size, progressive.len() as u64);
}

#[tokio::test]
async fn test_extension_gate_is_case_insensitive() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let catalog = Arc::new(Catalog::new());

    std::fs::write(source.path().join("upper.JPG"), create_baseline_jpeg(16, 16)).unwrap();
    std::fs::write(source.path().join("mixed.Jpeg"), create_baseline_jpeg(16, 16)).unwrap();

    let report = pipeline(catalog.clone(), &source, &dest)
        .run()
        .await
        .unwrap();

    assert_eq!(report.indexed_count(), 2);
    assert!(catalog.find_by_name("upper.JPG").await.is_some());
    assert!(catalog.find_by_name("mixed.Jpeg").await.is_some());
}

#[tokio::test]
async fn test_subdirectories_are_ignored() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let catalog = Arc::new(Catalog::new());

    std::fs::create_dir(source.path().join("nested")).unwrap();
    std::fs::write(
        source.path().join("nested").join("inner.jpg"),
        create_baseline_jpeg(8, 8),
    )
    .unwrap();
    std::fs::write(source.path().join("top.jpg"), create_baseline_jpeg(8, 8)).unwrap();

    let report = pipeline(catalog.clone(), &source, &dest)
        .run()
        .await
        .unwrap();

    assert_eq!(report.indexed, vec!["top.jpg"]);
    assert!(source.path().join("nested").join("inner.jpg").exists());
}

#[tokio::test]
async fn test_rebuild_replaces_previous_run() {
    let dest = TempDir::new().unwrap();
    let catalog = Arc::new(Catalog::new());

    let first_source = TempDir::new().unwrap();
    std::fs::write(
        first_source.path().join("first.jpg"),
        create_baseline_jpeg(10, 10),
    )
    .unwrap();
    pipeline(catalog.clone(), &first_source, &dest)
        .run()
        .await
        .unwrap();
    assert!(catalog.find_by_name("first.jpg").await.is_some());

    // A second run over a different source wipes the previous index,
    // even though first.jpg's progressive file still exists on disk.
    let second_source = TempDir::new().unwrap();
    std::fs::write(
        second_source.path().join("second.jpg"),
        create_baseline_jpeg(10, 10),
    )
    .unwrap();
    pipeline(catalog.clone(), &second_source, &dest)
        .run()
        .await
        .unwrap();

    assert!(catalog.find_by_name("first.jpg").await.is_none());
    assert!(catalog.find_by_name("second.jpg").await.is_some());
    assert_eq!(catalog.len().await, 1);
}

#[tokio::test]
async fn test_rerun_over_identical_input_reproduces_catalog() {
    let dest = TempDir::new().unwrap();
    let catalog = Arc::new(Catalog::new());
    let fixtures = [
        ("alpha.jpg", create_baseline_jpeg(60, 40)),
        ("beta.jpeg", create_baseline_jpeg(24, 24)),
    ];

    let mut listings = Vec::new();
    for _ in 0..2 {
        let source = TempDir::new().unwrap();
        for (name, bytes) in &fixtures {
            std::fs::write(source.path().join(name), bytes).unwrap();
        }
        pipeline(catalog.clone(), &source, &dest)
            .run()
            .await
            .unwrap();
        listings.push(catalog.all().await);
    }

    assert_eq!(listings[0], listings[1]);
    let names: Vec<&str> = listings[0].iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["alpha.jpg", "beta.jpeg"]);
}

#[tokio::test]
async fn test_bad_file_does_not_abort_batch() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let catalog = Arc::new(Catalog::new());

    std::fs::write(source.path().join("a.jpg"), create_baseline_jpeg(12, 12)).unwrap();
    std::fs::write(source.path().join("m.jpg"), b"garbage in the middle").unwrap();
    std::fs::write(source.path().join("z.jpg"), create_baseline_jpeg(12, 12)).unwrap();

    let report = pipeline(catalog.clone(), &source, &dest)
        .run()
        .await
        .unwrap();

    assert_eq!(report.indexed, vec!["a.jpg", "z.jpg"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "m.jpg");
    assert!(matches!(
        report.skipped[0].reason,
        SkipReason::ConversionFailed { .. }
    ));

    // The failed source stays put for inspection
    assert!(source.path().join("m.jpg").exists());
}

#[tokio::test]
async fn test_empty_source_directory_yields_empty_catalog() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let catalog = Arc::new(Catalog::new());

    let report = pipeline(catalog.clone(), &source, &dest)
        .run()
        .await
        .unwrap();

    assert_eq!(report.indexed_count(), 0);
    assert_eq!(report.skipped_count(), 0);
    assert!(catalog.is_empty().await);
}

#[tokio::test]
async fn test_many_files_with_bounded_workers() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let catalog = Arc::new(Catalog::new());

    let mut expected = Vec::new();
    for i in 0..12 {
        let name = format!("img{i:02}.jpg");
        std::fs::write(source.path().join(&name), create_baseline_jpeg(16, 16)).unwrap();
        expected.push(name);
    }

    let report = IngestPipeline::new(
        catalog.clone(),
        ProgressiveConverter::new(),
        source.path(),
        dest.path(),
    )
    .with_workers(3)
    .run()
    .await
    .unwrap();

    // Order stays lexical regardless of worker interleaving
    assert_eq!(report.indexed, expected);
    assert_eq!(catalog.len().await, 12);
}
