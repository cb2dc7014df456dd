//! Delivery integration tests.
//!
//! Tests verify:
//! - End-to-end ingest-then-deliver over real files
//! - Classification boundaries feeding the right scale factor
//! - Byte-exact prefix truncation
//! - Response caching avoiding repeated store reads
//! - Explicit NotFound on unknown names and empty catalogs

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tempfile::TempDir;

use progressive_streamer::{
    Catalog, DeliveryError, DeliveryRequest, DeliveryService, DeviceClass, DeviceThresholds,
    FsImageSource, ImageExtension, ImageRecord, IngestPipeline, ProgressiveConverter, ScalePolicy,
};

use super::test_utils::{create_baseline_jpeg, TrackingMockSource};

/// Ingest a couple of fixture images and wire a delivery service over
/// the resulting progressive files.
async fn ingest_and_serve(
    thresholds: DeviceThresholds,
    scales: ScalePolicy,
) -> (Arc<Catalog>, DeliveryService<FsImageSource>, TempDir) {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let catalog = Arc::new(Catalog::new());

    std::fs::write(source.path().join("dawn.jpg"), create_baseline_jpeg(300, 200)).unwrap();
    std::fs::write(source.path().join("dusk.jpeg"), create_baseline_jpeg(120, 90)).unwrap();

    IngestPipeline::new(
        catalog.clone(),
        ProgressiveConverter::new(),
        source.path(),
        dest.path(),
    )
    .run()
    .await
    .unwrap();

    let service = DeliveryService::new(catalog.clone(), FsImageSource::new(), thresholds, scales);
    (catalog, service, dest)
}

#[tokio::test]
async fn test_end_to_end_mobile_truncation() {
    let thresholds = DeviceThresholds::new(500, 1000).unwrap();
    let scales = ScalePolicy::new(0.5, 0.75, 1.0).unwrap();
    let (catalog, service, dest) = ingest_and_serve(thresholds, scales).await;

    let record = catalog.find_by_name("dawn.jpg").await.unwrap();
    let full = std::fs::read(dest.path().join("dawn.jpg")).unwrap();
    assert_eq!(record.byte_size, full.len() as u64);

    let response = service
        .deliver(DeliveryRequest::new("dawn.jpg", 400))
        .await
        .unwrap();

    assert_eq!(response.device_class, DeviceClass::Mobile);
    assert_eq!(response.data.len(), full.len() / 2);
    // The payload is exactly the leading bytes of the stored file
    assert_eq!(&full[..response.data.len()], &response.data[..]);
}

#[tokio::test]
async fn test_classification_boundaries_end_to_end() {
    let thresholds = DeviceThresholds::new(500, 1000).unwrap();
    let scales = ScalePolicy::new(0.25, 0.5, 1.0).unwrap();
    let (_catalog, service, _dest) = ingest_and_serve(thresholds, scales).await;

    for (width, class, scale) in [
        (500, DeviceClass::Mobile, 0.25),
        (501, DeviceClass::Tablet, 0.5),
        (1000, DeviceClass::Tablet, 0.5),
        (1001, DeviceClass::Desktop, 1.0),
    ] {
        let response = service
            .deliver(DeliveryRequest::new("dawn.jpg", width))
            .await
            .unwrap();
        assert_eq!(response.device_class, class, "width {width}");
        assert_eq!(response.scale, scale, "width {width}");
    }
}

#[tokio::test]
async fn test_desktop_payload_is_byte_identical_file() {
    let (_catalog, service, dest) =
        ingest_and_serve(DeviceThresholds::default(), ScalePolicy::default()).await;

    let response = service
        .deliver(DeliveryRequest::new("dusk.jpeg", 1920))
        .await
        .unwrap();

    let on_disk = std::fs::read(dest.path().join("dusk.jpeg")).unwrap();
    assert_eq!(&response.data[..], &on_disk[..]);
}

#[tokio::test]
async fn test_unknown_image_is_not_found() {
    let (_catalog, service, _dest) =
        ingest_and_serve(DeviceThresholds::default(), ScalePolicy::default()).await;

    let err = service
        .deliver(DeliveryRequest::new("nope.jpg", 400))
        .await
        .unwrap_err();

    match err {
        DeliveryError::NotFound { name } => assert_eq!(name, "nope.jpg"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_stem_request_resolves_and_reports_real_name() {
    let (_catalog, service, _dest) =
        ingest_and_serve(DeviceThresholds::default(), ScalePolicy::default()).await;

    let response = service
        .deliver(DeliveryRequest::new("dusk", 400))
        .await
        .unwrap();
    assert_eq!(response.name, "dusk.jpeg");
}

#[tokio::test]
async fn test_empty_catalog_never_crashes() {
    let catalog = Arc::new(Catalog::new());
    let service = DeliveryService::new(
        catalog,
        FsImageSource::new(),
        DeviceThresholds::default(),
        ScalePolicy::default(),
    );

    for name in ["a.jpg", "b.jpeg", ""] {
        let result = service.deliver(DeliveryRequest::new(name, 800)).await;
        assert!(matches!(result, Err(DeliveryError::NotFound { .. })));
    }
}

#[tokio::test]
async fn test_cache_prevents_repeated_store_reads() {
    let catalog = Arc::new(Catalog::new());
    catalog
        .insert(ImageRecord {
            name: "dawn.jpg".to_string(),
            path: PathBuf::from("/store/dawn.jpg"),
            extension: ImageExtension::Jpg,
            width: 300,
            height: 200,
            byte_size: 10_000,
        })
        .await;

    let source = TrackingMockSource::new().with_file("/store/dawn.jpg", vec![7u8; 10_000]);
    let reads = source.counter();

    let service = DeliveryService::new(
        catalog,
        source,
        DeviceThresholds::default(),
        ScalePolicy::default(),
    );

    let first = service
        .deliver(DeliveryRequest::new("dawn.jpg", 400))
        .await
        .unwrap();
    assert!(!first.cache_hit);
    assert_eq!(reads.load(Ordering::SeqCst), 1);

    let second = service
        .deliver(DeliveryRequest::new("dawn.jpg", 400))
        .await
        .unwrap();
    assert!(second.cache_hit);
    assert_eq!(reads.load(Ordering::SeqCst), 1);
    assert_eq!(first.data, second.data);

    // A different class is a different payload and a fresh read
    service
        .deliver(DeliveryRequest::new("dawn.jpg", 2000))
        .await
        .unwrap();
    assert_eq!(reads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_vanished_file_is_source_error() {
    let (catalog, service, dest) =
        ingest_and_serve(DeviceThresholds::default(), ScalePolicy::default()).await;

    assert!(catalog.find_by_name("dawn.jpg").await.is_some());
    std::fs::remove_file(dest.path().join("dawn.jpg")).unwrap();

    let err = service
        .deliver(DeliveryRequest::new("dawn.jpg", 400))
        .await
        .unwrap_err();
    assert!(matches!(err, DeliveryError::Source(_)));
}

#[tokio::test]
async fn test_generous_timeout_still_succeeds() {
    let (_catalog, service, _dest) =
        ingest_and_serve(DeviceThresholds::default(), ScalePolicy::default()).await;

    let request =
        DeliveryRequest::new("dawn.jpg", 400).with_timeout(Duration::from_secs(5));
    let response = service.deliver(request).await.unwrap();
    assert!(!response.data.is_empty());
}

#[tokio::test]
async fn test_concurrent_requests() {
    let thresholds = DeviceThresholds::new(500, 1000).unwrap();
    let scales = ScalePolicy::new(0.5, 0.75, 1.0).unwrap();
    let (_catalog, service, _dest) = ingest_and_serve(thresholds, scales).await;
    let service = Arc::new(service);

    let mut handles = Vec::new();
    for i in 0..16u32 {
        let service = service.clone();
        let width = 100 + i * 100;
        handles.push(tokio::spawn(async move {
            service
                .deliver(DeliveryRequest::new("dawn.jpg", width))
                .await
        }));
    }

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert!(!response.data.is_empty());
    }
}
