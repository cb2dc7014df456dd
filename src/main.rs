//! Progressive Streamer - ingestion runner.
//!
//! This binary runs the startup ingestion pass: it re-encodes every
//! baseline JPEG in the source directory into progressive form, indexes
//! the results, and prints the run report as JSON. The delivery service
//! is library surface for whatever boundary embeds it.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use progressive_streamer::{Catalog, Config, IngestPipeline, ProgressiveConverter};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    // Tunable problems are reported but recovered with fallbacks;
    // nothing here is worth refusing to start over.
    if let Err(e) = config.validate() {
        warn!("Configuration problem: {e}");
        warn!("Continuing with conservative fallback values");
    }

    let thresholds = config.device_thresholds();
    let scales = config.scale_policy();

    info!("Configuration:");
    info!("  Source dir: {}", config.source_dir.display());
    info!("  Progressive dir: {}", config.progressive_dir.display());
    info!(
        "  Device classes: mobile <= {} px, tablet <= {} px, desktop above",
        thresholds.mobile_max_width(),
        thresholds.tablet_max_width()
    );
    info!(
        "  Scales: mobile {}, tablet {}, desktop {}",
        scales.factor_for(progressive_streamer::DeviceClass::Mobile),
        scales.factor_for(progressive_streamer::DeviceClass::Tablet),
        scales.factor_for(progressive_streamer::DeviceClass::Desktop)
    );
    info!("  Ingest workers: {}", config.ingest_workers);
    info!("  Delivery cache: {} bytes", config.cache_bytes);

    let catalog = Arc::new(Catalog::new());
    let pipeline = IngestPipeline::new(
        catalog.clone(),
        ProgressiveConverter::new(),
        config.source_dir.clone(),
        config.progressive_dir.clone(),
    )
    .with_workers(config.ingest_workers);

    let report = match pipeline.run().await {
        Ok(report) => report,
        Err(e) => {
            error!("Ingestion failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Ingestion complete: {} indexed, {} skipped",
        report.indexed_count(),
        report.skipped_count()
    );

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!("Failed to serialize ingest report: {e}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "progressive_streamer=debug"
    } else {
        "progressive_streamer=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
