use anyhow::Context;
use clap::Parser;
use tiff_stack::config::Config;
use tiff_stack::image_pipeline::{FolderToTiffPipeline, WriteOutcome};
use tiff_stack::logger;

use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    logger::init(config.verbose);

    info!("Starting tiff-stack...");

    let pipeline = FolderToTiffPipeline::new(config.conversion_config())
        .context("Invalid conversion settings")?;

    info!("Compression: {}", pipeline.config().compression);
    if pipeline.config().compression.is_lossy() {
        info!("Quality: {}", pipeline.config().quality);
    } else {
        info!("Quality: ignored by {}", pipeline.config().compression);
    }
    info!("Color space: {}", pipeline.config().color_space);
    info!(
        "DPI: {} (default {})",
        pipeline.config().dpi_strategy,
        pipeline.config().default_dpi
    );

    let report = pipeline
        .process(&config.input, &config.output)
        .with_context(|| {
            format!(
                "Converting {} to {}",
                config.input.display(),
                config.output.display()
            )
        })?;

    if !report.skipped.is_empty() {
        warn!("{} file(s) could not be loaded and were skipped", report.skipped.len());
    }

    match report.outcome {
        WriteOutcome::Written { pages, .. } => info!(
            "Conversion completed. Output saved as {} ({} page(s)).",
            config.output.display(),
            pages
        ),
        WriteOutcome::EmptyBatch => info!(
            "Conversion completed. No images found in {}, nothing written.",
            config.input.display()
        ),
    }

    Ok(())
}
