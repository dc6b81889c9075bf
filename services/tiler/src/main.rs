//! World tile renderer.
//!
//! Reads region files from a world directory and writes a multi-zoom tile
//! pyramid of colorized images per region.

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tiler::cli::Args;
use tiler::config::{LogFormat, LoggingConfig, TilerConfig};

fn main() -> Result<()> {
    let args = Args::parse();

    let config = TilerConfig::load(&args).context("Failed to load configuration")?;

    init_tracing(&config.logging)?;

    info!(
        world = %config.world_path.display(),
        output = %config.output_dir.display(),
        zoom_levels = config.zoom_levels,
        quality = config.tile_quality,
        provider = %config.provider,
        "Starting tiler"
    );

    let summary = tiler::run(&config).context("Tile rendering failed")?;

    if !summary.is_success() {
        let names: Vec<&str> = summary.failed.iter().map(|f| f.name.as_str()).collect();
        bail!("{} region(s) failed to render: {}", names.len(), names.join(", "));
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let level = match logging.level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    match logging.format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
    }

    Ok(())
}
