//! Command line arguments.
//!
//! Every flag is optional; when given it overrides the matching config value.

use std::path::PathBuf;

use clap::Parser;
use renderer::TileFormat;

use crate::config::ProviderKind;

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "tiler")]
#[command(about = "Render world regions into multi-zoom tile pyramids")]
pub struct Args {
    /// Configuration file path (YAML)
    #[arg(short, long, env = "TILER_CONFIG")]
    pub config: Option<PathBuf>,

    /// World directory containing region/
    #[arg(short, long)]
    pub world: Option<PathBuf>,

    /// Output directory for tiles
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of zoom levels to render
    #[arg(short, long)]
    pub zoom_levels: Option<u32>,

    /// Tile quality (0-100, JPEG only)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub quality: Option<u8>,

    /// Tile format: jpeg or png
    #[arg(long)]
    pub format: Option<TileFormat>,

    /// Region source: anvil or synthetic
    #[arg(long)]
    pub provider: Option<ProviderKind>,

    /// Seed for the synthetic provider
    #[arg(long)]
    pub seed: Option<u64>,

    /// Render every region instead of only the first
    #[arg(long)]
    pub all_regions: bool,

    /// Render each zoom level's tiles in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Write tiles.json describing the output
    #[arg(long)]
    pub manifest: bool,

    /// Log level
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}
