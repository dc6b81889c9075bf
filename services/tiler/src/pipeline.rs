//! Region discovery → grid loading → pyramid rendering.

use std::fs;
use std::path::{Path, PathBuf};

use region_reader::{AnvilProvider, RegionDataProvider, RegionId, SyntheticProvider};
use renderer::{Colorizer, LevelReport, TileEncoder, TileFormat, TilePyramidGenerator};
use serde::Serialize;
use tile_common::TilerResult;
use tracing::{error, info, warn};

use crate::config::{ProviderKind, RegionSelection, TilerConfig};

/// Name of the manifest written at the output root.
pub const MANIFEST_FILE: &str = "tiles.json";

/// A region whose pyramid was written.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedRegion {
    pub name: String,
    /// Tile tree root, relative to the output directory ("" for the root itself)
    pub tile_dir: String,
    pub tiles: usize,
    pub bytes: u64,
}

/// A region skipped because its data could not be decoded.
#[derive(Debug, Clone, Serialize)]
pub struct FailedRegion {
    pub name: String,
    pub error: String,
}

/// Outcome of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub rendered: Vec<RenderedRegion>,
    pub failed: Vec<FailedRegion>,
    pub levels: Vec<LevelReport>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn tiles_written(&self) -> usize {
        self.rendered.iter().map(|r| r.tiles).sum()
    }
}

/// Contents of `tiles.json`.
#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    pub format: TileFormat,
    pub extension: &'static str,
    pub quality: u8,
    pub base_edge: usize,
    pub levels: &'a [LevelReport],
    pub regions: &'a [RenderedRegion],
}

/// Build the region source named by the config.
pub fn build_provider(config: &TilerConfig) -> Box<dyn RegionDataProvider> {
    match config.provider {
        ProviderKind::Anvil => Box::new(AnvilProvider::new(config.heightmap)),
        ProviderKind::Synthetic => {
            Box::new(SyntheticProvider::new(config.seed).with_edge(config.base_edge))
        }
    }
}

/// Validate the config, then run the pipeline with the provider it names.
pub fn run(config: &TilerConfig) -> TilerResult<RunSummary> {
    config.validate()?;
    let provider = build_provider(config);
    run_with_provider(config, provider.as_ref())
}

/// Render the selected regions of `config.world_path` into `config.output_dir`.
///
/// Regions are listed before anything is written, so a missing region
/// directory leaves no output behind. Regions that fail to decode are logged
/// and recorded in the summary; every other error stops the run.
pub fn run_with_provider(
    config: &TilerConfig,
    provider: &dyn RegionDataProvider,
) -> TilerResult<RunSummary> {
    let regions = provider.list_regions(&config.world_path)?;

    fs::create_dir_all(&config.output_dir)?;

    let colorizer = Colorizer::new(&config.palette)?;
    let encoder = TileEncoder::new(config.tile_format, config.tile_quality)?;
    let generator = TilePyramidGenerator::new(colorizer, encoder).with_parallel(config.parallel);

    let selected: Vec<RegionId> = match config.regions {
        RegionSelection::First => regions.into_iter().take(1).collect(),
        RegionSelection::All => regions,
    };

    if selected.is_empty() {
        warn!(world = %config.world_path.display(), "No region files found");
    }

    info!(
        provider = provider.name(),
        regions = selected.len(),
        zoom_levels = config.zoom_levels,
        format = %config.tile_format,
        output = %config.output_dir.display(),
        "Rendering tile pyramids"
    );

    let mut summary = RunSummary::default();

    for region in &selected {
        let tile_dir = match config.regions {
            RegionSelection::First => PathBuf::new(),
            RegionSelection::All => PathBuf::from(region.stem()),
        };

        match render_region(config, provider, &generator, region, &tile_dir) {
            Ok(report) => {
                info!(
                    region = %region.name,
                    tiles = report.tiles_written(),
                    bytes = report.bytes_written,
                    "Rendered region"
                );
                summary.rendered.push(RenderedRegion {
                    name: region.name.clone(),
                    tile_dir: tile_dir.to_string_lossy().into_owned(),
                    tiles: report.tiles_written(),
                    bytes: report.bytes_written,
                });
                if summary.levels.is_empty() {
                    summary.levels = report.levels;
                }
            }
            Err(e) if e.is_region_scoped() => {
                error!(region = %region.name, error = %e, "Skipping region");
                summary.failed.push(FailedRegion {
                    name: region.name.clone(),
                    error: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    if config.write_manifest {
        write_manifest(config, &summary)?;
    }

    info!(
        rendered = summary.rendered.len(),
        failed = summary.failed.len(),
        tiles = summary.tiles_written(),
        "Run complete"
    );

    Ok(summary)
}

fn render_region(
    config: &TilerConfig,
    provider: &dyn RegionDataProvider,
    generator: &TilePyramidGenerator,
    region: &RegionId,
    tile_dir: &Path,
) -> TilerResult<renderer::PyramidReport> {
    let grid = provider.load_region(region)?;
    let root = config.output_dir.join(tile_dir);
    generator.generate(&grid, config.zoom_levels, config.base_edge, &root)
}

fn write_manifest(config: &TilerConfig, summary: &RunSummary) -> TilerResult<PathBuf> {
    let manifest = Manifest {
        format: config.tile_format,
        extension: config.tile_format.extension(),
        quality: config.tile_quality,
        base_edge: config.base_edge,
        levels: &summary.levels,
        regions: &summary.rendered,
    };

    let path = config.output_dir.join(MANIFEST_FILE);
    let json = serde_json::to_vec_pretty(&manifest)?;
    fs::write(&path, json)?;

    info!(path = %path.display(), "Wrote manifest");
    Ok(path)
}
