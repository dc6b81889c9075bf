//! Multi-zoom tile pyramid generation.
//!
//! Zoom level `z` splits the region into `2^z x 2^z` square tiles, so every
//! level covers the full grid at a different tile size. Tiles are written to
//! `<output_root>/<z>/<x>_<y>.<ext>`.

use std::fs;
use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;
use tile_common::{RegionGrid, TileCoord, TilerError, TilerResult, ZoomLevel};
use tracing::{debug, info};

use crate::colorize::Colorizer;
use crate::encode::TileEncoder;

/// What was rendered for one zoom level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelReport {
    pub zoom: u32,
    pub tiles_per_axis: u32,
    pub tile_edge: usize,
    pub tiles_written: usize,
}

/// What a `generate` call wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PyramidReport {
    pub levels: Vec<LevelReport>,
    pub bytes_written: u64,
}

impl PyramidReport {
    pub fn tiles_written(&self) -> usize {
        self.levels.iter().map(|l| l.tiles_written).sum()
    }
}

/// Crops, colorizes and encodes every tile of every zoom level.
#[derive(Debug, Clone, Default)]
pub struct TilePyramidGenerator {
    colorizer: Colorizer,
    encoder: TileEncoder,
    parallel: bool,
}

impl TilePyramidGenerator {
    pub fn new(colorizer: Colorizer, encoder: TileEncoder) -> Self {
        Self {
            colorizer,
            encoder,
            parallel: false,
        }
    }

    /// Render the tiles of each level on the rayon pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn encoder(&self) -> &TileEncoder {
        &self.encoder
    }

    /// Write zoom levels `0..zoom_levels` of `grid` under `output_root`.
    ///
    /// Each level is validated before any of its tiles are written. A level
    /// whose tile count does not divide `base_edge` fails the call, leaving
    /// the earlier levels on disk. Existing tiles are overwritten.
    pub fn generate(
        &self,
        grid: &RegionGrid,
        zoom_levels: u32,
        base_edge: usize,
        output_root: &Path,
    ) -> TilerResult<PyramidReport> {
        if base_edge != grid.edge() {
            return Err(TilerError::configuration(format!(
                "base edge {} does not match region edge {}",
                base_edge,
                grid.edge()
            )));
        }

        let mut report = PyramidReport::default();

        for zoom in 0..zoom_levels {
            let level = ZoomLevel::new(base_edge, zoom)?;
            let level_dir = output_root.join(zoom.to_string());
            fs::create_dir_all(&level_dir)?;

            let coords: Vec<TileCoord> = level.tiles().collect();
            let sizes: Vec<u64> = if self.parallel {
                coords
                    .par_iter()
                    .map(|coord| self.render_tile(grid, &level, coord, &level_dir))
                    .collect::<TilerResult<_>>()?
            } else {
                coords
                    .iter()
                    .map(|coord| self.render_tile(grid, &level, coord, &level_dir))
                    .collect::<TilerResult<_>>()?
            };

            info!(
                zoom,
                tiles = sizes.len(),
                tile_edge = level.tile_edge,
                dir = %level_dir.display(),
                "Rendered zoom level"
            );

            report.bytes_written += sizes.iter().sum::<u64>();
            report.levels.push(LevelReport {
                zoom,
                tiles_per_axis: level.tiles_per_axis,
                tile_edge: level.tile_edge,
                tiles_written: sizes.len(),
            });
        }

        Ok(report)
    }

    fn render_tile(
        &self,
        grid: &RegionGrid,
        level: &ZoomLevel,
        coord: &TileCoord,
        level_dir: &Path,
    ) -> TilerResult<u64> {
        let (x0, y0) = level.origin(coord);
        let cells = grid.crop(x0, y0, level.tile_edge)?;
        let rgb = self.colorizer.colorize_buffer(&cells);
        let bytes = self.encoder.encode(&rgb, level.tile_edge, level.tile_edge)?;

        let path = level_dir.join(coord.file_name(self.encoder.extension()));
        fs::write(&path, &bytes)?;

        debug!(z = coord.z, x = coord.x, y = coord.y, bytes = bytes.len(), "Wrote tile");
        Ok(bytes.len() as u64)
    }
}
