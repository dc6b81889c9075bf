//! Tile coordinates and zoom level geometry.
//!
//! Tiles are positional, not geographic: zoom 0 is a single tile covering the
//! whole region, and each further level halves the tile edge.

use crate::{TilerError, TilerResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A tile coordinate (z/x/y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// File name inside the zoom directory, e.g. `3_5.jpg`.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}_{}.{}", self.x, self.y, extension)
    }

    /// Path relative to the output root, e.g. `2/3_1.jpg`.
    pub fn relative_path(&self, extension: &str) -> PathBuf {
        PathBuf::from(self.z.to_string()).join(self.file_name(extension))
    }

    /// Get the parent tile (zoom - 1).
    pub fn parent(&self) -> Option<TileCoord> {
        if self.z == 0 {
            return None;
        }
        Some(TileCoord {
            z: self.z - 1,
            x: self.x / 2,
            y: self.y / 2,
        })
    }

    /// Get the four children tiles (zoom + 1).
    pub fn children(&self) -> [TileCoord; 4] {
        let x = self.x * 2;
        let y = self.y * 2;
        let z = self.z + 1;
        [
            TileCoord { z, x, y },
            TileCoord { z, x: x + 1, y },
            TileCoord { z, x, y: y + 1 },
            TileCoord {
                z,
                x: x + 1,
                y: y + 1,
            },
        ]
    }
}

/// Geometry of one zoom level over a square region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomLevel {
    /// Zoom index (0 = one tile)
    pub zoom: u32,
    /// Tiles along each axis (2^zoom)
    pub tiles_per_axis: u32,
    /// Tile edge in cells/pixels
    pub tile_edge: usize,
}

impl ZoomLevel {
    /// Lay out zoom level `zoom` over a region of edge `base_edge`.
    ///
    /// Fails when the base edge is not divisible by `2^zoom` or the tile
    /// edge would be zero; tiles must cover the region with no gap.
    pub fn new(base_edge: usize, zoom: u32) -> TilerResult<Self> {
        let tiles_per_axis = 1u32.checked_shl(zoom).ok_or_else(|| {
            TilerError::configuration(format!("zoom level {} is out of range", zoom))
        })?;
        let tiles = tiles_per_axis as usize;

        if base_edge < tiles {
            return Err(TilerError::configuration(format!(
                "zoom {}: {} tiles per axis leaves zero-sized tiles on a {}-cell region",
                zoom, tiles, base_edge
            )));
        }
        if base_edge % tiles != 0 {
            return Err(TilerError::configuration(format!(
                "zoom {}: region edge {} is not divisible by {} tiles per axis",
                zoom, base_edge, tiles
            )));
        }

        Ok(Self {
            zoom,
            tiles_per_axis,
            tile_edge: base_edge / tiles,
        })
    }

    /// Number of tiles at this level.
    pub fn tile_count(&self) -> usize {
        (self.tiles_per_axis as usize).pow(2)
    }

    /// Top-left cell (column, row) of a tile.
    pub fn origin(&self, coord: &TileCoord) -> (usize, usize) {
        (
            coord.x as usize * self.tile_edge,
            coord.y as usize * self.tile_edge,
        )
    }

    /// All tile coordinates of the level, row by row with x varying fastest.
    pub fn tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        let n = self.tiles_per_axis;
        let z = self.zoom;
        (0..n).flat_map(move |y| (0..n).map(move |x| TileCoord { z, x, y }))
    }
}
