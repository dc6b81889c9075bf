//! Height grids for a single world region.

use crate::{TilerError, TilerResult};

/// Edge length of a region in cells (32 chunks of 16 columns).
pub const DEFAULT_REGION_EDGE: usize = 512;

/// A square grid of per-column height samples for one region.
///
/// Data is stored row-major: row `y` runs along the world Z axis and
/// column `x` along the world X axis. The grid is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionGrid {
    edge: usize,
    data: Vec<u8>,
}

impl RegionGrid {
    /// Create a grid from row-major data.
    pub fn new(edge: usize, data: Vec<u8>) -> TilerResult<Self> {
        if edge == 0 {
            return Err(TilerError::configuration("region grid edge must be positive"));
        }
        let expected = edge
            .checked_mul(edge)
            .ok_or_else(|| TilerError::configuration(format!("region edge {} too large", edge)))?;
        if data.len() != expected {
            return Err(TilerError::configuration(format!(
                "region grid of edge {} needs {} cells, got {}",
                edge,
                expected,
                data.len()
            )));
        }
        Ok(Self { edge, data })
    }

    /// Create a grid with every cell set to `value`.
    pub fn filled(edge: usize, value: u8) -> Self {
        Self {
            edge,
            data: vec![value; edge * edge],
        }
    }

    /// Edge length in cells.
    pub fn edge(&self) -> usize {
        self.edge
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.edge || y >= self.edge {
            return None;
        }
        Some(self.data[y * self.edge + x])
    }

    /// A full row of the grid.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.edge;
        &self.data[start..start + self.edge]
    }

    /// Raw row-major cells.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Copy out the square window whose top-left cell is (`x0`, `y0`).
    ///
    /// Rows `[y0, y0 + edge)` and columns `[x0, x0 + edge)` are returned in
    /// row-major order.
    pub fn crop(&self, x0: usize, y0: usize, edge: usize) -> TilerResult<Vec<u8>> {
        if edge == 0 || x0 + edge > self.edge || y0 + edge > self.edge {
            return Err(TilerError::configuration(format!(
                "crop {}x{} at ({}, {}) exceeds region edge {}",
                edge, edge, x0, y0, self.edge
            )));
        }

        let mut window = Vec::with_capacity(edge * edge);
        for y in y0..y0 + edge {
            window.extend_from_slice(&self.row(y)[x0..x0 + edge]);
        }
        Ok(window)
    }
}
