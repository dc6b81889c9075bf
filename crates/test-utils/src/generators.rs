//! Grid generators for creating predictable region data.
//!
//! These generators create verifiable cell patterns that can be used across
//! the test suite.

use tile_common::RegionGrid;

/// Creates a grid with every cell set to `value`.
///
/// # Arguments
///
/// * `edge` - Edge length in cells
/// * `value` - Value of every cell
pub fn uniform_grid(edge: usize, value: u8) -> RegionGrid {
    RegionGrid::filled(edge, value)
}

/// Creates a grid where one cell differs from the background.
///
/// # Arguments
///
/// * `edge` - Edge length in cells
/// * `x`, `y` - Column and row of the marked cell
/// * `value` - Value of the marked cell
/// * `background` - Value of every other cell
///
/// # Example
///
/// ```
/// use test_utils::single_cell_grid;
///
/// let grid = single_cell_grid(8, 0, 0, 0, 1);
/// assert_eq!(grid.get(0, 0), Some(0));
/// assert_eq!(grid.get(1, 0), Some(1));
/// ```
pub fn single_cell_grid(edge: usize, x: usize, y: usize, value: u8, background: u8) -> RegionGrid {
    let mut data = vec![background; edge * edge];
    data[y * edge + x] = value;
    RegionGrid::new(edge, data).expect("generated grid matches its edge")
}

/// Creates a grid where each cell is `(x + y) % 256`.
///
/// Makes it easy to check that crops land in the right place, since the
/// value identifies the cell's diagonal.
pub fn diagonal_grid(edge: usize) -> RegionGrid {
    let data = (0..edge * edge)
        .map(|i| ((i % edge + i / edge) % 256) as u8)
        .collect();
    RegionGrid::new(edge, data).expect("generated grid matches its edge")
}

/// Creates 256 column heights for one chunk, `base + x + z`.
pub fn chunk_heights(base: u32) -> Vec<u32> {
    (0..256).map(|i| base + (i % 16) as u32 + (i / 16) as u32).collect()
}
