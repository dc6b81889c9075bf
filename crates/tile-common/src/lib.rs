//! Common types and utilities shared across the world tile renderer.

pub mod error;
pub mod grid;
pub mod palette;
pub mod tile;

pub use error::{TilerError, TilerResult};
pub use grid::{RegionGrid, DEFAULT_REGION_EDGE};
pub use palette::{Color, ColorRule, PaletteConfig, PaletteError};
pub use tile::{TileCoord, ZoomLevel};
