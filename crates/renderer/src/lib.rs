//! Tile rendering for region grids.
//!
//! - Palette colorization through a precomputed lookup table
//! - JPEG and indexed PNG tile encoding
//! - Multi-zoom pyramid generation

pub mod colorize;
pub mod encode;
pub mod png;
pub mod pyramid;

pub use colorize::Colorizer;
pub use encode::{TileEncoder, TileFormat, DEFAULT_QUALITY};
pub use pyramid::{LevelReport, PyramidReport, TilePyramidGenerator};
