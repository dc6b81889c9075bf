//! Category colorization of cell values.

use tile_common::{PaletteConfig, TilerResult};

/// Maps cell values to RGB through a palette.
///
/// A value selects category `value % palette_size`; the category's rule color
/// is used, or the palette's default color when no rule covers it. With the
/// default palette only categories 0..4 are reachable, so the rule for 255
/// never fires and category 3 renders black.
///
/// All 256 possible values are resolved up front, so colorizing a buffer is a
/// single table lookup per cell.
#[derive(Debug, Clone)]
pub struct Colorizer {
    lut: [[u8; 3]; 256],
    palette_size: usize,
}

impl Colorizer {
    /// Build a colorizer, validating the palette first.
    pub fn new(palette: &PaletteConfig) -> TilerResult<Self> {
        palette.validate()?;
        Ok(Self::build(palette))
    }

    fn build(palette: &PaletteConfig) -> Self {
        let palette_size = palette.palette_size();
        let mut lut = [[0u8; 3]; 256];
        for (value, slot) in lut.iter_mut().enumerate() {
            *slot = palette.lookup((value % palette_size) as u8);
        }
        Self { lut, palette_size }
    }

    pub fn palette_size(&self) -> usize {
        self.palette_size
    }

    /// Color of a single cell value.
    #[inline]
    pub fn colorize(&self, value: u8) -> [u8; 3] {
        self.lut[value as usize]
    }

    /// Colorize a buffer of cell values into packed RGB.
    pub fn colorize_buffer(&self, cells: &[u8]) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(cells.len() * 3);
        for &value in cells {
            rgb.extend_from_slice(&self.lut[value as usize]);
        }
        rgb
    }

    /// Every color this colorizer can produce, in order of the first value
    /// producing it.
    pub fn distinct_colors(&self) -> Vec<[u8; 3]> {
        let mut colors: Vec<[u8; 3]> = Vec::new();
        for color in &self.lut {
            if !colors.contains(color) {
                colors.push(*color);
            }
        }
        colors
    }
}

impl Default for Colorizer {
    fn default() -> Self {
        Self::build(&PaletteConfig::default())
    }
}
