//! Tile image encoders.

use std::fmt;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::ColorType;
use serde::{Deserialize, Serialize};
use tile_common::{TilerError, TilerResult};

use crate::png;

/// JPEG quality used when none is configured.
pub const DEFAULT_QUALITY: u8 = 85;

/// Output image format of a tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileFormat {
    /// Lossy, the default
    #[default]
    Jpeg,
    /// Lossless, indexed when the tile fits in 256 colors
    Png,
}

impl TileFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            TileFormat::Jpeg => "jpg",
            TileFormat::Png => "png",
        }
    }
}

impl fmt::Display for TileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileFormat::Jpeg => write!(f, "jpeg"),
            TileFormat::Png => write!(f, "png"),
        }
    }
}

impl FromStr for TileFormat {
    type Err = TilerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(TileFormat::Jpeg),
            "png" => Ok(TileFormat::Png),
            other => Err(TilerError::configuration(format!(
                "unknown tile format '{}', expected jpeg or png",
                other
            ))),
        }
    }
}

/// Encodes packed RGB tiles into image bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileEncoder {
    format: TileFormat,
    quality: u8,
}

impl Default for TileEncoder {
    fn default() -> Self {
        Self {
            format: TileFormat::Jpeg,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl TileEncoder {
    /// `quality` must be in 0..=100; it only affects JPEG.
    pub fn new(format: TileFormat, quality: u8) -> TilerResult<Self> {
        if quality > 100 {
            return Err(TilerError::configuration(format!(
                "tile quality {} outside 0..=100",
                quality
            )));
        }
        Ok(Self { format, quality })
    }

    pub fn format(&self) -> TileFormat {
        self.format
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    /// Encode `width * height` packed RGB pixels.
    pub fn encode(&self, rgb: &[u8], width: usize, height: usize) -> TilerResult<Vec<u8>> {
        if rgb.len() != width * height * 3 {
            return Err(TilerError::encode(format!(
                "{} bytes of RGB data for a {}x{} tile",
                rgb.len(),
                width,
                height
            )));
        }

        match self.format {
            TileFormat::Jpeg => {
                let mut buf = Vec::new();
                // The encoder's scale is 1..=100
                let mut encoder = JpegEncoder::new_with_quality(&mut buf, self.quality.max(1));
                encoder
                    .encode(rgb, width as u32, height as u32, ColorType::Rgb8)
                    .map_err(|e| TilerError::encode(format!("JPEG encoding failed: {}", e)))?;
                Ok(buf)
            }
            TileFormat::Png => png::create_png_auto(rgb, width, height).map_err(TilerError::encode),
        }
    }
}
