//! Anvil region file decoding.
//!
//! Region file layout:
//! - 1024 location entries (3-byte sector offset, 1-byte sector count),
//!   ordered by (Z, X)
//! - 1024 big-endian timestamps
//! - 4 KiB sectors holding `length: u32`, `compression: u8`, payload
//!
//! Only chunk heightmaps are decoded; they are stitched into a 512x512
//! [`RegionGrid`].

use std::fs;
use std::io::Read;
use std::path::Path;

use fastnbt::LongArray;
use flate2::read::{GzDecoder, ZlibDecoder};
use serde::{Deserialize, Serialize};
use tile_common::{RegionGrid, DEFAULT_REGION_EDGE};
use tracing::{debug, trace};

use crate::error::{RegionError, RegionResult};
use crate::heightmap::{unpack_heightmap, HeightmapKind};

/// Bytes per sector.
pub const SECTOR_SIZE: usize = 4096;
/// Chunks along each region axis.
pub const REGION_CHUNKS_PER_AXIS: usize = 32;
/// Columns along each chunk axis.
pub const CHUNK_EDGE: usize = 16;
/// Location table plus timestamp table.
pub const HEADER_SIZE: usize = 2 * SECTOR_SIZE;

const CHUNK_COUNT: usize = REGION_CHUNKS_PER_AXIS * REGION_CHUNKS_PER_AXIS;

/// Chunk payload compression schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Zlib,
    Uncompressed,
}

impl Compression {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(Compression::Gzip),
            2 => Some(Compression::Zlib),
            3 => Some(Compression::Uncompressed),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Compression::Gzip => 1,
            Compression::Zlib => 2,
            Compression::Uncompressed => 3,
        }
    }
}

/// The parts of a chunk's root compound needed to build a height grid.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChunkNbt {
    #[serde(rename = "DataVersion", default, skip_serializing_if = "Option::is_none")]
    pub data_version: Option<i32>,

    #[serde(rename = "xPos", default, skip_serializing_if = "Option::is_none")]
    pub x_pos: Option<i32>,

    #[serde(rename = "zPos", default, skip_serializing_if = "Option::is_none")]
    pub z_pos: Option<i32>,

    #[serde(rename = "Heightmaps", default, skip_serializing_if = "Option::is_none")]
    pub heightmaps: Option<Heightmaps>,

    /// Pre-1.18 chunks nest everything under `Level`
    #[serde(rename = "Level", default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LegacyLevel>,
}

impl ChunkNbt {
    /// The requested heightmap, wherever the chunk version keeps it.
    pub fn heightmap(&self, kind: HeightmapKind) -> Option<&LongArray> {
        self.heightmaps
            .as_ref()
            .or_else(|| self.level.as_ref().and_then(|l| l.heightmaps.as_ref()))
            .and_then(|h| h.get(kind))
    }
}

/// Legacy `Level` compound.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LegacyLevel {
    #[serde(rename = "Heightmaps", default, skip_serializing_if = "Option::is_none")]
    pub heightmaps: Option<Heightmaps>,
}

/// A chunk's `Heightmaps` compound.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Heightmaps {
    #[serde(rename = "WORLD_SURFACE", default, skip_serializing_if = "Option::is_none")]
    pub world_surface: Option<LongArray>,

    #[serde(rename = "MOTION_BLOCKING", default, skip_serializing_if = "Option::is_none")]
    pub motion_blocking: Option<LongArray>,

    #[serde(rename = "OCEAN_FLOOR", default, skip_serializing_if = "Option::is_none")]
    pub ocean_floor: Option<LongArray>,
}

impl Heightmaps {
    pub fn get(&self, kind: HeightmapKind) -> Option<&LongArray> {
        match kind {
            HeightmapKind::WorldSurface => self.world_surface.as_ref(),
            HeightmapKind::MotionBlocking => self.motion_blocking.as_ref(),
            HeightmapKind::OceanFloor => self.ocean_floor.as_ref(),
        }
    }
}

/// An in-memory region file.
pub struct AnvilRegion {
    data: Vec<u8>,
}

impl AnvilRegion {
    /// Read a region file from disk.
    pub fn open(path: impl AsRef<Path>) -> RegionResult<Self> {
        Self::from_bytes(fs::read(path)?)
    }

    /// Wrap raw region file bytes.
    pub fn from_bytes(data: Vec<u8>) -> RegionResult<Self> {
        if data.len() < HEADER_SIZE {
            return Err(RegionError::TruncatedHeader(data.len()));
        }
        Ok(Self { data })
    }

    /// Sector offset and sector count of a chunk, `None` if never generated.
    pub fn location(&self, x: usize, z: usize) -> Option<(usize, usize)> {
        let entry = 4 * (x + z * REGION_CHUNKS_PER_AXIS);
        let bytes = &self.data[entry..entry + 4];
        let offset = u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]) as usize;
        let sectors = bytes[3] as usize;

        if offset == 0 && sectors == 0 {
            None
        } else {
            Some((offset, sectors))
        }
    }

    /// Decompressed NBT payload of the chunk at local (`x`, `z`).
    pub fn chunk_payload(&self, x: usize, z: usize) -> RegionResult<Option<Vec<u8>>> {
        let (offset, sectors) = match self.location(x, z) {
            Some(location) => location,
            None => return Ok(None),
        };

        let out_of_bounds = |reason: String| RegionError::SectorOutOfBounds { x, z, reason };

        if offset < HEADER_SIZE / SECTOR_SIZE {
            return Err(out_of_bounds(format!("sector {} overlaps the header", offset)));
        }

        let start = offset * SECTOR_SIZE;
        if start + 5 > self.data.len() {
            return Err(out_of_bounds(format!(
                "sector {} starts past end of file ({} bytes)",
                offset,
                self.data.len()
            )));
        }

        let header = &self.data[start..start + 5];
        let length = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let scheme = header[4];

        if length < 1 {
            return Err(out_of_bounds("zero-length chunk".to_string()));
        }
        let end = start + 4 + length;
        if end > self.data.len() || length + 4 > sectors.max(1) * SECTOR_SIZE {
            return Err(out_of_bounds(format!(
                "{} byte payload exceeds {} allocated sectors",
                length, sectors
            )));
        }

        let compression =
            Compression::from_byte(scheme).ok_or(RegionError::UnknownCompression { x, z, scheme })?;
        let compressed = &self.data[start + 5..end];

        let mut payload = Vec::new();
        let result = match compression {
            Compression::Zlib => ZlibDecoder::new(compressed).read_to_end(&mut payload),
            Compression::Gzip => GzDecoder::new(compressed).read_to_end(&mut payload),
            Compression::Uncompressed => {
                payload.extend_from_slice(compressed);
                Ok(payload.len())
            }
        };
        result.map_err(|source| RegionError::Decompress { x, z, source })?;

        trace!(x, z, bytes = payload.len(), ?compression, "Read chunk payload");
        Ok(Some(payload))
    }

    /// Parsed root compound of a chunk.
    pub fn chunk(&self, x: usize, z: usize) -> RegionResult<Option<ChunkNbt>> {
        let payload = match self.chunk_payload(x, z)? {
            Some(payload) => payload,
            None => return Ok(None),
        };

        fastnbt::from_bytes::<ChunkNbt>(&payload)
            .map(Some)
            .map_err(|e| RegionError::Nbt {
                x,
                z,
                message: e.to_string(),
            })
    }

    /// Stitch every chunk's heightmap into a region-wide grid.
    ///
    /// Heights are clamped to 0..=255. Missing chunks and chunks without the
    /// requested heightmap stay at zero.
    pub fn height_grid(&self, kind: HeightmapKind) -> RegionResult<RegionGrid> {
        let edge = DEFAULT_REGION_EDGE;
        let mut cells = vec![0u8; edge * edge];
        let mut chunks_read = 0usize;

        for index in 0..CHUNK_COUNT {
            let (cx, cz) = (index % REGION_CHUNKS_PER_AXIS, index / REGION_CHUNKS_PER_AXIS);

            let chunk = match self.chunk(cx, cz)? {
                Some(chunk) => chunk,
                None => continue,
            };
            let packed = match chunk.heightmap(kind) {
                Some(packed) => packed,
                None => {
                    debug!(x = cx, z = cz, heightmap = kind.nbt_key(), "Chunk has no heightmap");
                    continue;
                }
            };

            let heights = unpack_heightmap(packed)?;
            for (column, height) in heights.iter().enumerate() {
                let gx = cx * CHUNK_EDGE + column % CHUNK_EDGE;
                let gz = cz * CHUNK_EDGE + column / CHUNK_EDGE;
                cells[gz * edge + gx] = (*height).min(u8::MAX as u32) as u8;
            }
            chunks_read += 1;
        }

        debug!(chunks = chunks_read, heightmap = kind.nbt_key(), "Decoded region heightmaps");

        RegionGrid::new(edge, cells)
            .map_err(|e| RegionError::Heightmap(format!("region grid assembly failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_with_entry(x: usize, z: usize, offset: u32, sectors: u8) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_SIZE];
        let entry = 4 * (x + z * REGION_CHUNKS_PER_AXIS);
        data[entry..entry + 3].copy_from_slice(&offset.to_be_bytes()[1..]);
        data[entry + 3] = sectors;
        data
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(
            AnvilRegion::from_bytes(vec![0; 100]),
            Err(RegionError::TruncatedHeader(100))
        ));
    }

    #[test]
    fn test_empty_region_has_no_chunks() {
        let region = AnvilRegion::from_bytes(vec![0; HEADER_SIZE]).unwrap();
        assert!(region.location(0, 0).is_none());
        assert!(region.chunk(31, 31).unwrap().is_none());

        let grid = region.height_grid(HeightmapKind::WorldSurface).unwrap();
        assert_eq!(grid.edge(), 512);
        assert!(grid.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_location_is_ordered_by_z_then_x() {
        let region = AnvilRegion::from_bytes(header_with_entry(3, 2, 0x010203, 7)).unwrap();
        assert_eq!(region.location(3, 2), Some((0x010203, 7)));
        assert_eq!(region.location(2, 3), None);
    }

    #[test]
    fn test_sector_in_header_is_rejected() {
        let region = AnvilRegion::from_bytes(header_with_entry(0, 0, 1, 1)).unwrap();
        assert!(matches!(
            region.chunk_payload(0, 0),
            Err(RegionError::SectorOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_sector_past_end_is_rejected() {
        let region = AnvilRegion::from_bytes(header_with_entry(0, 0, 9, 1)).unwrap();
        assert!(matches!(
            region.chunk_payload(0, 0),
            Err(RegionError::SectorOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_unknown_compression() {
        let mut data = header_with_entry(1, 0, 2, 1);
        let mut sector = vec![0u8; SECTOR_SIZE];
        sector[..4].copy_from_slice(&2u32.to_be_bytes());
        sector[4] = 9;
        data.extend_from_slice(&sector);

        let region = AnvilRegion::from_bytes(data).unwrap();
        assert!(matches!(
            region.chunk_payload(1, 0),
            Err(RegionError::UnknownCompression { scheme: 9, .. })
        ));
    }

    #[test]
    fn test_uncompressed_payload() {
        let mut data = header_with_entry(0, 0, 2, 1);
        let mut sector = vec![0u8; SECTOR_SIZE];
        sector[..4].copy_from_slice(&4u32.to_be_bytes());
        sector[4] = Compression::Uncompressed.to_byte();
        sector[5..8].copy_from_slice(&[7, 8, 9]);
        data.extend_from_slice(&sector);

        let region = AnvilRegion::from_bytes(data).unwrap();
        assert_eq!(region.chunk_payload(0, 0).unwrap(), Some(vec![7, 8, 9]));
    }

    #[test]
    fn test_compression_bytes() {
        for c in [Compression::Gzip, Compression::Zlib, Compression::Uncompressed] {
            assert_eq!(Compression::from_byte(c.to_byte()), Some(c));
        }
        assert_eq!(Compression::from_byte(4), None);
    }
}
