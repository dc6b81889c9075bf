//! Region file and world directory fixtures.
//!
//! [`RegionFileBuilder`] writes small but well-formed Anvil region files so
//! decoding can be tested without shipping binary world data.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use fastnbt::LongArray;
use flate2::write::{GzEncoder, ZlibEncoder};
use serde::Serialize;

/// Bytes per region file sector.
pub const SECTOR_SIZE: usize = 4096;

/// Compression byte written ahead of a chunk payload.
pub mod compression {
    pub const GZIP: u8 = 1;
    pub const ZLIB: u8 = 2;
    pub const NONE: u8 = 3;
}

/// How the fixture packs chunk heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightLayout {
    /// `Heightmaps` at the root, 9 bits per entry, 37 longs
    Modern,
    /// `Level.Heightmaps`, 9 bits packed contiguously, 36 longs
    Legacy,
}

/// A chunk to be written into a region fixture.
#[derive(Debug, Clone)]
pub struct ChunkFixture {
    heights: Option<Vec<u32>>,
    key: &'static str,
    layout: HeightLayout,
    compression: u8,
    raw: Option<Vec<u8>>,
}

impl ChunkFixture {
    /// A chunk whose `WORLD_SURFACE` heightmap holds `heights` (256 entries).
    pub fn with_heights(heights: Vec<u32>) -> Self {
        Self {
            heights: Some(heights),
            key: "WORLD_SURFACE",
            layout: HeightLayout::Modern,
            compression: compression::ZLIB,
            raw: None,
        }
    }

    /// A chunk with every column at `height`.
    pub fn uniform(height: u32) -> Self {
        Self::with_heights(vec![height; 256])
    }

    /// A chunk with no heightmaps at all.
    pub fn without_heightmap() -> Self {
        Self {
            heights: None,
            ..Self::uniform(0)
        }
    }

    /// Bytes written verbatim after the length and compression byte.
    pub fn raw(compression: u8, payload: Vec<u8>) -> Self {
        Self {
            compression,
            raw: Some(payload),
            ..Self::without_heightmap()
        }
    }

    /// Store the heights under another heightmap key, e.g. `OCEAN_FLOOR`.
    pub fn heightmap_key(mut self, key: &'static str) -> Self {
        self.key = key;
        self
    }

    pub fn layout(mut self, layout: HeightLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn compression(mut self, compression: u8) -> Self {
        self.compression = compression;
        self
    }

    fn nbt(&self) -> Vec<u8> {
        let packed = self.heights.as_ref().map(|h| match self.layout {
            HeightLayout::Modern => pack_aligned(h),
            HeightLayout::Legacy => pack_spanning(h),
        });
        let mut heightmaps = BTreeMap::new();
        if let Some(packed) = packed {
            heightmaps.insert(self.key, LongArray::new(packed));
        }

        let result = match self.layout {
            HeightLayout::Modern => fastnbt::to_bytes(&ModernChunk {
                data_version: 3465,
                heightmaps,
            }),
            HeightLayout::Legacy => fastnbt::to_bytes(&LegacyChunk {
                data_version: 2230,
                level: LegacyLevel { heightmaps },
            }),
        };
        result.expect("fixture chunk serializes to NBT")
    }

    fn payload(&self) -> Vec<u8> {
        if let Some(raw) = &self.raw {
            return raw.clone();
        }

        let nbt = self.nbt();
        match self.compression {
            compression::GZIP => {
                let mut enc = GzEncoder::new(Vec::new(), flate2::Compression::default());
                enc.write_all(&nbt).expect("in-memory gzip");
                enc.finish().expect("in-memory gzip")
            }
            compression::ZLIB => {
                let mut enc = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
                enc.write_all(&nbt).expect("in-memory zlib");
                enc.finish().expect("in-memory zlib")
            }
            _ => nbt,
        }
    }
}

#[derive(Serialize)]
struct ModernChunk {
    #[serde(rename = "DataVersion")]
    data_version: i32,
    #[serde(rename = "Heightmaps")]
    heightmaps: BTreeMap<&'static str, LongArray>,
}

#[derive(Serialize)]
struct LegacyChunk {
    #[serde(rename = "DataVersion")]
    data_version: i32,
    #[serde(rename = "Level")]
    level: LegacyLevel,
}

#[derive(Serialize)]
struct LegacyLevel {
    #[serde(rename = "Heightmaps")]
    heightmaps: BTreeMap<&'static str, LongArray>,
}

fn pack_aligned(values: &[u32]) -> Vec<i64> {
    // 7 entries of 9 bits per long
    let mut packed = vec![0u64; 37];
    for (i, &v) in values.iter().enumerate().take(256) {
        packed[i / 7] |= ((v as u64) & 0x1ff) << ((i % 7) * 9);
    }
    packed.into_iter().map(|w| w as i64).collect()
}

fn pack_spanning(values: &[u32]) -> Vec<i64> {
    let mut packed = vec![0u64; 36];
    for (i, &v) in values.iter().enumerate().take(256) {
        let v = (v as u64) & 0x1ff;
        let (index, offset) = (i * 9 / 64, i * 9 % 64);
        packed[index] |= v << offset;
        if offset + 9 > 64 {
            packed[index + 1] |= v >> (64 - offset);
        }
    }
    packed.into_iter().map(|w| w as i64).collect()
}

/// Builds an Anvil region file in memory.
///
/// # Example
///
/// ```
/// use test_utils::{ChunkFixture, RegionFileBuilder};
///
/// let bytes = RegionFileBuilder::new()
///     .chunk(0, 0, ChunkFixture::uniform(64))
///     .build();
/// assert_eq!(bytes.len() % 4096, 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegionFileBuilder {
    chunks: BTreeMap<(usize, usize), ChunkFixture>,
}

impl RegionFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a chunk at local coordinates (`x`, `z`), each in 0..32.
    pub fn chunk(mut self, x: usize, z: usize, chunk: ChunkFixture) -> Self {
        assert!(x < 32 && z < 32, "chunk ({}, {}) outside region", x, z);
        self.chunks.insert((x, z), chunk);
        self
    }

    /// Fill all 1024 chunks with the same fixture.
    pub fn fill(mut self, chunk: ChunkFixture) -> Self {
        for z in 0..32 {
            for x in 0..32 {
                self.chunks.insert((x, z), chunk.clone());
            }
        }
        self
    }

    /// Serialize the header tables followed by one or more sectors per chunk.
    pub fn build(&self) -> Vec<u8> {
        let mut data = vec![0u8; 2 * SECTOR_SIZE];

        for (&(x, z), chunk) in &self.chunks {
            let payload = chunk.payload();
            let offset = data.len() / SECTOR_SIZE;

            data.extend_from_slice(&((payload.len() + 1) as u32).to_be_bytes());
            data.push(chunk.compression);
            data.extend_from_slice(&payload);
            let padded = (data.len() + SECTOR_SIZE - 1) / SECTOR_SIZE * SECTOR_SIZE;
            data.resize(padded, 0);

            let sectors = data.len() / SECTOR_SIZE - offset;
            let entry = 4 * (x + z * 32);
            data[entry..entry + 3].copy_from_slice(&(offset as u32).to_be_bytes()[1..]);
            data[entry + 3] = sectors as u8;
        }

        data
    }

    /// Write the region file to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        fs::write(path, self.build())
    }
}

/// A throwaway world directory with a `region/` subdirectory.
///
/// The directory is removed when the fixture is dropped.
pub struct WorldFixture {
    dir: tempfile::TempDir,
}

impl WorldFixture {
    pub fn new() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("tiler_world_")
            .tempdir()
            .expect("Failed to create temporary world directory");
        fs::create_dir(dir.path().join("region")).expect("Failed to create region directory");
        Self { dir }
    }

    /// A world directory without the `region/` subdirectory.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temporary world directory");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn region_dir(&self) -> PathBuf {
        self.dir.path().join("region")
    }

    /// Write a region file named `name` into `region/`.
    pub fn add_region(&self, name: &str, region: &RegionFileBuilder) -> PathBuf {
        let path = self.region_dir().join(name);
        region.write_to(&path).expect("Failed to write region fixture");
        path
    }

    /// Write arbitrary bytes as a region file.
    pub fn add_raw_region(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.region_dir().join(name);
        fs::write(&path, bytes).expect("Failed to write region fixture");
        path
    }
}

impl Default for WorldFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates a temporary directory for tile output.
///
/// The directory is cleaned up when the returned `TempDir` is dropped.
pub fn temp_output_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("tiler_out_")
        .tempdir()
        .expect("Failed to create temporary output directory")
}
