//! Packed chunk heightmaps.
//!
//! A chunk heightmap holds 256 column heights (index `z * 16 + x`) packed
//! into 64-bit longs. Since 1.16 entries never straddle two longs; older
//! worlds pack the bits contiguously. The layout is inferred from the array
//! length.

use crate::error::{RegionError, RegionResult};
use serde::{Deserialize, Serialize};

/// Columns per chunk.
pub const CHUNK_COLUMNS: usize = 256;

/// Which of a chunk's heightmaps to sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightmapKind {
    /// Highest non-air block
    #[default]
    WorldSurface,
    /// Highest block that blocks motion or holds fluid
    MotionBlocking,
    /// Highest solid block
    OceanFloor,
}

impl HeightmapKind {
    /// Key of the heightmap inside a chunk's `Heightmaps` compound.
    pub fn nbt_key(&self) -> &'static str {
        match self {
            HeightmapKind::WorldSurface => "WORLD_SURFACE",
            HeightmapKind::MotionBlocking => "MOTION_BLOCKING",
            HeightmapKind::OceanFloor => "OCEAN_FLOOR",
        }
    }
}

/// Longs needed to store 256 entries of `bits` without straddling.
fn aligned_len(bits: usize) -> usize {
    let per_long = 64 / bits;
    (CHUNK_COLUMNS + per_long - 1) / per_long
}

/// Unpack 256 column heights.
pub fn unpack_heightmap(packed: &[i64]) -> RegionResult<Vec<u32>> {
    if let Some(bits) = (1..=32).find(|&bits| aligned_len(bits) == packed.len()) {
        return Ok(unpack_aligned(packed, bits));
    }

    let total_bits = packed.len() * 64;
    if total_bits % CHUNK_COLUMNS == 0 && (1..=32).contains(&(total_bits / CHUNK_COLUMNS)) {
        return Ok(unpack_spanning(packed, total_bits / CHUNK_COLUMNS));
    }

    Err(RegionError::Heightmap(format!(
        "{} longs do not hold {} packed entries",
        packed.len(),
        CHUNK_COLUMNS
    )))
}

fn unpack_aligned(packed: &[i64], bits: usize) -> Vec<u32> {
    let per_long = 64 / bits;
    let mask = (1u64 << bits) - 1;

    (0..CHUNK_COLUMNS)
        .map(|i| {
            let word = packed[i / per_long] as u64;
            ((word >> ((i % per_long) * bits)) & mask) as u32
        })
        .collect()
}

fn unpack_spanning(packed: &[i64], bits: usize) -> Vec<u32> {
    let mask = (1u64 << bits) - 1;

    (0..CHUNK_COLUMNS)
        .map(|i| {
            let bit = i * bits;
            let (index, offset) = (bit / 64, bit % 64);
            let mut value = (packed[index] as u64) >> offset;
            if offset + bits > 64 {
                value |= (packed[index + 1] as u64) << (64 - offset);
            }
            (value & mask) as u32
        })
        .collect()
}
