//! Error types for region file decoding.

use thiserror::Error;
use tile_common::TilerError;

/// Result type for region reader operations.
pub type RegionResult<T> = Result<T, RegionError>;

/// Error types for region decoding.
#[derive(Error, Debug)]
pub enum RegionError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// File is shorter than the two header tables
    #[error("region header truncated: {0} bytes")]
    TruncatedHeader(usize),

    /// A location entry points outside the file or the header
    #[error("chunk ({x}, {z}) points outside the file: {reason}")]
    SectorOutOfBounds { x: usize, z: usize, reason: String },

    /// Unsupported chunk compression scheme
    #[error("chunk ({x}, {z}) uses unknown compression scheme {scheme}")]
    UnknownCompression { x: usize, z: usize, scheme: u8 },

    /// Chunk payload could not be decompressed
    #[error("chunk ({x}, {z}) failed to decompress: {source}")]
    Decompress {
        x: usize,
        z: usize,
        source: std::io::Error,
    },

    /// Chunk NBT could not be parsed
    #[error("chunk ({x}, {z}) has invalid NBT: {message}")]
    Nbt { x: usize, z: usize, message: String },

    /// Packed heightmap has an unexpected layout
    #[error("invalid heightmap: {0}")]
    Heightmap(String),
}

impl From<RegionError> for TilerError {
    fn from(err: RegionError) -> Self {
        TilerError::Decode(err.to_string())
    }
}
