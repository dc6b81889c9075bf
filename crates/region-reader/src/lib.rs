//! Region sources for the world tile renderer.
//!
//! A region is a square grid of single-byte cell values. Regions are listed
//! from a world directory and loaded through a [`RegionDataProvider`]:
//!
//! - [`AnvilProvider`] decodes chunk heightmaps out of `.mca` files
//! - [`SyntheticProvider`] produces pseudo-random grids
//! - [`MemoryProvider`] serves pre-built grids

pub mod anvil;
pub mod error;
pub mod heightmap;
pub mod memory;
pub mod synthetic;

use std::fs;
use std::path::{Path, PathBuf};

use tile_common::{RegionGrid, TilerError, TilerResult};
use tracing::{debug, info};

pub use anvil::{AnvilRegion, ChunkNbt, Compression, Heightmaps};
pub use error::{RegionError, RegionResult};
pub use heightmap::{unpack_heightmap, HeightmapKind};
pub use memory::MemoryProvider;
pub use synthetic::SyntheticProvider;

/// Subdirectory of a world holding its region files.
pub const REGION_DIR: &str = "region";
/// Region file extension.
pub const REGION_EXTENSION: &str = "mca";

/// A region file discovered in a world directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RegionId {
    /// File name, e.g. `r.0.0.mca`
    pub name: String,
    pub path: PathBuf,
}

impl RegionId {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }

    /// File name without the extension, e.g. `r.0.0`.
    pub fn stem(&self) -> &str {
        self.name
            .strip_suffix(REGION_EXTENSION)
            .and_then(|s| s.strip_suffix('.'))
            .unwrap_or(&self.name)
    }

    /// Region coordinates parsed from an `r.<x>.<z>.mca` name.
    pub fn coords(&self) -> Option<(i32, i32)> {
        let mut parts = self.stem().split('.');
        if parts.next()? != "r" {
            return None;
        }
        let x = parts.next()?.parse().ok()?;
        let z = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some((x, z))
    }
}

/// List the `.mca` files under `<world>/region`, sorted by file name.
pub fn discover_regions(world: &Path) -> TilerResult<Vec<RegionId>> {
    let dir = world.join(REGION_DIR);
    if !dir.is_dir() {
        return Err(TilerError::not_found(format!(
            "region directory {} does not exist",
            dir.display()
        )));
    }

    let mut regions = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let path = entry?.path();
        let is_region = path.is_file()
            && path
                .extension()
                .map(|ext| ext == REGION_EXTENSION)
                .unwrap_or(false);
        if is_region {
            regions.push(RegionId::new(path));
        } else {
            debug!(path = %path.display(), "Skipping non-region entry");
        }
    }

    regions.sort();
    info!(world = %world.display(), count = regions.len(), "Discovered region files");
    Ok(regions)
}

/// Source of region grids.
pub trait RegionDataProvider: Send + Sync {
    /// Regions available in `world`, in processing order.
    fn list_regions(&self, world: &Path) -> TilerResult<Vec<RegionId>> {
        discover_regions(world)
    }

    /// Load the cell grid of one region.
    fn load_region(&self, region: &RegionId) -> TilerResult<RegionGrid>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Decodes heightmaps out of Anvil region files.
#[derive(Debug, Clone, Default)]
pub struct AnvilProvider {
    pub heightmap: HeightmapKind,
}

impl AnvilProvider {
    pub fn new(heightmap: HeightmapKind) -> Self {
        Self { heightmap }
    }
}

impl RegionDataProvider for AnvilProvider {
    fn load_region(&self, region: &RegionId) -> TilerResult<RegionGrid> {
        debug!(region = %region.name, heightmap = self.heightmap.nbt_key(), "Decoding region");
        let anvil = AnvilRegion::open(&region.path)?;
        Ok(anvil.height_grid(self.heightmap)?)
    }

    fn name(&self) -> &'static str {
        "anvil"
    }
}
