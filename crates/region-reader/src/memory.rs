//! Region grids held in memory.

use std::collections::BTreeMap;
use std::path::Path;

use tile_common::{RegionGrid, TilerError, TilerResult};

use crate::{RegionDataProvider, RegionId};

/// Serves grids registered by name, ignoring the world directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    regions: BTreeMap<String, RegionGrid>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a grid under a region file name such as `r.0.0.mca`.
    pub fn insert(&mut self, name: impl Into<String>, grid: RegionGrid) {
        self.regions.insert(name.into(), grid);
    }

    pub fn with_region(mut self, name: impl Into<String>, grid: RegionGrid) -> Self {
        self.insert(name, grid);
        self
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl RegionDataProvider for MemoryProvider {
    fn list_regions(&self, _world: &Path) -> TilerResult<Vec<RegionId>> {
        Ok(self.regions.keys().map(|name| RegionId::new(name.as_str())).collect())
    }

    fn load_region(&self, region: &RegionId) -> TilerResult<RegionGrid> {
        self.regions
            .get(&region.name)
            .cloned()
            .ok_or_else(|| TilerError::not_found(format!("region {} not registered", region.name)))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
