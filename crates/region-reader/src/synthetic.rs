//! Pseudo-random regions for demos and benchmarks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tile_common::{RegionGrid, TilerResult, DEFAULT_REGION_EDGE};
use tracing::debug;

use crate::{RegionDataProvider, RegionId};

/// Fills every cell with a uniformly random byte.
///
/// With a seed, each region's generator is seeded from the seed and a CRC of
/// the region name, so reruns produce identical grids. Without one the
/// output differs per run.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    pub edge: usize,
    pub seed: Option<u64>,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            edge: DEFAULT_REGION_EDGE,
            seed: None,
        }
    }
}

impl SyntheticProvider {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn with_edge(mut self, edge: usize) -> Self {
        self.edge = edge;
        self
    }

    fn rng_for(&self, region: &RegionId) -> StdRng {
        match self.seed {
            Some(seed) => {
                let salt = crc32fast::hash(region.name.as_bytes()) as u64;
                StdRng::seed_from_u64(seed ^ salt)
            }
            None => StdRng::from_entropy(),
        }
    }
}

impl RegionDataProvider for SyntheticProvider {
    fn load_region(&self, region: &RegionId) -> TilerResult<RegionGrid> {
        let mut rng = self.rng_for(region);
        let mut cells = vec![0u8; self.edge * self.edge];
        rng.fill(cells.as_mut_slice());

        debug!(region = %region.name, edge = self.edge, seeded = self.seed.is_some(), "Generated synthetic region");
        RegionGrid::new(self.edge, cells)
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}
