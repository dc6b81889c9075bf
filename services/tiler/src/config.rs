//! Tiler configuration.
//!
//! Loaded from an optional YAML file; any field left out takes its default.
//! Command line flags are applied on top with [`TilerConfig::apply_overrides`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use region_reader::HeightmapKind;
use renderer::{TileFormat, DEFAULT_QUALITY};
use serde::{Deserialize, Serialize};
use tile_common::{PaletteConfig, TilerError, TilerResult, DEFAULT_REGION_EDGE};

use crate::cli::Args;

/// Top-level tiler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TilerConfig {
    /// World directory; region files are read from `<world_path>/region`
    pub world_path: PathBuf,

    /// Root of the tile tree
    pub output_dir: PathBuf,

    /// Zoom levels `0..zoom_levels` are rendered
    pub zoom_levels: u32,

    /// Region edge length in cells
    pub base_edge: usize,

    /// 0-100, JPEG only
    pub tile_quality: u8,

    pub tile_format: TileFormat,

    pub provider: ProviderKind,

    /// Heightmap sampled by the anvil provider
    pub heightmap: HeightmapKind,

    pub regions: RegionSelection,

    /// Render a level's tiles on the rayon pool
    pub parallel: bool,

    /// Write `tiles.json` at the output root
    pub write_manifest: bool,

    /// Seed for the synthetic provider; random per run when unset
    pub seed: Option<u64>,

    pub palette: PaletteConfig,

    pub logging: LoggingConfig,
}

impl Default for TilerConfig {
    fn default() -> Self {
        Self {
            world_path: PathBuf::from("world"),
            output_dir: PathBuf::from("tiles"),
            zoom_levels: 4,
            base_edge: DEFAULT_REGION_EDGE,
            tile_quality: DEFAULT_QUALITY,
            tile_format: TileFormat::Jpeg,
            provider: ProviderKind::Anvil,
            heightmap: HeightmapKind::WorldSurface,
            regions: RegionSelection::First,
            parallel: false,
            write_manifest: false,
            seed: None,
            palette: PaletteConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Where region grids come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Decode heightmaps from `.mca` files
    #[default]
    Anvil,
    /// Random grids, one per discovered region file
    Synthetic,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Anvil => write!(f, "anvil"),
            ProviderKind::Synthetic => write!(f, "synthetic"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = TilerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "anvil" => Ok(ProviderKind::Anvil),
            "synthetic" => Ok(ProviderKind::Synthetic),
            other => Err(TilerError::configuration(format!(
                "unknown provider '{}', expected anvil or synthetic",
                other
            ))),
        }
    }
}

/// Which discovered regions are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionSelection {
    /// Only the first region by file name; tiles go straight under `output_dir`
    #[default]
    First,
    /// Every region; tiles go under `output_dir/<region stem>`
    All,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl TilerConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> TilerResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TilerError::configuration(format!("failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
            .map_err(|e| TilerError::configuration(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> TilerResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| TilerError::configuration(format!("invalid config YAML: {}", e)))
    }

    /// Config file named by `args` (or defaults), with flags applied on top.
    pub fn load(args: &Args) -> TilerResult<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(args);
        config.validate()?;
        Ok(config)
    }

    /// Replace config values with any flags given on the command line.
    pub fn apply_overrides(&mut self, args: &Args) {
        if let Some(world) = &args.world {
            self.world_path = world.clone();
        }
        if let Some(output) = &args.output {
            self.output_dir = output.clone();
        }
        if let Some(zoom_levels) = args.zoom_levels {
            self.zoom_levels = zoom_levels;
        }
        if let Some(quality) = args.quality {
            self.tile_quality = quality;
        }
        if let Some(format) = args.format {
            self.tile_format = format;
        }
        if let Some(provider) = args.provider {
            self.provider = provider;
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        if args.all_regions {
            self.regions = RegionSelection::All;
        }
        if args.parallel {
            self.parallel = true;
        }
        if args.manifest {
            self.write_manifest = true;
        }
        if let Some(level) = &args.log_level {
            self.logging.level = level.to_lowercase();
        }
        if args.json_logs {
            self.logging.format = LogFormat::Json;
        }
    }

    /// Check value ranges, the palette, and that `base_edge` fits the provider.
    ///
    /// Whether `base_edge` divides into every zoom level is checked level by
    /// level while rendering.
    pub fn validate(&self) -> TilerResult<()> {
        if self.zoom_levels == 0 {
            return Err(TilerError::configuration("zoom_levels must be at least 1"));
        }
        if self.base_edge == 0 {
            return Err(TilerError::configuration("base_edge must be at least 1"));
        }
        if self.provider == ProviderKind::Anvil && self.base_edge != DEFAULT_REGION_EDGE {
            return Err(TilerError::configuration(format!(
                "base_edge {} does not match the {}-cell anvil region edge",
                self.base_edge, DEFAULT_REGION_EDGE
            )));
        }
        if self.tile_quality > 100 {
            return Err(TilerError::configuration(format!(
                "tile_quality {} outside 0..=100",
                self.tile_quality
            )));
        }
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(TilerError::configuration(format!(
                "invalid log level '{}', expected one of {:?}",
                self.logging.level, VALID_LOG_LEVELS
            )));
        }
        self.palette.validate()?;
        Ok(())
    }
}
