//! Decoding region fixtures end to end.

use region_reader::{
    discover_regions, AnvilProvider, AnvilRegion, HeightmapKind, RegionDataProvider, RegionError,
    RegionId,
};
use test_utils::{chunk_heights, compression, ChunkFixture, HeightLayout, RegionFileBuilder, WorldFixture};
use tile_common::TilerError;

// ============================================================================
// Heightmap decoding
// ============================================================================

#[test]
fn test_chunk_heights_land_in_grid() {
    let bytes = RegionFileBuilder::new()
        .chunk(0, 0, ChunkFixture::with_heights(chunk_heights(60)))
        .chunk(3, 2, ChunkFixture::uniform(100))
        .build();
    let region = AnvilRegion::from_bytes(bytes).unwrap();
    let grid = region.height_grid(HeightmapKind::WorldSurface).unwrap();

    assert_eq!(grid.edge(), 512);
    assert_eq!(grid.get(0, 0), Some(60));
    assert_eq!(grid.get(15, 0), Some(75));
    assert_eq!(grid.get(0, 15), Some(75));
    assert_eq!(grid.get(15, 15), Some(90));

    // chunk (3, 2) covers columns 48..64, rows 32..48
    assert_eq!(grid.get(48, 32), Some(100));
    assert_eq!(grid.get(63, 47), Some(100));
    assert_eq!(grid.get(64, 47), Some(0));

    // never generated
    assert_eq!(grid.get(511, 511), Some(0));
}

#[test]
fn test_heights_above_255_are_clamped() {
    let bytes = RegionFileBuilder::new()
        .chunk(0, 0, ChunkFixture::uniform(320))
        .build();
    let grid = AnvilRegion::from_bytes(bytes)
        .unwrap()
        .height_grid(HeightmapKind::WorldSurface)
        .unwrap();
    assert_eq!(grid.get(5, 5), Some(255));
}

#[test]
fn test_all_compression_schemes() {
    let bytes = RegionFileBuilder::new()
        .chunk(0, 0, ChunkFixture::uniform(1).compression(compression::GZIP))
        .chunk(1, 0, ChunkFixture::uniform(2).compression(compression::ZLIB))
        .chunk(2, 0, ChunkFixture::uniform(3).compression(compression::NONE))
        .build();
    let grid = AnvilRegion::from_bytes(bytes)
        .unwrap()
        .height_grid(HeightmapKind::WorldSurface)
        .unwrap();

    assert_eq!(grid.get(0, 0), Some(1));
    assert_eq!(grid.get(16, 0), Some(2));
    assert_eq!(grid.get(32, 0), Some(3));
}

#[test]
fn test_legacy_level_layout() {
    let bytes = RegionFileBuilder::new()
        .chunk(
            31,
            31,
            ChunkFixture::with_heights(chunk_heights(10)).layout(HeightLayout::Legacy),
        )
        .build();
    let grid = AnvilRegion::from_bytes(bytes)
        .unwrap()
        .height_grid(HeightmapKind::WorldSurface)
        .unwrap();

    assert_eq!(grid.get(496, 496), Some(10));
    assert_eq!(grid.get(511, 511), Some(40));
}

#[test]
fn test_heightmap_kind_selects_key() {
    let bytes = RegionFileBuilder::new()
        .chunk(0, 0, ChunkFixture::uniform(42).heightmap_key("OCEAN_FLOOR"))
        .build();
    let region = AnvilRegion::from_bytes(bytes).unwrap();

    let surface = region.height_grid(HeightmapKind::WorldSurface).unwrap();
    assert_eq!(surface.get(0, 0), Some(0));

    let floor = region.height_grid(HeightmapKind::OceanFloor).unwrap();
    assert_eq!(floor.get(0, 0), Some(42));
}

#[test]
fn test_chunk_without_heightmaps_stays_zero() {
    let bytes = RegionFileBuilder::new()
        .chunk(0, 0, ChunkFixture::without_heightmap())
        .build();
    let grid = AnvilRegion::from_bytes(bytes)
        .unwrap()
        .height_grid(HeightmapKind::WorldSurface)
        .unwrap();
    assert!(grid.as_slice().iter().all(|&v| v == 0));
}

// ============================================================================
// Corrupt input
// ============================================================================

#[test]
fn test_unknown_compression_is_decode_error() {
    let bytes = RegionFileBuilder::new()
        .chunk(0, 0, ChunkFixture::raw(7, vec![1, 2, 3]))
        .build();
    let err = AnvilRegion::from_bytes(bytes)
        .unwrap()
        .height_grid(HeightmapKind::WorldSurface)
        .unwrap_err();
    assert!(matches!(err, RegionError::UnknownCompression { scheme: 7, .. }));

    let err: TilerError = err.into();
    assert!(matches!(err, TilerError::Decode(_)));
}

#[test]
fn test_garbage_zlib_is_decode_error() {
    let bytes = RegionFileBuilder::new()
        .chunk(0, 0, ChunkFixture::raw(compression::ZLIB, vec![0xde, 0xad, 0xbe, 0xef]))
        .build();
    let err = AnvilRegion::from_bytes(bytes)
        .unwrap()
        .height_grid(HeightmapKind::WorldSurface)
        .unwrap_err();
    assert!(matches!(err, RegionError::Decompress { .. }));
}

#[test]
fn test_invalid_nbt_is_decode_error() {
    let bytes = RegionFileBuilder::new()
        .chunk(0, 0, ChunkFixture::raw(compression::NONE, vec![0xff; 16]))
        .build();
    let err = AnvilRegion::from_bytes(bytes)
        .unwrap()
        .height_grid(HeightmapKind::WorldSurface)
        .unwrap_err();
    assert!(matches!(err, RegionError::Nbt { .. }));
}

// ============================================================================
// Discovery and the provider
// ============================================================================

#[test]
fn test_discover_sorts_and_filters() {
    let world = WorldFixture::new();
    let empty = RegionFileBuilder::new();
    world.add_region("r.1.0.mca", &empty);
    world.add_region("r.-1.0.mca", &empty);
    world.add_region("r.0.0.mca", &empty);
    world.add_raw_region("notes.txt", b"not a region");

    let names: Vec<String> = discover_regions(world.path())
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["r.-1.0.mca", "r.0.0.mca", "r.1.0.mca"]);
}

#[test]
fn test_discover_empty_region_dir() {
    let world = WorldFixture::new();
    assert!(discover_regions(world.path()).unwrap().is_empty());
}

#[test]
fn test_discover_missing_region_dir() {
    let world = WorldFixture::empty();
    let err = discover_regions(world.path()).unwrap_err();
    assert!(matches!(err, TilerError::NotFound(_)));
}

#[test]
fn test_provider_loads_from_disk() {
    let world = WorldFixture::new();
    let path = world.add_region(
        "r.0.0.mca",
        &RegionFileBuilder::new().chunk(1, 1, ChunkFixture::uniform(77)),
    );

    let provider = AnvilProvider::default();
    let regions = provider.list_regions(world.path()).unwrap();
    assert_eq!(regions, vec![RegionId::new(path)]);

    let grid = provider.load_region(&regions[0]).unwrap();
    assert_eq!(grid.get(16, 16), Some(77));
    assert_eq!(grid.get(15, 15), Some(0));
}

#[test]
fn test_provider_truncated_file_is_decode_error() {
    let world = WorldFixture::new();
    let path = world.add_raw_region("r.0.0.mca", &[0u8; 100]);

    let err = AnvilProvider::default()
        .load_region(&RegionId::new(path))
        .unwrap_err();
    assert!(err.is_region_scoped());
}
