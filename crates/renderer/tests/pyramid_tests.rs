//! Tests for pyramid generation, decoding the tiles it writes.
//!
//! Covers:
//! - Tile layout and file naming per zoom level
//! - Exact colors through lossless PNG tiles
//! - Approximate colors through JPEG tiles
//! - Re-runs and parallel rendering producing the same files

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use renderer::{Colorizer, TileEncoder, TileFormat, TilePyramidGenerator};
use test_utils::{assert_rgb_near, diagonal_grid, single_cell_grid, temp_output_dir, uniform_grid};
use tile_common::{RegionGrid, TilerError, ZoomLevel};

const WATER: [u8; 3] = [0, 0, 255];
const GRASS: [u8; 3] = [34, 139, 34];

// ============================================================================
// Helper functions
// ============================================================================

fn generator(format: TileFormat) -> TilePyramidGenerator {
    TilePyramidGenerator::new(Colorizer::default(), TileEncoder::new(format, 85).unwrap())
}

fn decode(path: &Path) -> image::RgbImage {
    image::open(path)
        .unwrap_or_else(|e| panic!("failed to decode {}: {}", path.display(), e))
        .to_rgb8()
}

fn pixel(img: &image::RgbImage, x: u32, y: u32) -> [u8; 3] {
    img.get_pixel(x, y).0
}

/// Every file under `root`, keyed by its path relative to `root`.
fn read_tree(root: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut files = BTreeMap::new();
    for level in fs::read_dir(root).unwrap() {
        let level = level.unwrap().path();
        for tile in fs::read_dir(&level).unwrap() {
            let tile = tile.unwrap().path();
            let key = tile.strip_prefix(root).unwrap().to_string_lossy().into_owned();
            files.insert(key, fs::read(&tile).unwrap());
        }
    }
    files
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_reference_region_512_four_levels() {
    let out = temp_output_dir();
    let grid = uniform_grid(512, 1);

    let report = generator(TileFormat::Jpeg)
        .generate(&grid, 4, 512, out.path())
        .unwrap();
    assert_eq!(report.tiles_written(), 1 + 4 + 16 + 64);

    for (zoom, (tiles, edge)) in [(1u32, 512u32), (2, 256), (4, 128), (8, 64)].iter().enumerate() {
        let dir = out.path().join(zoom.to_string());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), (tiles * tiles) as usize);

        for y in 0..*tiles {
            for x in 0..*tiles {
                let path = dir.join(format!("{}_{}.jpg", x, y));
                assert!(path.exists(), "missing {}", path.display());
            }
        }

        let img = decode(&dir.join("0_0.jpg"));
        assert_eq!(img.dimensions(), (*edge, *edge));
    }

    assert!(!out.path().join("4").exists());
}

#[test]
fn test_tiles_reconstruct_grid() {
    let out = temp_output_dir();
    let grid = diagonal_grid(64);
    let colorizer = Colorizer::default();

    generator(TileFormat::Png)
        .generate(&grid, 3, 64, out.path())
        .unwrap();

    for zoom in 0..3 {
        let level = ZoomLevel::new(64, zoom).unwrap();
        for coord in level.tiles() {
            let img = decode(&out.path().join(coord.relative_path("png")));
            let (x0, y0) = level.origin(&coord);

            for (px, py, rgb) in img.enumerate_pixels() {
                let cell = grid.get(x0 + px as usize, y0 + py as usize).unwrap();
                assert_eq!(rgb.0, colorizer.colorize(cell), "tile {:?} pixel ({}, {})", coord, px, py);
            }
        }
    }
}

// ============================================================================
// Colors
// ============================================================================

#[test]
fn test_all_ones_is_grass_png() {
    let out = temp_output_dir();
    generator(TileFormat::Png)
        .generate(&uniform_grid(32, 1), 2, 32, out.path())
        .unwrap();

    for (name, bytes) in read_tree(out.path()) {
        let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert!(img.pixels().all(|p| p.0 == GRASS), "{} is not all grass", name);
    }
}

#[test]
fn test_all_ones_is_grass_jpeg() {
    let out = temp_output_dir();
    generator(TileFormat::Jpeg)
        .generate(&uniform_grid(64, 1), 2, 64, out.path())
        .unwrap();

    let img = decode(&out.path().join("1/1_1.jpg"));
    for (x, y) in [(0, 0), (13, 7), (31, 31)] {
        assert_rgb_near!(pixel(&img, x, y), GRASS, 4);
    }
}

#[test]
fn test_single_water_cell_png() {
    let out = temp_output_dir();
    let grid = single_cell_grid(64, 0, 0, 0, 1);

    generator(TileFormat::Png)
        .generate(&grid, 4, 64, out.path())
        .unwrap();

    let top = decode(&out.path().join("0/0_0.png"));
    assert_eq!(pixel(&top, 0, 0), WATER);
    assert_eq!(pixel(&top, 1, 0), GRASS);
    assert_eq!(pixel(&top, 0, 1), GRASS);
    assert_eq!(
        top.pixels().filter(|p| p.0 == WATER).count(),
        1,
        "exactly one water pixel"
    );

    let deepest = decode(&out.path().join("3/0_0.png"));
    assert_eq!(deepest.dimensions(), (8, 8));
    assert_eq!(pixel(&deepest, 0, 0), WATER);

    let neighbour = decode(&out.path().join("3/1_0.png"));
    assert!(neighbour.pixels().all(|p| p.0 == GRASS));
}

#[test]
fn test_single_water_cell_jpeg() {
    let out = temp_output_dir();
    let grid = single_cell_grid(64, 0, 0, 0, 1);

    generator(TileFormat::Jpeg)
        .generate(&grid, 1, 64, out.path())
        .unwrap();

    let img = decode(&out.path().join("0/0_0.jpg"));
    let corner = pixel(&img, 0, 0);
    let distance: i32 = corner
        .iter()
        .zip(GRASS.iter())
        .map(|(a, b)| (*a as i32 - *b as i32).abs())
        .sum();
    assert!(distance > 30, "corner {:?} should not look like grass", corner);
    assert_rgb_near!(pixel(&img, 40, 40), GRASS, 4);
}

#[test]
fn test_png_tiles_are_indexed_with_few_colors() {
    let out = temp_output_dir();
    let cells: Vec<u8> = (0..32 * 32).map(|i| (i * 37 % 256) as u8).collect();
    let grid = RegionGrid::new(32, cells).unwrap();
    let colorizer = Colorizer::default();

    generator(TileFormat::Png)
        .generate(&grid, 1, 32, out.path())
        .unwrap();

    let bytes = fs::read(out.path().join("0/0_0.png")).unwrap();
    assert_eq!(bytes[25], 3, "expected indexed color type");

    let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
    let mut seen: Vec<[u8; 3]> = img.pixels().map(|p| p.0).collect();
    seen.sort();
    seen.dedup();
    assert!(seen.len() <= colorizer.palette_size() + 1);
    assert!(seen.iter().all(|c| colorizer.distinct_colors().contains(c)));
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_rerun_overwrites_identically() {
    let out = temp_output_dir();
    let grid = diagonal_grid(32);
    let gen = generator(TileFormat::Jpeg);

    gen.generate(&grid, 3, 32, out.path()).unwrap();
    let first = read_tree(out.path());

    gen.generate(&grid, 3, 32, out.path()).unwrap();
    let second = read_tree(out.path());

    assert_eq!(first.len(), 21);
    assert_eq!(first, second);
}

#[test]
fn test_large_png_tiles_are_byte_stable_across_runs() {
    // 256 and 128 edge tiles take the parallel palette path
    let grid = diagonal_grid(256);
    let gen = generator(TileFormat::Png);

    let first_out = temp_output_dir();
    gen.generate(&grid, 3, 256, first_out.path()).unwrap();
    let first = read_tree(first_out.path());
    assert_eq!(first.len(), 21);

    for _ in 0..4 {
        let out = temp_output_dir();
        gen.generate(&grid, 3, 256, out.path()).unwrap();
        assert_eq!(read_tree(out.path()), first);
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let seq_out = temp_output_dir();
    let par_out = temp_output_dir();
    let grid = diagonal_grid(256);

    generator(TileFormat::Png)
        .generate(&grid, 4, 256, seq_out.path())
        .unwrap();
    generator(TileFormat::Png)
        .with_parallel(true)
        .generate(&grid, 4, 256, par_out.path())
        .unwrap();

    let sequential = read_tree(seq_out.path());
    assert_eq!(sequential.len(), 1 + 4 + 16 + 64);
    assert_eq!(sequential, read_tree(par_out.path()));
}

// ============================================================================
// Configuration errors
// ============================================================================

#[test]
fn test_zoom_beyond_region_is_configuration_error() {
    let out = temp_output_dir();
    let err = generator(TileFormat::Png)
        .generate(&uniform_grid(4, 1), 4, 4, out.path())
        .unwrap_err();
    assert!(matches!(err, TilerError::Configuration(_)));

    // zoom 0..=2 fit a 4-cell region
    assert!(out.path().join("2/3_3.png").exists());
}
