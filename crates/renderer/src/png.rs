//! PNG encoding for RGB tile data.
//!
//! Supports two encoding modes:
//! - **Indexed PNG (color type 3)**: Used when the tile has ≤256 unique colors.
//!   Palette tiles always qualify, so this is the normal path.
//! - **RGB PNG (color type 2)**: Fallback for images with >256 colors.
//!
//! Use `create_png_auto` for automatic mode selection, or `create_png` for
//! explicit RGB encoding.

use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::io::Write;

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Minimum pixels to benefit from parallel palette extraction
const PARALLEL_THRESHOLD: usize = 16384; // 128x128 or larger

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Create a PNG image with automatic format selection.
///
/// - If ≤256 unique colors: uses indexed PNG (smaller, faster)
/// - Otherwise: uses RGB PNG (full color)
///
/// # Arguments
/// - `pixels`: RGB pixel data (3 bytes per pixel)
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
pub fn create_png_auto(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, String> {
    let num_pixels = pixels.len() / 3;

    let palette_result = if num_pixels >= PARALLEL_THRESHOLD {
        extract_palette_parallel(pixels)
    } else {
        extract_palette_sequential(pixels)
    };

    match palette_result {
        Some((palette, indices)) => create_png_indexed(width, height, &palette, &indices),
        None => create_png(pixels, width, height),
    }
}

/// Pack RGB bytes into a u32 for faster hashing and comparison
#[inline(always)]
fn pack_color(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) | ((g as u32) << 8) | ((b as u32) << 16)
}

#[inline(always)]
fn unpack_color(packed: u32) -> [u8; 3] {
    [packed as u8, (packed >> 8) as u8, (packed >> 16) as u8]
}

/// Sequential palette extraction for small tiles.
fn extract_palette_sequential(pixels: &[u8]) -> Option<(Vec<[u8; 3]>, Vec<u8>)> {
    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<[u8; 3]> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(pixels.len() / 3);

    for px in pixels.chunks_exact(3) {
        let packed = pack_color(px[0], px[1], px[2]);

        let index = match color_to_index.get(&packed) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push([px[0], px[1], px[2]]);
                color_to_index.insert(packed, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Parallel palette extraction for larger tiles.
///
/// 1. Parallel pass: collect unique colors per chunk in first-seen order
/// 2. Merge chunks in pixel order and check the count
/// 3. Parallel pass: map each pixel to its palette index
///
/// Palette order matches [`extract_palette_sequential`], so both paths
/// produce the same PNG bytes.
fn extract_palette_parallel(pixels: &[u8]) -> Option<(Vec<[u8; 3]>, Vec<u8>)> {
    let chunk_size = (pixels.len() / 3 / rayon::current_num_threads()).max(256) * 3;

    let chunk_colors: Vec<Vec<u32>> = pixels
        .par_chunks(chunk_size)
        .map(|chunk| {
            let mut seen: HashSet<u32> = HashSet::with_capacity(MAX_PALETTE_SIZE);
            let mut local_colors: Vec<u32> = Vec::with_capacity(MAX_PALETTE_SIZE);
            for px in chunk.chunks_exact(3) {
                let packed = pack_color(px[0], px[1], px[2]);
                if seen.insert(packed) {
                    local_colors.push(packed);
                    // Too many colors already
                    if local_colors.len() > MAX_PALETTE_SIZE {
                        break;
                    }
                }
            }
            local_colors
        })
        .collect();

    let mut global_colors: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<[u8; 3]> = Vec::with_capacity(MAX_PALETTE_SIZE);

    for packed in chunk_colors.into_iter().flatten() {
        if !global_colors.contains_key(&packed) {
            if palette.len() >= MAX_PALETTE_SIZE {
                return None;
            }
            global_colors.insert(packed, palette.len() as u8);
            palette.push(unpack_color(packed));
        }
    }

    let indices = pixels
        .par_chunks_exact(3)
        .map(|px| {
            global_colors
                .get(&pack_color(px[0], px[1], px[2]))
                .copied()
                .unwrap_or(0)
        })
        .collect();

    Some((palette, indices))
}

/// Create an indexed PNG (color type 3) from palette and indices.
///
/// 1 byte per pixel instead of 3, so less data to compress.
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[[u8; 3]],
    indices: &[u8],
) -> Result<Vec<u8>, String> {
    if indices.len() != width * height {
        return Err(format!(
            "{} palette indices for a {}x{} image",
            indices.len(),
            width,
            height
        ));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 3));

    let plte_data: Vec<u8> = palette.iter().flatten().copied().collect();
    write_chunk(&mut png, b"PLTE", &plte_data);

    let idat_data = deflate_scanlines(indices, width, height, 1)
        .map_err(|e| format!("IDAT compression failed: {}", e))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Create a PNG image from RGB pixel data (color type 2).
///
/// This is the fallback for images with >256 unique colors.
pub fn create_png(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, String> {
    if pixels.len() != width * height * 3 {
        return Err(format!(
            "{} bytes of RGB data for a {}x{} image",
            pixels.len(),
            width,
            height
        ));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 2));

    let idat_data = deflate_scanlines(pixels, width, height, 3)
        .map_err(|e| format!("IDAT compression failed: {}", e))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

fn ihdr(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&(width as u32).to_be_bytes());
    data.extend_from_slice(&(height as u32).to_be_bytes());
    data.push(8); // bit depth
    data.push(color_type);
    data.push(0); // compression method
    data.push(0); // filter method
    data.push(0); // interlace method
    data
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate image rows for the IDAT chunk, each prefixed with filter type 0.
fn deflate_scanlines(
    data: &[u8],
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
) -> std::io::Result<Vec<u8>> {
    let stride = width * bytes_per_pixel;
    let mut uncompressed = Vec::with_capacity(height * (1 + stride));
    for row in data.chunks_exact(stride).take(height) {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&uncompressed)?;
    encoder.finish()
}
