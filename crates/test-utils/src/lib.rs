//! Shared test utilities for the tile renderer workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Region grid generators
//! - Anvil region file and world directory fixtures
//! - Approximate color assertions for lossy tiles
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{uniform_grid, RegionFileBuilder, WorldFixture};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate equality of two RGB triples.
///
/// Each channel may differ by at most `tolerance`. Useful for JPEG tiles,
/// where flat colors come back slightly off.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_rgb_near;
///
/// assert_rgb_near!([34, 140, 33], [34, 139, 34], 4); // passes
/// assert_rgb_near!([0, 0, 200], [0, 0, 255], 4);    // fails
/// ```
#[macro_export]
macro_rules! assert_rgb_near {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let actual: [u8; 3] = $actual;
        let expected: [u8; 3] = $expected;
        let tolerance: i32 = $tolerance as i32;
        let within = actual
            .iter()
            .zip(expected.iter())
            .all(|(a, e)| (*a as i32 - *e as i32).abs() <= tolerance);
        if !within {
            panic!(
                "assertion failed: `(actual ≈ expected)`\n  actual: `{:?}`,\nexpected: `{:?}`,\ntolerance: `{}`",
                actual, expected, tolerance
            );
        }
    }};
}
