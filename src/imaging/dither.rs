//! Floyd–Steinberg error diffusion followed by a binary threshold.
//!
//! Cells are visited in raster order. Each one is snapped to the nearest of
//! `levels` evenly spaced values, and the quantization error is pushed onto
//! the unvisited neighbors:
//! - Right:        7/16
//! - Bottom-left:  3/16
//! - Bottom:       5/16
//! - Bottom-right: 1/16
//!
//! Error that would land outside the grid is dropped. Once the whole grid is
//! diffused every cell is thresholded at [`THRESHOLD`]: darker cells become
//! `1` (punch), lighter cells `0`.
//!
//! With 4 or 8 levels the output is still binary. The level count only
//! changes how error spreads before the threshold, which gives a different
//! (finer) dot pattern than plain 2-level dithering.

use super::params::ColorMode;
use crate::types::{BinaryGrid, PixelGrid};
use tracing::debug;

/// Values strictly below this are punched.
pub const THRESHOLD: f64 = 0.5;

/// Dither a luminance grid into a punch grid.
pub fn dither(mut grid: PixelGrid, mode: ColorMode) -> BinaryGrid {
    debug!(
        width = grid.width(),
        height = grid.height(),
        levels = mode.levels(),
        "Applying Floyd-Steinberg dithering"
    );
    diffuse(&mut grid, mode.levels());
    let binary = threshold(&grid);
    debug!(holes = binary.count_ones(), "Dithering complete");
    binary
}

/// Snap `value` to the nearest of `levels` evenly spaced steps in `[0, 1]`.
///
/// Values pushed outside `[0, 1]` by diffused error are not clamped, so the
/// snapped value can land one step outside the range as well.
pub fn quantize(value: f64, levels: u32) -> f64 {
    let steps = f64::from(levels.max(2) - 1);
    (value * steps).round() / steps
}

/// Run error diffusion in place. The grid holds quantized values afterwards.
pub fn diffuse(grid: &mut PixelGrid, levels: u32) {
    let (width, height) = (grid.width(), grid.height());

    for y in 0..height {
        for x in 0..width {
            let old = grid.get(x, y);
            let new = quantize(old, levels);
            grid.set(x, y, new);
            distribute_error(grid, x, y, old - new);
        }
    }
}

fn distribute_error(grid: &mut PixelGrid, x: usize, y: usize, error: f64) {
    let (width, height) = (grid.width(), grid.height());

    if x + 1 < width {
        grid.add(x + 1, y, error * 7.0 / 16.0);
    }
    if y + 1 < height {
        if x > 0 {
            grid.add(x - 1, y + 1, error * 3.0 / 16.0);
        }
        grid.add(x, y + 1, error * 5.0 / 16.0);
        if x + 1 < width {
            grid.add(x + 1, y + 1, error / 16.0);
        }
    }
}

/// Binary threshold: `< 0.5` → `1` (hole), `≥ 0.5` → `0`.
pub fn threshold(grid: &PixelGrid) -> BinaryGrid {
    let cells = grid
        .values()
        .iter()
        .map(|&v| u8::from(v < THRESHOLD))
        .collect();
    BinaryGrid::from_cells(grid.width(), grid.height(), cells)
}
