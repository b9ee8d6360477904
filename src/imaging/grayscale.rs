//! Luminance conversion.
//!
//! Every pixel is reduced to `L = 0.299·R + 0.587·G + 0.114·B` with channels
//! normalized to `[0, 1]` first. Alpha is ignored, and single-channel sources
//! come out unchanged because the weights sum to one.

use crate::types::PixelGrid;
use image::DynamicImage;

pub const RED_WEIGHT: f64 = 0.299;
pub const GREEN_WEIGHT: f64 = 0.587;
pub const BLUE_WEIGHT: f64 = 0.114;

/// Luminance of normalized RGB channels, clamped to `[0, 1]`.
pub fn luminance(r: f64, g: f64, b: f64) -> f64 {
    (RED_WEIGHT * r + GREEN_WEIGHT * g + BLUE_WEIGHT * b).clamp(0.0, 1.0)
}

/// 8-bit luminosity conversion (truncating), for callers working in bytes.
pub fn rgb_to_gray(r: u8, g: u8, b: u8) -> u8 {
    (RED_WEIGHT * f64::from(r) + GREEN_WEIGHT * f64::from(g) + BLUE_WEIGHT * f64::from(b)) as u8
}

/// Convert a decoded image into a luminance grid of identical dimensions.
pub fn to_grayscale(img: &DynamicImage) -> PixelGrid {
    // to_rgb32f drops alpha and widens luma sources to three equal channels
    let rgb = img.to_rgb32f();
    let (width, height) = rgb.dimensions();
    PixelGrid::from_fn(width as usize, height as usize, |x, y| {
        let [r, g, b] = rgb.get_pixel(x as u32, y as u32).0;
        luminance(f64::from(r), f64::from(g), f64::from(b))
    })
}
