//! Image processing: decode, luminance, resample, dither.
//!
//! | Stage | Function |
//! |---|---|
//! | **Decode** | [`RustBackend`] (`image` crate: PNG, JPEG, GIF, TIFF, WebP) |
//! | **Grayscale** | [`grayscale::to_grayscale`]: `0.299R + 0.587G + 0.114B` |
//! | **Resample** | [`resize_nearest`]: nearest-neighbor, aspect-derived edge |
//! | **Dither** | [`dither`]: Floyd–Steinberg, threshold at 0.5 |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: [`ColorMode`] and [`TargetSize`]
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining the stages on a backend

pub mod backend;
mod calculations;
pub mod dither;
pub mod grayscale;
pub mod operations;
mod params;
pub mod resample;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{calculate_target_dimensions, nearest_source_index};
pub use dither::dither;
pub use operations::{get_dimensions, image_to_binary};
pub use params::{ColorMode, InvalidColorMode, TargetSize};
pub use resample::resize_nearest;
pub use rust_backend::{RustBackend, supported_input_formats};
