//! High-level image operations.
//!
//! These functions chain the individual stages (decode → luminance →
//! resample → dither) on top of an [`ImageBackend`].

use super::backend::{BackendError, ImageBackend};
use super::dither::dither;
use super::params::{ColorMode, TargetSize};
use super::resample::resize_nearest;
use crate::types::BinaryGrid;
use tracing::debug;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, bytes: &[u8]) -> Result<(u32, u32)> {
    let dims = backend.identify(bytes)?;
    Ok((dims.width, dims.height))
}

/// Decode `bytes` and reduce them to a dithered punch grid of `target` size.
pub fn image_to_binary(
    backend: &impl ImageBackend,
    bytes: &[u8],
    target: TargetSize,
    mode: ColorMode,
) -> Result<BinaryGrid> {
    let gray = backend.decode_luminance(bytes)?;
    let resized = resize_nearest(&gray, target);
    debug!(
        width = resized.width(),
        height = resized.height(),
        "Resampled to punch grid"
    );
    Ok(dither(resized, mode))
}
