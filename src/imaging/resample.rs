//! Nearest-neighbor resampling of luminance grids.

use super::calculations::{calculate_target_dimensions, nearest_source_index};
use super::params::TargetSize;
use crate::types::PixelGrid;
use tracing::debug;

/// Resize `grid` to `target` using nearest-neighbor sampling.
///
/// Destination cell `(x, y)` samples source cell
/// `(floor(x·src_w/w), floor(y·src_h/h))`. A degenerate (empty) source yields
/// a single black cell rather than an error.
pub fn resize_nearest(grid: &PixelGrid, target: TargetSize) -> PixelGrid {
    let (src_w, src_h) = (grid.width(), grid.height());
    let (width, height) = calculate_target_dimensions((src_w, src_h), target);
    debug!(src_w, src_h, width, height, "Resampling grid");

    if grid.is_empty() {
        return PixelGrid::new(1, 1);
    }

    PixelGrid::from_fn(width, height, |x, y| {
        grid.get(
            nearest_source_index(x, width, src_w),
            nearest_source_index(y, height, src_h),
        )
    })
}
