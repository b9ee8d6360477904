//! Pure calculation functions for resample dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::TargetSize;

/// Resolve a [`TargetSize`] against the source dimensions.
///
/// - Unspecified height: `round(width × src_h / src_w)`, at least 1.
/// - Unspecified width: `round(height × src_w / src_h)`, at least 1.
/// - Both unspecified: the source size is kept.
/// - A degenerate source (zero width or height) always resolves to `1×1`.
///
/// A requested edge of `0` is clamped to 1.
///
/// # Examples
/// ```
/// # use loom_punchcards::imaging::{TargetSize, calculate_target_dimensions};
/// // 416x100 source squeezed to 208 wide keeps the 4.16:1 ratio
/// assert_eq!(calculate_target_dimensions((416, 100), TargetSize::width(208)), (208, 50));
///
/// // degenerate sources never produce an empty grid
/// assert_eq!(calculate_target_dimensions((0, 10), TargetSize::width(208)), (1, 1));
/// ```
pub fn calculate_target_dimensions(source: (usize, usize), target: TargetSize) -> (usize, usize) {
    let (src_w, src_h) = source;
    if src_w == 0 || src_h == 0 {
        return (1, 1);
    }

    match (target.width, target.height) {
        (Some(w), Some(h)) => (w.max(1), h.max(1)),
        (Some(w), None) => {
            let w = w.max(1);
            (w, scale_edge(w, src_h, src_w))
        }
        (None, Some(h)) => {
            let h = h.max(1);
            (scale_edge(h, src_w, src_h), h)
        }
        (None, None) => (src_w, src_h),
    }
}

/// `round(known × numerator / denominator)`, never below 1.
fn scale_edge(known: usize, numerator: usize, denominator: usize) -> usize {
    let scaled = (known as f64 * numerator as f64 / denominator as f64).round() as usize;
    scaled.max(1)
}

/// Nearest-neighbor source index for destination index `dst` when mapping
/// `dst_len` cells onto `src_len` cells: `floor(dst × src_len / dst_len)`.
///
/// The result is always `< src_len` for `dst < dst_len`; the clamp only
/// guards callers that pass an out-of-range destination.
pub fn nearest_source_index(dst: usize, dst_len: usize, src_len: usize) -> usize {
    (dst * src_len / dst_len).min(src_len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // calculate_target_dimensions tests
    // =========================================================================

    #[test]
    fn height_derived_from_aspect_ratio() {
        // 800x600 → 208 wide: 208 * 600 / 800 = 156
        assert_eq!(
            calculate_target_dimensions((800, 600), TargetSize::width(208)),
            (208, 156)
        );
    }

    #[test]
    fn derived_height_rounds_to_nearest() {
        // 3x2 → 4 wide: 4 * 2 / 3 = 2.67 → 3
        assert_eq!(calculate_target_dimensions((3, 2), TargetSize::width(4)), (4, 3));
        // 3x2 → 5 wide: 5 * 2 / 3 = 3.33 → 3
        assert_eq!(calculate_target_dimensions((3, 2), TargetSize::width(5)), (5, 3));
    }

    #[test]
    fn width_derived_from_aspect_ratio() {
        // 600x800 portrait → 100 high: 100 * 600 / 800 = 75
        assert_eq!(
            calculate_target_dimensions((600, 800), TargetSize::height(100)),
            (75, 100)
        );
    }

    #[test]
    fn derived_edge_is_at_least_one() {
        // Very wide strip: 208 * 1 / 5000 = 0.04 → clamped to 1
        assert_eq!(
            calculate_target_dimensions((5000, 1), TargetSize::width(208)),
            (208, 1)
        );
        assert_eq!(
            calculate_target_dimensions((1, 5000), TargetSize::height(10)),
            (1, 10)
        );
    }

    #[test]
    fn exact_target_is_used_verbatim() {
        assert_eq!(
            calculate_target_dimensions((640, 480), TargetSize::exact(26, 8)),
            (26, 8)
        );
    }

    #[test]
    fn unspecified_target_keeps_source() {
        assert_eq!(
            calculate_target_dimensions((640, 480), TargetSize::default()),
            (640, 480)
        );
    }

    #[test]
    fn degenerate_source_clamps_to_single_cell() {
        assert_eq!(calculate_target_dimensions((0, 0), TargetSize::width(208)), (1, 1));
        assert_eq!(calculate_target_dimensions((10, 0), TargetSize::exact(5, 5)), (1, 1));
    }

    #[test]
    fn zero_requested_edge_clamps_to_one() {
        assert_eq!(calculate_target_dimensions((10, 10), TargetSize::width(0)), (1, 1));
    }

    // =========================================================================
    // nearest_source_index tests
    // =========================================================================

    #[test]
    fn nearest_index_downscale() {
        // 4 destination cells over 8 source cells: 0, 2, 4, 6
        let picks: Vec<usize> = (0..4).map(|d| nearest_source_index(d, 4, 8)).collect();
        assert_eq!(picks, vec![0, 2, 4, 6]);
    }

    #[test]
    fn nearest_index_upscale_repeats() {
        let picks: Vec<usize> = (0..6).map(|d| nearest_source_index(d, 6, 2)).collect();
        assert_eq!(picks, vec![0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn nearest_index_never_exceeds_source() {
        for dst_len in 1..40 {
            for src_len in 1..40 {
                for d in 0..dst_len {
                    assert!(nearest_source_index(d, dst_len, src_len) < src_len);
                }
            }
        }
    }
}
