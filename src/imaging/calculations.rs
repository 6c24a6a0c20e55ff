//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Scale `original` so its longer edge equals `target`, preserving aspect ratio.
///
/// The shorter edge is rounded to the nearest pixel (never below 1), so the
/// aspect ratio error is under one pixel. Images whose longer edge already fits
/// are returned unchanged: derivatives are never upscaled.
///
/// The bound is on the longer edge, not the width. A portrait source narrower
/// than `target` but taller than it is still scaled down (`1200x2000` at 1600
/// becomes `960x1600`), so no derivative edge ever exceeds `target`.
///
/// # Examples
/// ```
/// # use bandsite::imaging::fit_long_edge;
/// // 4000x3000 landscape, 1600 target → 1600x1200
/// assert_eq!(fit_long_edge((4000, 3000), 1600), (1600, 1200));
///
/// // Portrait: the height is the long edge
/// assert_eq!(fit_long_edge((3000, 4000), 400), (300, 400));
///
/// // Smaller than the target: unchanged
/// assert_eq!(fit_long_edge((800, 600), 1600), (800, 600));
/// ```
pub fn fit_long_edge(original: (u32, u32), target: u32) -> (u32, u32) {
    let (width, height) = original;
    let long_edge = width.max(height);
    if long_edge <= target {
        return original;
    }

    if width >= height {
        // Landscape or square
        (target, scale_edge(height, target, long_edge))
    } else {
        // Portrait
        (scale_edge(width, target, long_edge), target)
    }
}

fn scale_edge(edge: u32, target: u32, long_edge: u32) -> u32 {
    let scaled = (edge as f64 * target as f64 / long_edge as f64).round() as u32;
    scaled.max(1)
}
