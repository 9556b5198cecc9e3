use crate::error::CurateError;
use crate::pipeline::luma;
use image::RgbImage;

/// Mean intensity of the equalized luminance grid, in [0, 255].
pub fn lightness(frame: &RgbImage) -> f64 {
    let pixels = frame.width() as u64 * frame.height() as u64;
    if pixels == 0 {
        return 0.0;
    }
    let grid = luma::equalize(&luma::to_luminance(frame));
    let sum: u64 = grid.pixels().map(|p| p[0] as u64).sum();
    sum as f64 / pixels as f64
}

/// Percentage of pixels strictly brighter than `threshold`, in [0, 100].
/// No equalization here; occupancy measures the raw frame.
pub fn occupancy(frame: &RgbImage, threshold: u8) -> f64 {
    let pixels = frame.width() as u64 * frame.height() as u64;
    if pixels == 0 {
        return 0.0;
    }
    let grid = luma::to_luminance(frame);
    let above = grid.pixels().filter(|p| p[0] > threshold).count();
    above as f64 * 100.0 / pixels as f64
}

/// Similarity of two equalized luminance grids, in [0, 100]; identical
/// frames score exactly 100. Dimensions must match.
pub fn similarity(a: &RgbImage, b: &RgbImage) -> Result<f64, CurateError> {
    if a.dimensions() != b.dimensions() {
        return Err(CurateError::DimensionMismatch {
            width_a: a.width(),
            height_a: a.height(),
            width_b: b.width(),
            height_b: b.height(),
        });
    }

    let pixels = a.width() as u64 * a.height() as u64;
    if pixels == 0 {
        return Ok(100.0);
    }

    let grid_a = luma::equalize(&luma::to_luminance(a));
    let grid_b = luma::equalize(&luma::to_luminance(b));
    let diff: u64 = grid_a
        .pixels()
        .zip(grid_b.pixels())
        .map(|(p, q)| (p[0] as i32 - q[0] as i32).unsigned_abs() as u64)
        .sum();

    Ok(100.0 - diff as f64 * 100.0 / (255.0 * pixels as f64))
}
