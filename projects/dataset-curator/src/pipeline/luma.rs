use image::{GrayImage, Luma, RgbImage};

/// Integer BT.601 luminance. A pure-black pixel maps to exactly zero,
/// which is what the foreground scans key on.
pub fn luminance_of(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
}

/// Single-channel brightness grid with the same dimensions as the frame.
pub fn to_luminance(frame: &RgbImage) -> GrayImage {
    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        let p = frame.get_pixel(x, y);
        Luma([luminance_of(p[0], p[1], p[2])])
    })
}

/// Histogram equalization via the classic CDF remap. A constant grid is
/// returned unchanged (there is no contrast to stretch).
pub fn equalize(grid: &GrayImage) -> GrayImage {
    let total = grid.width() as u64 * grid.height() as u64;
    if total == 0 {
        return grid.clone();
    }

    let mut hist = [0u64; 256];
    for p in grid.pixels() {
        hist[p[0] as usize] += 1;
    }

    let mut cdf = [0u64; 256];
    let mut acc = 0u64;
    for (i, &count) in hist.iter().enumerate() {
        acc += count;
        cdf[i] = acc;
    }

    let cdf_min = cdf.iter().copied().find(|&c| c > 0).unwrap_or(0);
    let denom = total - cdf_min;
    if denom == 0 {
        return grid.clone();
    }

    let mut lut = [0u8; 256];
    for (i, l) in lut.iter_mut().enumerate() {
        *l = ((cdf[i].saturating_sub(cdf_min) * 255 + denom / 2) / denom) as u8;
    }

    let mut out = grid.clone();
    for p in out.pixels_mut() {
        p[0] = lut[p[0] as usize];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn black_maps_to_zero_luminance() {
        assert_eq!(luminance_of(0, 0, 0), 0);
        assert_eq!(luminance_of(255, 255, 255), 255);
        // A single faint blue unit still rounds down to background.
        assert_eq!(luminance_of(0, 0, 1), 0);
    }

    #[test]
    fn luminance_grid_matches_frame_dimensions() {
        let frame = RgbImage::from_pixel(7, 3, Rgb([10, 20, 30]));
        let grid = to_luminance(&frame);
        assert_eq!(grid.dimensions(), (7, 3));
    }

    #[test]
    fn equalize_is_identity_on_constant_grid() {
        let grid = GrayImage::from_pixel(4, 4, Luma([143]));
        let eq = equalize(&grid);
        assert!(eq.pixels().all(|p| p[0] == 143));
    }

    #[test]
    fn equalize_stretches_two_level_grid_to_full_range() {
        let mut grid = GrayImage::from_pixel(2, 2, Luma([100]));
        grid.put_pixel(0, 0, Luma([110]));
        grid.put_pixel(1, 0, Luma([110]));
        let eq = equalize(&grid);
        let mut values: Vec<u8> = eq.pixels().map(|p| p[0]).collect();
        values.sort_unstable();
        assert_eq!(values, vec![0, 0, 255, 255]);
    }
}
