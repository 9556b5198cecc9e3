use crate::pipeline::luma;
use image::{Rgb, RgbImage};

/// Default luminance cutoff separating background from subject.
pub const DEFAULT_CUTOFF: u16 = 80;

/// Blackens every pixel whose luminance falls below the cutoff and copies
/// the rest unchanged. Asymmetric on purpose: background-like pixels are
/// zeroed, foreground pixels keep their original color.
///
/// The cutoff is wider than a pixel value so 256 can express "zero
/// everything".
pub fn mask(frame: &RgbImage, cutoff: u16) -> RgbImage {
    let mut out = frame.clone();
    for (x, y, p) in frame.enumerate_pixels() {
        if (luma::luminance_of(p[0], p[1], p[2]) as u16) < cutoff {
            out.put_pixel(x, y, Rgb([0, 0, 0]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_cutoff_is_identity() {
        let mut frame = RgbImage::from_pixel(4, 4, Rgb([3, 2, 1]));
        frame.put_pixel(0, 0, Rgb([200, 10, 90]));
        let masked = mask(&frame, 0);
        assert_eq!(masked, frame);
    }

    #[test]
    fn cutoff_above_range_zeroes_every_pixel() {
        let frame = RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]));
        let masked = mask(&frame, 256);
        assert!(masked.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn foreground_color_is_not_binarized() {
        let mut frame = RgbImage::from_pixel(2, 1, Rgb([10, 10, 10]));
        frame.put_pixel(1, 0, Rgb([200, 30, 120]));
        let masked = mask(&frame, DEFAULT_CUTOFF);
        // Below the cutoff: zeroed. Above: original color, not white.
        assert_eq!(masked.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(masked.get_pixel(1, 0).0, [200, 30, 120]);
    }
}
