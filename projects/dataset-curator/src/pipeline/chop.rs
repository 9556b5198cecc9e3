use crate::pipeline::{luma, threshold};
use image::{imageops, RgbImage};

/// One fully-foreground cell of the tile grid.
///
/// `grid_row`/`grid_col` locate the cell in the partition; emission order is
/// row-major, which is what keeps export naming deterministic.
pub struct Tile {
    pub image: RgbImage,
    pub grid_row: u32,
    pub grid_col: u32,
}

/// Partitions a frame into non-overlapping `tile_width x tile_height` cells
/// and keeps only the cells with no background pixel left after
/// thresholding. Remainder strips smaller than a full cell are dropped.
pub fn chop_frame(frame: &RgbImage, tile_width: u32, tile_height: u32, cutoff: u16) -> Vec<Tile> {
    if tile_width == 0 || tile_height == 0 {
        return Vec::new();
    }

    let masked = threshold::mask(frame, cutoff);
    let grid_rows = frame.height() / tile_height;
    let grid_cols = frame.width() / tile_width;

    let mut tiles = Vec::new();
    for grid_row in 0..grid_rows {
        for grid_col in 0..grid_cols {
            let x = grid_col * tile_width;
            let y = grid_row * tile_height;
            if !cell_is_filled(&masked, x, y, tile_width, tile_height) {
                continue;
            }
            tiles.push(Tile {
                image: imageops::crop_imm(&masked, x, y, tile_width, tile_height).to_image(),
                grid_row,
                grid_col,
            });
        }
    }

    tiles
}

/// A cell is filled iff every pixel in it kept a non-zero luminance through
/// the mask.
fn cell_is_filled(masked: &RgbImage, x: u32, y: u32, width: u32, height: u32) -> bool {
    for row in y..y + height {
        for col in x..x + width {
            let p = masked.get_pixel(col, row);
            if luma::luminance_of(p[0], p[1], p[2]) == 0 {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::threshold::DEFAULT_CUTOFF;
    use image::Rgb;

    fn white_frame(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
    }

    #[test]
    fn full_grid_over_uniform_foreground() {
        let frame = white_frame(300, 300);
        let tiles = chop_frame(&frame, 100, 100, DEFAULT_CUTOFF);
        assert_eq!(tiles.len(), 9);
        assert!(tiles
            .iter()
            .all(|t| t.image.dimensions() == (100, 100)));
    }

    #[test]
    fn emission_order_is_row_major() {
        let frame = white_frame(300, 200);
        let tiles = chop_frame(&frame, 100, 100, DEFAULT_CUTOFF);
        let order: Vec<(u32, u32)> = tiles.iter().map(|t| (t.grid_row, t.grid_col)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn one_background_pixel_discards_its_cell() {
        let mut frame = white_frame(300, 300);
        // Value below the cutoff thresholds to background inside cell (1, 1).
        frame.put_pixel(150, 150, Rgb([40, 40, 40]));
        let tiles = chop_frame(&frame, 100, 100, DEFAULT_CUTOFF);
        assert_eq!(tiles.len(), 8);
        assert!(!tiles.iter().any(|t| (t.grid_row, t.grid_col) == (1, 1)));
    }

    #[test]
    fn remainder_strips_are_dropped() {
        let frame = white_frame(250, 250);
        let tiles = chop_frame(&frame, 100, 100, DEFAULT_CUTOFF);
        assert_eq!(tiles.len(), 4);
    }

    #[test]
    fn frame_smaller_than_one_cell_emits_nothing() {
        let frame = white_frame(50, 50);
        assert!(chop_frame(&frame, 100, 100, DEFAULT_CUTOFF).is_empty());
    }
}
