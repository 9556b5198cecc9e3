use crate::error::CurateError;
use crate::pipeline::luma;
use image::{imageops, RgbImage};

/// Crops smaller than this are grown before extraction so every export is
/// usable as classifier input.
pub const MIN_WIDTH: u32 = 224;
pub const MIN_HEIGHT: u32 = 224;

/// Tightest region containing every foreground pixel.
///
/// Indices are inclusive while scanning; cropping treats the far edge as
/// exclusive, so a box grown to the minimum yields exactly the minimum
/// number of pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_row: u32,
    pub max_row: u32,
    pub min_col: u32,
    pub max_col: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.max_col - self.min_col
    }

    pub fn height(&self) -> u32 {
        self.max_row - self.min_row
    }
}

/// Scans the luminance grid for the tightest box around non-black pixels.
pub fn foreground_bbox(frame: &RgbImage) -> Result<BoundingBox, CurateError> {
    let grid = luma::to_luminance(frame);

    let mut found = false;
    let mut min_row = 0u32;
    let mut max_row = 0u32;
    let mut min_col = 0u32;
    let mut max_col = 0u32;

    for (col, row, p) in grid.enumerate_pixels() {
        if p[0] == 0 {
            continue;
        }
        if !found {
            found = true;
            min_row = row;
            max_row = row;
            min_col = col;
            max_col = col;
            continue;
        }
        min_row = min_row.min(row);
        max_row = max_row.max(row);
        min_col = min_col.min(col);
        max_col = max_col.max(col);
    }

    if !found {
        return Err(CurateError::NoForegroundFound {
            width: frame.width(),
            height: frame.height(),
        });
    }

    Ok(BoundingBox {
        min_row,
        max_row,
        min_col,
        max_col,
    })
}

/// Grows one axis of the box to `required`, forward (far edge out) when that
/// stays inside the frame, otherwise backward (near edge in) when that stays
/// non-negative.
fn grow_axis(
    min: u32,
    max: u32,
    extent: u32,
    required: u32,
    axis: &'static str,
) -> Result<(u32, u32), CurateError> {
    if max - min >= required {
        return Ok((min, max));
    }
    if min + required < extent {
        Ok((min, min + required))
    } else if max >= required {
        Ok((max - required, max))
    } else {
        Err(CurateError::CannotSatisfyMinimumSize {
            axis,
            required,
            extent,
        })
    }
}

/// Applies the minimum-size rule independently per axis.
pub fn enforce_minimum(
    bbox: BoundingBox,
    frame_width: u32,
    frame_height: u32,
    min_width: u32,
    min_height: u32,
) -> Result<BoundingBox, CurateError> {
    let (min_col, max_col) = grow_axis(bbox.min_col, bbox.max_col, frame_width, min_width, "width")?;
    let (min_row, max_row) = grow_axis(
        bbox.min_row,
        bbox.max_row,
        frame_height,
        min_height,
        "height",
    )?;
    Ok(BoundingBox {
        min_row,
        max_row,
        min_col,
        max_col,
    })
}

/// Crops the foreground subject out of a frame, growing the box to the
/// minimum size first. Color is preserved; only the luminance grid decides
/// what counts as foreground.
pub fn extract_foreground(
    frame: &RgbImage,
    min_width: u32,
    min_height: u32,
) -> Result<RgbImage, CurateError> {
    let bbox = foreground_bbox(frame)?;
    let bbox = enforce_minimum(bbox, frame.width(), frame.height(), min_width, min_height)?;

    Ok(imageops::crop_imm(
        frame,
        bbox.min_col,
        bbox.min_row,
        bbox.width(),
        bbox.height(),
    )
    .to_image())
}
