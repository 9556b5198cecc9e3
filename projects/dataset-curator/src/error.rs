use std::path::PathBuf;
use thiserror::Error;

// Main curation error type. Per-frame kinds (decode and geometry failures)
// are skippable by the orchestrator; the rest abort the run.

#[derive(Error, Debug)]
pub enum CurateError {
    #[error("failed to decode image {path}: {source}")]
    UnreadableImage {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("no foreground pixel in a {width}x{height} frame")]
    NoForegroundFound { width: u32, height: u32 },

    #[error("cannot grow box {axis} to {required} inside a frame extent of {extent}")]
    CannotSatisfyMinimumSize {
        axis: &'static str,
        required: u32,
        extent: u32,
    },

    #[error("frame dimensions differ: {width_a}x{height_a} vs {width_b}x{height_b}")]
    DimensionMismatch {
        width_a: u32,
        height_a: u32,
        width_b: u32,
        height_b: u32,
    },

    #[error("cannot select {count} frame(s) with strategy {strategy} from a batch of {batch_len}")]
    InvalidSelectionCount {
        strategy: &'static str,
        count: usize,
        batch_len: usize,
    },

    #[error("batch of {len} frame(s) is not divisible into groups of {group_size}")]
    MalformedBatch { len: usize, group_size: usize },

    #[error("failed to write image {path}: {source}")]
    WriteImage {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
