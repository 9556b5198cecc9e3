use crate::pipeline::select::{Strategy, BATCH_SIZE};
use crate::pipeline::threshold::DEFAULT_CUTOFF;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Log per-frame detail while processing
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable the per-category progress bar
    #[arg(long, global = true)]
    pub no_progress: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crop the foreground subject out of every frame of every category
    Crop {
        /// Dataset root containing one subdirectory per category
        dataset_path: PathBuf,
    },

    /// Partition every frame into fully-foreground tiles
    Chop {
        /// Dataset root containing one subdirectory per category
        dataset_path: PathBuf,

        /// Tile width in pixels
        #[arg(long, default_value_t = 224, env = "DATASET_CURATOR_TILE_WIDTH")]
        tile_width: u32,

        /// Tile height in pixels
        #[arg(long, default_value_t = 224, env = "DATASET_CURATOR_TILE_HEIGHT")]
        tile_height: u32,

        /// Luminance cutoff separating background from subject
        #[arg(long, default_value_t = DEFAULT_CUTOFF, env = "DATASET_CURATOR_CUTOFF")]
        cutoff: u16,

        /// Export only N randomly drawn filled tiles per frame
        #[arg(long)]
        sample: Option<usize>,

        /// Seed for the tile sampler
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Keep a representative subset of every fixed-size batch of frames
    Select {
        /// Dataset root containing one subdirectory per category
        dataset_path: PathBuf,

        /// Selection strategy: 0/first, 1/last, 2/middle, 3/random, 4/best
        #[arg(value_parser = Strategy::from_cli)]
        strategy: Strategy,

        /// Number of frames kept per batch
        count: usize,

        /// Frames per batch
        #[arg(long, default_value_t = BATCH_SIZE, env = "DATASET_CURATOR_GROUP_SIZE")]
        group_size: usize,

        /// Seed for the random strategy
        #[arg(long)]
        seed: Option<u64>,

        /// Write scores.csv next to the exported selection (best strategy)
        #[arg(long)]
        report: bool,
    },
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
