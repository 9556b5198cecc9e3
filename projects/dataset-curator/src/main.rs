mod cli;
mod dataset;
mod error;
mod manifest;
mod pipeline;

use anyhow::Result;
use cli::{Args, Command};
use pipeline::crop;
use pipeline::orchestrator::{self, ChopJob, CropJob, RunOptions, SelectJob};

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let args = Args::parse_args();
    init_tracing(args.verbose);

    let opts = RunOptions {
        show_progress: !args.no_progress,
    };

    match args.command {
        Command::Crop { dataset_path } => orchestrator::run_crop(
            &CropJob {
                dataset: dataset_path,
                min_width: crop::MIN_WIDTH,
                min_height: crop::MIN_HEIGHT,
            },
            &opts,
        ),
        Command::Chop {
            dataset_path,
            tile_width,
            tile_height,
            cutoff,
            sample,
            seed,
        } => orchestrator::run_chop(
            &ChopJob {
                dataset: dataset_path,
                tile_width,
                tile_height,
                cutoff,
                sample,
                seed,
            },
            &opts,
        ),
        Command::Select {
            dataset_path,
            strategy,
            count,
            group_size,
            seed,
            report,
        } => orchestrator::run_select(
            &SelectJob {
                dataset: dataset_path,
                strategy,
                count,
                group_size,
                seed,
                report,
            },
            &opts,
        ),
    }
}
