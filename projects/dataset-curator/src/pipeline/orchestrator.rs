// Pipeline orchestrator: walks category directories, accumulates frames
// into batches, runs one of the transforms, and exports through the frame
// store.
//
// Strictly sequential: one category, one batch, one frame at a time.
// Per-frame failures are reported and skipped; they never abort a run.

use crate::dataset;
use crate::error::CurateError;
use crate::manifest::RunManifest;
use crate::pipeline::select::Strategy;
use crate::pipeline::{chop, crop, select};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

pub struct CropJob {
    pub dataset: PathBuf,
    pub min_width: u32,
    pub min_height: u32,
}

pub struct ChopJob {
    pub dataset: PathBuf,
    pub tile_width: u32,
    pub tile_height: u32,
    pub cutoff: u16,
    pub sample: Option<usize>,
    pub seed: Option<u64>,
}

pub struct SelectJob {
    pub dataset: PathBuf,
    pub strategy: Strategy,
    pub count: usize,
    pub group_size: usize,
    pub seed: Option<u64>,
    pub report: bool,
}

/// Runtime switches that would otherwise be ambient state.
pub struct RunOptions {
    pub show_progress: bool,
}

fn progress_bar(len: usize, opts: &RunOptions) -> ProgressBar {
    if !opts.show_progress {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Crops the foreground subject out of every frame of every category.
pub fn run_crop(job: &CropJob, opts: &RunOptions) -> Result<()> {
    let output_root = dataset::sibling_output_root(&job.dataset, "_cropped")?;
    fs::create_dir_all(&output_root)?;

    let mut manifest = RunManifest::new(
        "crop",
        &job.dataset,
        json!({ "min_width": job.min_width, "min_height": job.min_height }),
    );

    for category in dataset::list_categories(&job.dataset)? {
        let name = dataset::category_name(&category);
        let images = dataset::list_images(&category);
        tracing::info!("Scanning category {name}: {} image(s)", images.len());

        let pb = progress_bar(images.len(), opts);
        let mut exported = 0usize;
        let mut skipped = 0usize;

        for path in &images {
            pb.inc(1);
            let frame = match dataset::read_frame(path) {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::warn!("Skipping {}: {e}", path.display());
                    skipped += 1;
                    continue;
                }
            };
            let cropped = match crop::extract_foreground(&frame, job.min_width, job.min_height) {
                Ok(cropped) => cropped,
                Err(e) => {
                    tracing::warn!("Skipping {}: {e}", path.display());
                    skipped += 1;
                    continue;
                }
            };

            let out = output_root
                .join(&name)
                .join(dataset::export_name(exported));
            dataset::write_frame(&out, &cropped)?;
            exported += 1;
        }

        pb.finish_and_clear();
        manifest.push_category(name, exported, skipped);
    }

    manifest.write(&output_root)?;
    Ok(())
}

/// Partitions every frame into fully-foreground tiles and exports them,
/// either all of them in row-major order or a random per-frame sample.
pub fn run_chop(job: &ChopJob, opts: &RunOptions) -> Result<()> {
    let output_root = dataset::sibling_output_root(&job.dataset, "_chopped")?;
    fs::create_dir_all(&output_root)?;

    let mut rng = make_rng(job.seed);
    let mut manifest = RunManifest::new(
        "chop",
        &job.dataset,
        json!({
            "tile_width": job.tile_width,
            "tile_height": job.tile_height,
            "cutoff": job.cutoff,
            "sample": job.sample,
            "seed": job.seed,
        }),
    );

    for category in dataset::list_categories(&job.dataset)? {
        let name = dataset::category_name(&category);
        let images = dataset::list_images(&category);
        tracing::info!("Scanning category {name}: {} image(s)", images.len());

        let pb = progress_bar(images.len(), opts);
        let mut exported = 0usize;
        let mut skipped = 0usize;

        for path in &images {
            pb.inc(1);
            let frame = match dataset::read_frame(path) {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::warn!("Skipping {}: {e}", path.display());
                    skipped += 1;
                    continue;
                }
            };

            let tiles = chop::chop_frame(&frame, job.tile_width, job.tile_height, job.cutoff);
            tracing::debug!("{}: {} filled tile(s)", path.display(), tiles.len());

            let kept: Vec<chop::Tile> = match job.sample {
                Some(wanted) => {
                    if wanted > tiles.len() {
                        tracing::warn!(
                            "{}: only {} filled tile(s), asked for {wanted}",
                            path.display(),
                            tiles.len()
                        );
                    }
                    let drawn = select::draw_indices(&mut rng, tiles.len(), wanted);
                    let mut slots: Vec<Option<chop::Tile>> =
                        tiles.into_iter().map(Some).collect();
                    drawn.iter().filter_map(|&i| slots[i].take()).collect()
                }
                None => tiles,
            };

            for tile in kept {
                let out = output_root
                    .join(&name)
                    .join(dataset::export_name(exported));
                dataset::write_frame(&out, &tile.image)?;
                exported += 1;
            }
        }

        pb.finish_and_clear();
        manifest.push_category(name, exported, skipped);
    }

    manifest.write(&output_root)?;
    Ok(())
}

/// Accumulates each category's frames into fixed-size batches and exports
/// the selected subset of every batch.
pub fn run_select(job: &SelectJob, opts: &RunOptions) -> Result<()> {
    // Reject impossible selections before touching the filesystem.
    if job.group_size == 0 {
        return Err(CurateError::MalformedBatch {
            len: 0,
            group_size: 0,
        }
        .into());
    }
    if job.count > job.group_size || (job.strategy == Strategy::Best && job.group_size < 2) {
        return Err(CurateError::InvalidSelectionCount {
            strategy: job.strategy.name(),
            count: job.count,
            batch_len: job.group_size,
        }
        .into());
    }

    let output_root = dataset::sibling_output_root(
        &job.dataset,
        &format!("_selection_{}", job.strategy.name()),
    )?;
    fs::create_dir_all(&output_root)?;

    let mut rng = make_rng(job.seed);
    let mut manifest = RunManifest::new(
        "select",
        &job.dataset,
        json!({
            "strategy": job.strategy.name(),
            "count": job.count,
            "group_size": job.group_size,
            "seed": job.seed,
        }),
    );

    let mut report_file = if job.report && job.strategy == Strategy::Best {
        let mut file = fs::File::create(output_root.join("scores.csv"))?;
        writeln!(
            file,
            "category,group,frame,occupancy,lightness,similarity,composite,selected"
        )?;
        Some(file)
    } else {
        if job.report {
            tracing::warn!("--report only applies to the best strategy; ignoring");
        }
        None
    };

    for category in dataset::list_categories(&job.dataset)? {
        let name = dataset::category_name(&category);
        let images = dataset::list_images(&category);
        tracing::info!("Scanning category {name}: {} image(s)", images.len());

        let pb = progress_bar(images.len(), opts);
        let mut frames = Vec::new();
        let mut skipped = 0usize;
        for path in &images {
            pb.inc(1);
            match dataset::read_frame(path) {
                Ok(frame) => frames.push(frame),
                Err(e) => {
                    tracing::warn!("Skipping {}: {e}", path.display());
                    skipped += 1;
                }
            }
        }
        pb.finish_and_clear();

        // Truncation is recomputed after skips so partial groups never
        // reach the selector.
        let usable = frames.len() - frames.len() % job.group_size;
        if usable < frames.len() {
            tracing::warn!(
                "Ignoring {} trailing frame(s) in {name} (not a full group of {})",
                frames.len() - usable,
                job.group_size
            );
            skipped += frames.len() - usable;
            frames.truncate(usable);
        }

        let mut exported = 0usize;
        for (group_index, group) in select::partition(frames, job.group_size)?
            .into_iter()
            .enumerate()
        {
            let group_len = group.len();
            let picked = if job.strategy == Strategy::Best {
                match select::select_best_scored(group, job.count) {
                    Ok((picked, scores)) => {
                        if let Some(file) = report_file.as_mut() {
                            for s in &scores {
                                writeln!(
                                    file,
                                    "{name},{group_index},{},{:.3},{:.3},{:.3},{:.3},{}",
                                    s.index,
                                    s.occupancy,
                                    s.lightness,
                                    s.similarity,
                                    s.composite,
                                    s.selected
                                )?;
                            }
                        }
                        picked
                    }
                    Err(e) => {
                        tracing::error!(
                            "Skipping group {group_index} of {name}: {e}"
                        );
                        skipped += group_len;
                        continue;
                    }
                }
            } else {
                select::select(group, job.strategy, job.count, &mut rng)?
            };

            for frame in picked {
                let out = output_root
                    .join(&name)
                    .join(dataset::export_name(exported));
                dataset::write_frame(&out, &frame)?;
                exported += 1;
            }
        }

        manifest.push_category(name, exported, skipped);
    }

    manifest.write(&output_root)?;
    Ok(())
}
