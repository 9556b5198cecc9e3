use crate::error::CurateError;
use crate::pipeline::score;
use image::RgbImage;
use rand::Rng;

/// Number of consecutive frames that form one selection batch.
pub const BATCH_SIZE: usize = 20;

/// Composite weights for the `best` strategy.
const OCCUPANCY_WEIGHT: f64 = 5.0;
const LIGHTNESS_WEIGHT: f64 = 5.0;
const SIMILARITY_WEIGHT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    First,
    Last,
    Middle,
    Random,
    Best,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::First => "first",
            Strategy::Last => "last",
            Strategy::Middle => "middle",
            Strategy::Random => "random",
            Strategy::Best => "best",
        }
    }

    /// Parses the CLI surface: a numeric id or the strategy name.
    pub fn from_cli(raw: &str) -> Result<Self, String> {
        match raw {
            "0" | "first" => Ok(Strategy::First),
            "1" | "last" => Ok(Strategy::Last),
            "2" | "middle" => Ok(Strategy::Middle),
            "3" | "random" => Ok(Strategy::Random),
            "4" | "best" => Ok(Strategy::Best),
            other => Err(format!(
                "unknown strategy '{other}' (expected 0-4 or first/last/middle/random/best)"
            )),
        }
    }
}

/// Per-frame metrics backing a `best` ranking.
#[derive(Debug, Clone)]
pub struct FrameScore {
    pub index: usize,
    pub occupancy: f64,
    pub lightness: f64,
    pub similarity: f64,
    pub composite: f64,
    pub selected: bool,
}

/// Splits a category's frames into consecutive groups of `group_size`.
/// The caller is expected to have truncated stragglers away; a count that
/// does not divide evenly is a hard error, never a silent partial group.
pub fn partition(
    frames: Vec<RgbImage>,
    group_size: usize,
) -> Result<Vec<Vec<RgbImage>>, CurateError> {
    if group_size == 0 || frames.len() % group_size != 0 {
        return Err(CurateError::MalformedBatch {
            len: frames.len(),
            group_size,
        });
    }

    let group_count = frames.len() / group_size;
    let mut it = frames.into_iter();
    Ok((0..group_count)
        .map(|_| it.by_ref().take(group_size).collect())
        .collect())
}

/// Returns `count` frames of the batch chosen by `strategy`, in
/// strategy-defined order. The batch is consumed; nothing is retained.
pub fn select<R: Rng>(
    batch: Vec<RgbImage>,
    strategy: Strategy,
    count: usize,
    rng: &mut R,
) -> Result<Vec<RgbImage>, CurateError> {
    let len = batch.len();
    if count > len {
        return Err(CurateError::InvalidSelectionCount {
            strategy: strategy.name(),
            count,
            batch_len: len,
        });
    }
    // Neighbor scoring is undefined on batches below two frames.
    if strategy == Strategy::Best && len < 2 {
        return Err(CurateError::InvalidSelectionCount {
            strategy: strategy.name(),
            count,
            batch_len: len,
        });
    }
    if count == 0 {
        return Ok(Vec::new());
    }

    match strategy {
        Strategy::First => Ok(batch.into_iter().take(count).collect()),
        Strategy::Last => Ok(batch.into_iter().skip(len - count).collect()),
        Strategy::Middle => {
            // Floor division twice: an odd count lands the extra frame
            // after the center.
            let start = len / 2 - count / 2;
            Ok(batch.into_iter().skip(start).take(count).collect())
        }
        Strategy::Random => {
            let drawn = draw_indices(rng, len, count);
            Ok(take_by_indices(batch, &drawn))
        }
        Strategy::Best => select_best_scored(batch, count).map(|(picked, _)| picked),
    }
}

/// `best` selection that also returns the per-frame metrics, for score
/// reporting. Frames are ranked by descending composite; ties keep their
/// original batch order.
pub fn select_best_scored(
    batch: Vec<RgbImage>,
    count: usize,
) -> Result<(Vec<RgbImage>, Vec<FrameScore>), CurateError> {
    if count > batch.len() || batch.len() < 2 {
        return Err(CurateError::InvalidSelectionCount {
            strategy: Strategy::Best.name(),
            count,
            batch_len: batch.len(),
        });
    }

    let mut scores = score_batch(&batch)?;
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .composite
            .partial_cmp(&scores[a].composite)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order.truncate(count);

    for &index in &order {
        scores[index].selected = true;
    }

    Ok((take_by_indices(batch, &order), scores))
}

/// Scores every frame of a batch for the `best` ranking.
///
/// The similarity partner is the previous frame, except for frame 0 which
/// is compared against frame 1 — its term is asymmetric relative to the
/// rest of the batch, and kept that way deliberately.
pub fn score_batch(batch: &[RgbImage]) -> Result<Vec<FrameScore>, CurateError> {
    if batch.len() < 2 {
        return Err(CurateError::InvalidSelectionCount {
            strategy: Strategy::Best.name(),
            count: 0,
            batch_len: batch.len(),
        });
    }

    let mut scores = Vec::with_capacity(batch.len());
    for (index, frame) in batch.iter().enumerate() {
        let neighbor = if index == 0 {
            &batch[1]
        } else {
            &batch[index - 1]
        };

        let occupancy = score::occupancy(frame, 0);
        let lightness = score::lightness(frame);
        let similarity = score::similarity(frame, neighbor)?;
        let composite = OCCUPANCY_WEIGHT * occupancy
            + LIGHTNESS_WEIGHT * lightness
            + SIMILARITY_WEIGHT * similarity;

        scores.push(FrameScore {
            index,
            occupancy,
            lightness,
            similarity,
            composite,
            selected: false,
        });
    }

    Ok(scores)
}

/// Draws `count` distinct indices uniformly without replacement from
/// `0..len`, preserving draw order. The pool shrinks by swap-remove so the
/// batch itself is never touched.
pub(crate) fn draw_indices<R: Rng>(rng: &mut R, len: usize, count: usize) -> Vec<usize> {
    let mut pool: Vec<usize> = (0..len).collect();
    let mut drawn = Vec::with_capacity(count);
    for _ in 0..count.min(len) {
        let choice = rng.random_range(0..pool.len());
        drawn.push(pool.swap_remove(choice));
    }
    drawn
}

/// Moves the frames at `indices` out of the batch, in the order given.
fn take_by_indices(batch: Vec<RgbImage>, indices: &[usize]) -> Vec<RgbImage> {
    let mut slots: Vec<Option<RgbImage>> = batch.into_iter().map(Some).collect();
    let mut out = Vec::with_capacity(indices.len());
    for &index in indices {
        out.extend(slots[index].take());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// 1x1 frames whose red channel encodes the batch index.
    fn indexed_batch(len: usize) -> Vec<RgbImage> {
        (0..len)
            .map(|i| RgbImage::from_pixel(1, 1, Rgb([i as u8, 0, 0])))
            .collect()
    }

    fn indices_of(selection: &[RgbImage]) -> Vec<u8> {
        selection.iter().map(|f| f.get_pixel(0, 0)[0]).collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn first_takes_the_leading_frames() {
        let picked = select(indexed_batch(20), Strategy::First, 5, &mut rng()).unwrap();
        assert_eq!(indices_of(&picked), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn last_takes_the_trailing_frames() {
        let picked = select(indexed_batch(20), Strategy::Last, 3, &mut rng()).unwrap();
        assert_eq!(indices_of(&picked), vec![17, 18, 19]);
    }

    #[test]
    fn middle_centers_the_window() {
        let picked = select(indexed_batch(20), Strategy::Middle, 4, &mut rng()).unwrap();
        assert_eq!(indices_of(&picked), vec![8, 9, 10, 11]);
    }

    #[test]
    fn odd_middle_count_lands_the_extra_frame_after_the_center() {
        let picked = select(indexed_batch(20), Strategy::Middle, 3, &mut rng()).unwrap();
        assert_eq!(indices_of(&picked), vec![9, 10, 11]);
    }

    #[test]
    fn random_draws_distinct_frames() {
        let picked = select(indexed_batch(20), Strategy::Random, 20, &mut rng()).unwrap();
        let mut seen = indices_of(&picked);
        assert_eq!(seen.len(), 20);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 20);
    }

    #[test]
    fn random_is_reproducible_under_a_seed() {
        let a = select(indexed_batch(20), Strategy::Random, 6, &mut rng()).unwrap();
        let b = select(indexed_batch(20), Strategy::Random, 6, &mut rng()).unwrap();
        assert_eq!(indices_of(&a), indices_of(&b));
    }

    #[test]
    fn best_ranks_the_dominant_frame_first() {
        // Frame 5 is bright and fully occupied; every other frame is black.
        let mut batch: Vec<RgbImage> = (0..20)
            .map(|_| RgbImage::from_pixel(10, 10, Rgb([0, 0, 0])))
            .collect();
        batch[5] = RgbImage::from_pixel(10, 10, Rgb([200, 200, 200]));

        let picked = select(batch, Strategy::Best, 1, &mut rng()).unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].get_pixel(0, 0)[0], 200);
    }

    #[test]
    fn best_breaks_ties_by_original_order() {
        let batch: Vec<RgbImage> = (0..4)
            .map(|_| RgbImage::from_pixel(4, 4, Rgb([50, 50, 50])))
            .collect();
        let (_, scores) = select_best_scored(batch, 2).unwrap();
        let selected: Vec<usize> = scores
            .iter()
            .filter(|s| s.selected)
            .map(|s| s.index)
            .collect();
        assert_eq!(selected, vec![0, 1]);
    }

    #[test]
    fn count_above_batch_size_is_rejected() {
        for strategy in [
            Strategy::First,
            Strategy::Last,
            Strategy::Middle,
            Strategy::Random,
            Strategy::Best,
        ] {
            let err = select(indexed_batch(20), strategy, 21, &mut rng()).unwrap_err();
            assert!(matches!(err, CurateError::InvalidSelectionCount { .. }));
        }
    }

    #[test]
    fn zero_count_yields_an_empty_selection() {
        let picked = select(indexed_batch(20), Strategy::Middle, 0, &mut rng()).unwrap();
        assert!(picked.is_empty());
    }

    #[test]
    fn best_requires_two_frames() {
        let err = select(indexed_batch(1), Strategy::Best, 1, &mut rng()).unwrap_err();
        assert!(matches!(err, CurateError::InvalidSelectionCount { .. }));
    }

    #[test]
    fn partition_rejects_uneven_counts() {
        assert!(matches!(
            partition(indexed_batch(25), 20),
            Err(CurateError::MalformedBatch {
                len: 25,
                group_size: 20,
            })
        ));
    }

    #[test]
    fn partition_splits_into_consecutive_groups() {
        let groups = partition(indexed_batch(40), 20).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(indices_of(&groups[0])[0], 0);
        assert_eq!(indices_of(&groups[1])[0], 20);
    }
}
