//! Grid-voting comparison of two binary vein masks.
//!
//! Mask A is cut into a `splits × splits` grid. Every cell is used as a
//! template and searched over the whole of mask B with zero-mean normalized
//! cross-correlation; a cell votes when its best score is strictly above the
//! threshold. The masks match when the votes reach the required count.
//!
//! The search slides each cell over all of B, so cells are free to find
//! their counterpart anywhere. That makes the decision tolerant of
//! translation between captures but also means it is not symmetric.

pub mod grid;
pub mod ncc;

use crate::diagnostics::TimingBreakdown;
use crate::error::{MatchError, Result};
use crate::image::Image;
use crate::params::CompareParams;
use crate::types::{CellScore, MatchReport};
use log::{debug, warn};
use rayon::prelude::*;
use std::time::Instant;

pub use grid::{partition, GridCell};
pub use ncc::{CorrelationSearch, Peak};

#[derive(Clone, Debug, Default)]
pub struct Comparator {
    params: CompareParams,
}

/// A cell votes only when its score is strictly above the threshold.
#[inline]
pub fn cell_matches(score: f64, threshold: f64) -> bool {
    score > threshold
}

#[inline]
pub fn decide(votes: usize, votes_required: usize) -> bool {
    votes >= votes_required
}

impl Comparator {
    pub fn new(params: CompareParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CompareParams {
        &self.params
    }

    /// Match decision only.
    pub fn matches(&self, mask_a: &Image, mask_b: &Image) -> Result<bool> {
        self.compare(mask_a, mask_b).map(|report| report.matched)
    }

    /// Score every cell of `mask_a` against `mask_b` and tally the votes.
    ///
    /// Both masks must be single-channel, share their dimensions, and be at
    /// least `splits` pixels in each direction.
    pub fn compare(&self, mask_a: &Image, mask_b: &Image) -> Result<MatchReport> {
        self.params.validate()?;
        check_mask(mask_a, "first")?;
        check_mask(mask_b, "second")?;
        let splits = self.params.splits;
        let (size_a, size_b) = (mask_a.dimensions(), mask_b.dimensions());
        if size_a != size_b || size_a.0 < splits || size_a.1 < splits {
            return Err(MatchError::DimensionMismatch {
                left: size_a,
                right: size_b,
                splits,
            });
        }

        let t0 = Instant::now();
        let mut timing = TimingBreakdown::default();
        let search = CorrelationSearch::new(mask_b);
        timing.push("spectrum", t0.elapsed().as_secs_f64() * 1000.0);

        let ts = Instant::now();
        let threshold = self.params.match_threshold;
        let cells = partition(size_a.0, size_a.1, splits)
            .into_par_iter()
            .map(|cell| score_cell(&search, mask_a, cell, threshold))
            .collect::<Result<Vec<_>>>()?;
        timing.push("cells", ts.elapsed().as_secs_f64() * 1000.0);

        let votes = cells.iter().filter(|c| c.matched).count();
        let uniform = cells.iter().filter(|c| c.uniform_template).count();
        if uniform > 0 {
            debug!(
                "Comparator: {uniform}/{} cells are uniform and vote unconditionally",
                cells.len()
            );
        }
        if uniform >= self.params.votes_required {
            warn!(
                "Comparator: {uniform} uniform cells already satisfy votes_required={}; \
                 the first mask carries too little structure",
                self.params.votes_required
            );
        }
        for c in &cells {
            debug!(
                "Comparator cell r{}c{} {}x{} score={:.4} at={:?} matched={}",
                c.cell.row,
                c.cell.col,
                c.cell.width(),
                c.cell.height(),
                c.score,
                c.location,
                c.matched
            );
        }

        timing.total_ms = t0.elapsed().as_secs_f64() * 1000.0;
        Ok(MatchReport {
            matched: decide(votes, self.params.votes_required),
            votes,
            votes_required: self.params.votes_required,
            threshold,
            cells,
            mask_a_size: size_a,
            mask_b_size: size_b,
            timing,
        })
    }
}

fn check_mask(mask: &Image, which: &str) -> Result<()> {
    if mask.is_empty() {
        return Err(MatchError::invalid_image(format!("{which} mask is empty")));
    }
    if mask.channels != 1 {
        return Err(MatchError::invalid_image(format!(
            "{which} mask has {} channels, expected 1",
            mask.channels
        )));
    }
    if mask.data.len() != mask.w * mask.h {
        return Err(MatchError::invalid_image(format!(
            "{which} mask holds {} samples, {}x{} needs {}",
            mask.data.len(),
            mask.w,
            mask.h,
            mask.w * mask.h
        )));
    }
    Ok(())
}

fn score_cell(
    search: &CorrelationSearch,
    mask_a: &Image,
    cell: GridCell,
    threshold: f64,
) -> Result<CellScore> {
    let template = crate::filters::translate(
        mask_a,
        -(cell.x0 as isize),
        -(cell.y0 as isize),
        cell.width(),
        cell.height(),
    )?;
    let peak = search.best_match(&template);
    let score = peak.map_or(0.0, |p| p.score);
    Ok(CellScore {
        cell,
        score,
        matched: cell_matches(score, threshold),
        location: peak.filter(|p| !p.uniform_template).map(|p| (p.x, p.y)),
        uniform_template: peak.is_some_and(|p| p.uniform_template),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speckle(w: usize, h: usize, seed: u64) -> Image {
        let mut state = seed;
        let data = (0..w * h)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                if (state >> 63) == 1 {
                    255
                } else {
                    0
                }
            })
            .collect();
        Image::from_raw(w, h, 1, data).unwrap()
    }

    #[test]
    fn threshold_is_strict() {
        assert!(!cell_matches(0.45, 0.45));
        assert!(cell_matches(0.450001, 0.45));
        assert!(!cell_matches(0.2, 0.45));
    }

    #[test]
    fn votes_are_inclusive() {
        assert!(!decide(2, 3));
        assert!(decide(3, 3));
        assert!(decide(16, 3));
    }

    #[test]
    fn mask_matches_itself() {
        let mask = speckle(64, 48, 1);
        let report = Comparator::default().compare(&mask, &mask).unwrap();
        assert!(report.matched);
        assert_eq!(report.votes, 16);
        for c in &report.cells {
            assert!(c.score > 0.99, "cell {:?} scored {}", c.cell, c.score);
            assert_eq!(c.location, Some((c.cell.x0, c.cell.y0)));
        }
    }

    #[test]
    fn unrelated_speckle_does_not_match() {
        let a = speckle(64, 64, 10);
        let b = speckle(64, 64, 20);
        let report = Comparator::default().compare(&a, &b).unwrap();
        assert!(!report.matched);
        assert_eq!(report.votes, 0);
    }

    #[test]
    fn uniform_mask_votes_in_every_cell() {
        let blank = Image::filled(32, 32, 1, 255);
        let report = Comparator::default().compare(&blank, &blank).unwrap();
        assert!(report.matched);
        assert!(report.cells.iter().all(|c| c.uniform_template));
    }

    #[test]
    fn mismatched_sizes_are_rejected() {
        let a = speckle(64, 64, 1);
        let b = speckle(32, 64, 1);
        let err = Comparator::default().compare(&a, &b).unwrap_err();
        assert!(matches!(err, MatchError::DimensionMismatch { .. }));
    }

    #[test]
    fn masks_smaller_than_grid_are_rejected() {
        let a = speckle(3, 8, 1);
        let err = Comparator::default().matches(&a, &a).unwrap_err();
        assert!(matches!(
            err,
            MatchError::DimensionMismatch { splits: 4, .. }
        ));
    }

    #[test]
    fn buffer_shorter_than_dimensions_is_rejected() {
        let short = Image {
            w: 16,
            h: 16,
            channels: 1,
            data: vec![0; 10],
        };
        let good = speckle(16, 16, 1);
        for (a, b) in [(&short, &good), (&good, &short)] {
            let err = Comparator::default().matches(a, b).unwrap_err();
            assert!(matches!(err, MatchError::InvalidImage { .. }), "{err}");
        }
    }

    #[test]
    fn colour_masks_are_rejected() {
        let a = Image::filled(16, 16, 3, 0);
        let err = Comparator::default().matches(&a, &a).unwrap_err();
        assert!(matches!(err, MatchError::InvalidImage { .. }));
    }
}
