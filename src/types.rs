use crate::compare::GridCell;
use crate::diagnostics::TimingBreakdown;
use serde::Serialize;

/// Best correlation found for one grid cell.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellScore {
    pub cell: GridCell,
    pub score: f64,
    pub matched: bool,
    /// Top-left corner of the best placement in the other mask.
    pub location: Option<(usize, usize)>,
    /// The cell had no variance and scored 1 everywhere.
    pub uniform_template: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub matched: bool,
    pub votes: usize,
    pub votes_required: usize,
    pub threshold: f64,
    pub cells: Vec<CellScore>,
    pub mask_a_size: (usize, usize),
    pub mask_b_size: (usize, usize),
    pub timing: TimingBreakdown,
}

impl MatchReport {
    /// `"1"` for a match, `"0"` otherwise.
    pub fn decision_digit(&self) -> &'static str {
        if self.matched {
            "1"
        } else {
            "0"
        }
    }

    pub fn best_cell(&self) -> Option<&CellScore> {
        self.cells
            .iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}
