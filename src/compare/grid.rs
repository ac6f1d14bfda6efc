use serde::Serialize;

/// One cell of the `splits × splits` partition of a mask.
///
/// Covers columns `[x0, x1)` and rows `[y0, y1)`, with boundaries at
/// `k * W / splits` and `k * H / splits` so the cells tile the mask exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
    pub x0: usize,
    pub x1: usize,
    pub y0: usize,
    pub y1: usize,
}

impl GridCell {
    #[inline]
    pub fn width(&self) -> usize {
        self.x1 - self.x0
    }
    #[inline]
    pub fn height(&self) -> usize {
        self.y1 - self.y0
    }
}

/// Row-major list of cells; empty cells only when `w < splits` or `h < splits`.
pub fn partition(w: usize, h: usize, splits: usize) -> Vec<GridCell> {
    let mut cells = Vec::with_capacity(splits * splits);
    for row in 0..splits {
        for col in 0..splits {
            cells.push(GridCell {
                row,
                col,
                x0: col * w / splits,
                x1: (col + 1) * w / splits,
                y0: row * h / splits,
                y1: (row + 1) * h / splits,
            });
        }
    }
    cells
}
