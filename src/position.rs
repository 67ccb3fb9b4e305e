use itertools::Itertools;
use std::fmt;

/// Zero-based grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Cells within `radius` steps in both directions, excluding `self`,
    /// clipped to a `rows` x `cols` grid. Yields in row-major order.
    pub fn neighborhood(
        self,
        radius: usize,
        rows: usize,
        cols: usize,
    ) -> impl Iterator<Item = Position> {
        let row_end = self.row.saturating_add(radius).saturating_add(1).min(rows);
        let col_end = self.col.saturating_add(radius).saturating_add(1).min(cols);
        let row_range = self.row.saturating_sub(radius)..row_end;
        let col_range = self.col.saturating_sub(radius)..col_end;

        row_range
            .cartesian_product(col_range)
            .map(|(row, col)| Position::new(row, col))
            .filter(move |pos| *pos != self)
    }

    pub fn distance(self, other: Position) -> f64 {
        let dr = self.row as f64 - other.row as f64;
        let dc = self.col as f64 - other.col as f64;
        (dr * dr + dc * dc).sqrt()
    }

    pub(crate) fn to_index(self) -> [usize; 2] {
        [self.row, self.col]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
