use crate::{GameConfig, GameError, Position, Result};
use ndarray::{Array2, Zip};
use rand::Rng;
use std::ops::Index;
use std::time::Duration;

/// Presentation delay per unit of reveal order metric.
pub const REVEAL_DELAY_STEP: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    is_mine: bool,
    revealed: bool,
    flagged: bool,
    adjacent_mines: usize,
    clicked_mine: bool,
    reveal_order_metric: f64,
}

impl Cell {
    pub fn is_mine(&self) -> bool {
        self.is_mine
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_flagged(&self) -> bool {
        self.flagged
    }

    pub fn adjacent_mines(&self) -> usize {
        self.adjacent_mines
    }

    /// Only set on the mine that ended the game.
    pub fn is_clicked_mine(&self) -> bool {
        self.clicked_mine
    }

    pub fn reveal_order_metric(&self) -> f64 {
        self.reveal_order_metric
    }

    /// How long a renderer should wait before animating this cell open.
    pub fn reveal_delay(&self) -> Duration {
        REVEAL_DELAY_STEP.mul_f64(self.reveal_order_metric)
    }

    pub(crate) fn reveal(&mut self, metric: f64) {
        self.revealed = true;
        self.flagged = false;
        self.reveal_order_metric = metric;
    }

    pub(crate) fn set_flagged(&mut self, flagged: bool) {
        self.flagged = flagged;
    }

    pub(crate) fn set_clicked_mine(&mut self) {
        self.clicked_mine = true;
    }
}

/// Rectangular board of cells indexed by `(row, col)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cells: Array2<Cell>,
    radius: usize,
    mine_count: usize,
    version: u64,
}

/// Builds a fresh board using the thread-local random source.
pub fn generate(config: &GameConfig) -> Result<Grid> {
    generate_with_rng(config, &mut rand::thread_rng())
}

/// Builds a fresh board, drawing mine positions from `rng`.
pub fn generate_with_rng<R: Rng>(config: &GameConfig, rng: &mut R) -> Result<Grid> {
    config.validate()?;

    let mut grid = Grid::empty(config.rows, config.cols, config.radius);
    let mut mines_placed = 0;

    while mines_placed < config.mine_count {
        let pos = Position::new(rng.gen_range(0..config.rows), rng.gen_range(0..config.cols));
        let cell = &mut grid.cells[pos.to_index()];

        if !cell.is_mine {
            cell.is_mine = true;
            mines_placed += 1;
        }
    }

    grid.mine_count = mines_placed;
    grid.compute_adjacency();

    log::debug!(
        "Generated {}x{} board with {} mines (radius {})",
        config.rows,
        config.cols,
        config.mine_count,
        config.radius
    );
    Ok(grid)
}

impl Grid {
    fn empty(rows: usize, cols: usize, radius: usize) -> Self {
        Grid {
            cells: Array2::from_elem((rows, cols), Cell::default()),
            radius,
            mine_count: 0,
            version: 0,
        }
    }

    /// Builds a board with mines at exactly the given positions.
    pub fn with_mines(
        rows: usize,
        cols: usize,
        radius: usize,
        mines: &[Position],
    ) -> Result<Self> {
        let cell_count = rows.saturating_mul(cols);
        if rows == 0 || cols == 0 || radius == 0 || mines.len() >= cell_count {
            return Err(GameError::InvalidConfiguration {
                rows,
                cols,
                mine_count: mines.len(),
                radius,
            });
        }

        let mut grid = Grid::empty(rows, cols, radius);
        for &pos in mines {
            let cell = grid
                .cells
                .get_mut(pos.to_index())
                .ok_or(GameError::InvalidLayout)?;
            if cell.is_mine {
                return Err(GameError::InvalidLayout);
            }
            cell.is_mine = true;
        }

        grid.mine_count = mines.len();
        grid.compute_adjacency();
        Ok(grid)
    }

    /// The degenerate 1x1 board without mines, used when a configuration
    /// cannot be honoured.
    pub fn fallback() -> Self {
        Grid::empty(1, 1, 1)
    }

    fn compute_adjacency(&mut self) {
        let counts = Array2::from_shape_fn(self.cells.dim(), |(row, col)| {
            self.count_adjacent_mines(Position::new(row, col))
        });

        Zip::from(&mut self.cells)
            .and(&counts)
            .for_each(|cell, &count| {
                cell.adjacent_mines = if cell.is_mine { 0 } else { count };
            });
    }

    fn count_adjacent_mines(&self, pos: Position) -> usize {
        self.neighborhood(pos)
            .filter(|p| self.cells[p.to_index()].is_mine)
            .count()
    }

    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.cells.dim()
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    /// Incremented on every state change, so hosts can skip redraws.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }

    pub fn is_within_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows() && pos.col < self.cols()
    }

    pub fn get_cell(&self, pos: Position) -> Result<&Cell> {
        self.cells
            .get(pos.to_index())
            .ok_or(GameError::OutOfBounds(pos))
    }

    pub(crate) fn get_cell_mut(&mut self, pos: Position) -> Result<&mut Cell> {
        self.cells
            .get_mut(pos.to_index())
            .ok_or(GameError::OutOfBounds(pos))
    }

    /// The Chebyshev neighborhood of `pos` using this board's radius.
    pub fn neighborhood(&self, pos: Position) -> impl Iterator<Item = Position> {
        pos.neighborhood(self.radius, self.rows(), self.cols())
    }

    /// All cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), cell)| (Position::new(row, col), cell))
    }

    pub fn mine_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.iter()
            .filter(|(_, cell)| cell.is_mine)
            .map(|(pos, _)| pos)
    }

    pub fn flagged_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.flagged).count()
    }

    pub fn revealed_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.revealed).count()
    }

    pub fn all_mines_flagged(&self) -> bool {
        self.cells
            .iter()
            .filter(|cell| cell.is_mine)
            .all(|cell| cell.flagged)
    }
}

impl Index<Position> for Grid {
    type Output = Cell;

    fn index(&self, pos: Position) -> &Self::Output {
        &self.cells[pos.to_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_places_exact_mine_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = generate_with_rng(&GameConfig::new(10, 12, 30, 1), &mut rng).unwrap();

        assert_eq!(grid.dimensions(), (10, 12));
        assert_eq!(grid.mine_count(), 30);
        assert_eq!(grid.mine_positions().count(), 30);
    }

    #[test]
    fn test_generate_starts_hidden() {
        let grid = generate(&GameConfig::default()).unwrap();
        assert!(grid.iter().all(|(_, cell)| !cell.is_revealed()
            && !cell.is_flagged()
            && !cell.is_clicked_mine()
            && cell.reveal_order_metric() == 0.0));
        assert_eq!(grid.version(), 0);
    }

    #[test]
    fn test_generate_nearly_full_board() {
        let mut rng = StdRng::seed_from_u64(99);
        let grid = generate_with_rng(&GameConfig::new(3, 3, 8, 1), &mut rng).unwrap();

        let safe: Vec<_> = grid.iter().filter(|(_, c)| !c.is_mine()).collect();
        assert_eq!(safe.len(), 1);
        let (pos, cell) = safe[0];
        assert_eq!(cell.adjacent_mines(), grid.neighborhood(pos).count());
    }

    #[test]
    fn test_generate_rejects_invalid_config() {
        assert!(matches!(
            generate(&GameConfig::new(0, 5, 1, 1)),
            Err(GameError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            generate(&GameConfig::new(2, 2, 4, 1)),
            Err(GameError::InvalidConfiguration { mine_count: 4, .. })
        ));
    }

    #[test]
    fn test_adjacency_radius_one() {
        // M . .
        // . . .
        // . . M
        let grid = Grid::with_mines(
            3,
            3,
            1,
            &[Position::new(0, 0), Position::new(2, 2)],
        )
        .unwrap();

        assert_eq!(grid[Position::new(1, 1)].adjacent_mines(), 2);
        assert_eq!(grid[Position::new(0, 1)].adjacent_mines(), 1);
        assert_eq!(grid[Position::new(0, 2)].adjacent_mines(), 0);
        assert_eq!(grid[Position::new(0, 0)].adjacent_mines(), 0);
    }

    #[test]
    fn test_adjacency_radius_two() {
        let grid = Grid::with_mines(5, 5, 2, &[Position::new(0, 0)]).unwrap();

        assert_eq!(grid[Position::new(2, 2)].adjacent_mines(), 1);
        assert_eq!(grid[Position::new(0, 2)].adjacent_mines(), 1);
        assert_eq!(grid[Position::new(3, 0)].adjacent_mines(), 0);
        assert_eq!(grid[Position::new(2, 3)].adjacent_mines(), 0);
    }

    #[test]
    fn test_with_mines_rejects_bad_layouts() {
        assert_eq!(
            Grid::with_mines(2, 2, 1, &[Position::new(2, 0)]),
            Err(GameError::InvalidLayout)
        );
        assert_eq!(
            Grid::with_mines(2, 2, 1, &[Position::new(1, 1), Position::new(1, 1)]),
            Err(GameError::InvalidLayout)
        );
        assert!(Grid::with_mines(1, 1, 1, &[Position::new(0, 0)]).is_err());
        assert!(Grid::with_mines(2, 2, 0, &[]).is_err());
    }

    #[test]
    fn test_fallback_grid() {
        let grid = Grid::fallback();
        assert_eq!(grid.dimensions(), (1, 1));
        assert_eq!(grid.mine_count(), 0);
        assert!(!grid[Position::new(0, 0)].is_mine());
    }

    #[test]
    fn test_get_cell_out_of_bounds() {
        let grid = Grid::fallback();
        let pos = Position::new(0, 1);
        assert!(!grid.is_within_bounds(pos));
        assert_eq!(grid.get_cell(pos), Err(GameError::OutOfBounds(pos)));
    }

    #[test]
    fn test_reveal_delay() {
        let mut cell = Cell::default();
        assert_eq!(cell.reveal_delay(), Duration::ZERO);
        cell.reveal(4.0);
        assert!((cell.reveal_delay().as_secs_f64() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_reveal_clears_flag() {
        let mut cell = Cell::default();
        cell.set_flagged(true);
        cell.reveal(0.0);
        assert!(cell.is_revealed());
        assert!(!cell.is_flagged());
    }
}
