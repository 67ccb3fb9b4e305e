use gridsweep::{generate_with_rng, reveal, GameConfig, Grid, Position, RevealOutcome};
use proptest::prelude::*;
use proptest::sample::Index;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn board(rows: usize, cols: usize, radius: usize, density: f64, seed: u64) -> Grid {
    let cells = rows * cols;
    let mines = 1 + ((cells - 2) as f64 * density) as usize;
    let mut rng = StdRng::seed_from_u64(seed);
    generate_with_rng(&GameConfig::new(rows, cols, mines, radius), &mut rng).unwrap()
}

fn brute_force_count(grid: &Grid, pos: Position) -> usize {
    let r = grid.radius() as isize;
    let mut count = 0;
    for dr in -r..=r {
        for dc in -r..=r {
            if dr == 0 && dc == 0 {
                continue;
            }
            let row = pos.row as isize + dr;
            let col = pos.col as isize + dc;
            if row < 0 || col < 0 {
                continue;
            }
            if let Ok(cell) = grid.get_cell(Position::new(row as usize, col as usize)) {
                if cell.is_mine() {
                    count += 1;
                }
            }
        }
    }
    count
}

proptest! {
    #[test]
    fn prop_generate_mines_and_adjacency(
        rows in 1usize..12,
        cols in 2usize..12,
        radius in 1usize..4,
        density in 0.0f64..1.0,
        seed: u64,
    ) {
        let grid = board(rows, cols, radius, density, seed);
        let expected_mines = 1 + ((rows * cols - 2) as f64 * density) as usize;

        prop_assert_eq!(grid.mine_positions().count(), expected_mines);
        prop_assert_eq!(grid.mine_count(), expected_mines);
        for (pos, cell) in grid.iter() {
            if !cell.is_mine() {
                prop_assert_eq!(cell.adjacent_mines(), brute_force_count(&grid, pos));
            }
        }
    }

    #[test]
    fn prop_flood_covers_zero_region_and_border(
        rows in 1usize..12,
        cols in 2usize..12,
        radius in 1usize..3,
        density in 0.0f64..0.3,
        seed: u64,
        pick: Index,
    ) {
        let mut grid = board(rows, cols, radius, density, seed);
        let safe: Vec<Position> = grid
            .iter()
            .filter(|(_, cell)| !cell.is_mine())
            .map(|(pos, _)| pos)
            .collect();
        let target = safe[pick.index(safe.len())];

        let outcome = reveal(&mut grid, target).unwrap();
        prop_assert_eq!(outcome, RevealOutcome::Continue);

        for (pos, cell) in grid.iter() {
            if !cell.is_revealed() {
                continue;
            }
            prop_assert!(!cell.is_mine());
            if cell.adjacent_mines() == 0 {
                for neighbor in grid.neighborhood(pos) {
                    prop_assert!(grid[neighbor].is_revealed());
                }
            }
            if pos != target {
                prop_assert!(grid
                    .neighborhood(pos)
                    .any(|n| grid[n].is_revealed() && grid[n].adjacent_mines() == 0));
            }
        }
    }

    #[test]
    fn prop_loss_orders_every_mine(
        rows in 1usize..10,
        cols in 2usize..10,
        density in 0.0f64..1.0,
        seed: u64,
        pick: Index,
    ) {
        let mut grid = board(rows, cols, 1, density, seed);
        let mines: Vec<Position> = grid.mine_positions().collect();
        let target = mines[pick.index(mines.len())];

        prop_assert_eq!(reveal(&mut grid, target).unwrap(), RevealOutcome::Lost);

        let clicked: Vec<Position> = grid
            .iter()
            .filter(|(_, cell)| cell.is_clicked_mine())
            .map(|(pos, _)| pos)
            .collect();
        prop_assert_eq!(clicked, vec![target]);
        for pos in mines {
            let cell = &grid[pos];
            prop_assert!(cell.is_revealed());
            prop_assert!(cell.reveal_order_metric().is_finite());
            prop_assert!(cell.reveal_order_metric() >= 0.0);
        }
    }
}
