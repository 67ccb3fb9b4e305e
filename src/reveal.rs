use crate::{Grid, Position, Result};
use itertools::Itertools;
use std::collections::HashSet;

/// Scale applied to each link of the mine chain when a game is lost.
const CHAIN_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Continue,
    Lost,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Opens the cell at `pos`.
///
/// A hidden cell is revealed and, when it has no adjacent mines, the reveal
/// floods outward through the board's neighborhood. A cell that is already
/// revealed chords instead: every unflagged hidden neighbor is revealed by
/// the same rule. Flagged cells are never opened directly.
///
/// Hitting a mine reveals every mine on the board and returns
/// [`RevealOutcome::Lost`]. Game status is the caller's concern.
pub fn reveal(grid: &mut Grid, pos: Position) -> Result<RevealOutcome> {
    let target = grid.get_cell(pos)?;

    let seeds: Vec<Position> = if target.is_revealed() {
        grid.neighborhood(pos)
            .filter(|&p| !grid[p].is_revealed() && !grid[p].is_flagged())
            .collect()
    } else if target.is_flagged() {
        return Ok(RevealOutcome::NoChange);
    } else {
        vec![pos]
    };

    if seeds.is_empty() {
        return Ok(RevealOutcome::NoChange);
    }

    let outcome = flood(grid, pos, seeds)?;
    grid.bump_version();
    Ok(outcome)
}

/// Runs the reveal cascade to completion with an explicit work-list. A mine
/// does not cut the cascade short; the first one opened ends the game once
/// the work-list is drained.
fn flood(grid: &mut Grid, origin: Position, seeds: Vec<Position>) -> Result<RevealOutcome> {
    let mut queued: HashSet<Position> = seeds.iter().copied().collect();
    let mut pending = seeds;
    let mut opened = 0usize;
    let mut hit = None;

    while let Some(pos) = pending.pop() {
        let cell = grid.get_cell_mut(pos)?;
        if cell.is_revealed() {
            continue;
        }

        cell.reveal(origin.distance(pos));
        opened += 1;

        if cell.is_mine() {
            hit.get_or_insert(pos);
            continue;
        }

        if cell.adjacent_mines() == 0 {
            for neighbor in grid.neighborhood(pos) {
                if !grid[neighbor].is_revealed() && queued.insert(neighbor) {
                    pending.push(neighbor);
                }
            }
        }
    }

    log::debug!("Reveal at {} opened {} cells", origin, opened);

    match hit {
        Some(hit) => {
            detonate(grid, origin, hit)?;
            Ok(RevealOutcome::Lost)
        }
        None => Ok(RevealOutcome::Continue),
    }
}

/// Marks `hit` as the losing cell, uncovers every mine and staggers them
/// along a nearest-neighbor chain starting from `hit`.
fn detonate(grid: &mut Grid, origin: Position, hit: Position) -> Result<()> {
    grid.get_cell_mut(hit)?.set_clicked_mine();

    let mut remaining: Vec<Position> = grid.mine_positions().filter(|&p| p != hit).collect();
    let mut last = hit;
    let mut chain_index = 1usize;

    while let Some(index) = nearest(&remaining, last) {
        let pos = remaining.remove(index);
        let metric = origin.distance(pos) * chain_index as f64 * CHAIN_STEP;
        grid.get_cell_mut(pos)?.reveal(metric);

        last = pos;
        chain_index += 1;
    }

    log::debug!("Mine at {} detonated, {} mines uncovered", hit, chain_index);
    Ok(())
}

/// Index of the candidate closest to `from`; the first one wins ties.
fn nearest(candidates: &[Position], from: Position) -> Option<usize> {
    candidates
        .iter()
        .position_min_by(|a, b| from.distance(**a).total_cmp(&from.distance(**b)))
}
