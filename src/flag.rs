use crate::{Grid, Position, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Flips the flag on a hidden cell. Revealed cells are left alone.
pub fn toggle_flag(grid: &mut Grid, pos: Position) -> Result<FlagOutcome> {
    let cell = grid.get_cell_mut(pos)?;
    if cell.is_revealed() {
        return Ok(FlagOutcome::NoChange);
    }

    let flagged = !cell.is_flagged();
    cell.set_flagged(flagged);
    grid.bump_version();

    Ok(if flagged {
        FlagOutcome::Flagged
    } else {
        FlagOutcome::Unflagged
    })
}
