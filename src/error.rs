use crate::Position;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error(
        "Invalid configuration: {rows}x{cols} board with {mine_count} mines and radius {radius}"
    )]
    InvalidConfiguration {
        rows: usize,
        cols: usize,
        mine_count: usize,
        radius: usize,
    },
    #[error("Action not allowed in the current game state")]
    InvalidState,
    #[error("Position {0} is out of bounds")]
    OutOfBounds(Position),
    #[error("Mine layout contains a duplicate or out-of-range position")]
    InvalidLayout,
}

pub type Result<T> = std::result::Result<T, GameError>;
