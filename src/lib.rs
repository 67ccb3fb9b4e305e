pub mod board;
pub mod config;
pub mod error;
pub mod flag;
pub mod game;
pub mod position;
pub mod reveal;
pub mod timer;

pub use board::{generate, generate_with_rng, Cell, Grid};
pub use config::{ConfigError, GameConfig, Settings};
pub use error::{GameError, Result};
pub use flag::{toggle_flag, FlagOutcome};
pub use game::{Action, Game, GameStatus};
pub use position::Position;
pub use reveal::{reveal, RevealOutcome};
pub use timer::Timer;
