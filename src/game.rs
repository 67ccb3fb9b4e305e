use crate::board::{generate_with_rng, Cell, Grid};
use crate::flag::{self, FlagOutcome};
use crate::reveal::{self, RevealOutcome};
use crate::{GameConfig, GameError, Position, Result, Timer};
use rand::Rng;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Reveal,
    Flag,
}

/// One round of play: the board, its status and the clock.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    grid: Grid,
    status: GameStatus,
    timer: Timer,
    warning: Option<GameError>,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_rng(config, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng>(config: GameConfig, rng: &mut R) -> Result<Self> {
        let grid = generate_with_rng(&config, rng)?;
        Ok(Self::from_parts(config, grid, None))
    }

    /// Wraps an existing board, e.g. one built with [`Grid::with_mines`].
    pub fn from_grid(grid: Grid) -> Self {
        let (rows, cols) = grid.dimensions();
        let config = GameConfig::new(rows, cols, grid.mine_count(), grid.radius());
        Self::from_parts(config, grid, None)
    }

    /// Like [`Game::new`], but never fails: the mine count is clamped and a
    /// configuration that still cannot be honoured yields the 1x1 fallback
    /// board, with the error kept in [`Game::warning`].
    pub fn new_or_fallback(config: GameConfig) -> Self {
        Self::new_or_fallback_with_rng(config, &mut rand::thread_rng())
    }

    pub fn new_or_fallback_with_rng<R: Rng>(config: GameConfig, rng: &mut R) -> Self {
        let config = config.clamped();
        match generate_with_rng(&config, rng) {
            Ok(grid) => Self::from_parts(config, grid, None),
            Err(e) => {
                log::warn!("{}; using fallback board", e);
                Self::from_parts(config, Grid::fallback(), Some(e))
            }
        }
    }

    fn from_parts(config: GameConfig, grid: Grid, warning: Option<GameError>) -> Self {
        Self {
            config,
            grid,
            status: GameStatus::InProgress,
            timer: Timer::new(),
            warning,
        }
    }

    /// Replaces this game with a fresh one for `config`. The returned error,
    /// if any, is the reason the fallback board is now in play.
    pub fn reconfigure(&mut self, config: GameConfig) -> Result<()> {
        self.reconfigure_with_rng(config, &mut rand::thread_rng())
    }

    pub fn reconfigure_with_rng<R: Rng>(&mut self, config: GameConfig, rng: &mut R) -> Result<()> {
        *self = Self::new_or_fallback_with_rng(config, rng);
        log::info!(
            "Reconfigured to {}x{} with {} mines (radius {})",
            self.config.rows,
            self.config.cols,
            self.config.mine_count,
            self.config.radius
        );
        match &self.warning {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    /// New board, same configuration.
    pub fn restart(&mut self) -> Result<()> {
        self.reconfigure(self.config)
    }

    /// Applies `action` and reports the resulting status. Unlike the direct
    /// methods, a finished game answers with [`GameError::InvalidState`].
    pub fn perform_action(&mut self, pos: Position, action: Action) -> Result<GameStatus> {
        if self.status.is_finished() {
            return Err(GameError::InvalidState);
        }

        match action {
            Action::Reveal => self.reveal(pos).map(|_| self.status),
            Action::Flag => self.toggle_flag(pos).map(|_| self.status),
        }
    }

    /// Reveals or chords at `pos`. Ignored once the game is over, and for a
    /// flagged cell, which does not start the clock either.
    pub fn reveal(&mut self, pos: Position) -> Result<RevealOutcome> {
        let flagged = self.grid.get_cell(pos)?.is_flagged();
        if self.status.is_finished() || flagged {
            return Ok(RevealOutcome::NoChange);
        }

        let now = Instant::now();
        self.timer.start(now);

        let outcome = reveal::reveal(&mut self.grid, pos)?;
        match outcome {
            RevealOutcome::Lost => {
                self.status = GameStatus::Lost;
                self.timer.freeze(now);
                log::info!("Mine hit at {}, game lost", pos);
            }
            RevealOutcome::Continue => {
                self.check_win();
            }
            RevealOutcome::NoChange => {}
        }
        Ok(outcome)
    }

    /// Toggles the flag at `pos`. Ignored once the game is over.
    pub fn toggle_flag(&mut self, pos: Position) -> Result<FlagOutcome> {
        self.grid.get_cell(pos)?;
        if self.status.is_finished() {
            return Ok(FlagOutcome::NoChange);
        }

        let outcome = flag::toggle_flag(&mut self.grid, pos)?;
        if outcome.has_update() {
            self.check_win();
        }
        Ok(outcome)
    }

    /// True once every mine is flagged. The first success moves the game to
    /// [`GameStatus::Won`]; a lost game never wins.
    pub fn check_win(&mut self) -> bool {
        match self.status {
            GameStatus::Won => true,
            GameStatus::Lost => false,
            GameStatus::InProgress => {
                if !self.grid.all_mines_flagged() {
                    return false;
                }
                self.status = GameStatus::Won;
                self.timer.freeze(Instant::now());
                log::info!("All mines flagged, game won in {}s", self.elapsed_secs());
                true
            }
        }
    }

    pub fn tick(&mut self) -> u64 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> u64 {
        self.timer.tick(now)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn get_cell(&self, pos: Position) -> Result<&Cell> {
        self.grid.get_cell(pos)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.grid.dimensions()
    }

    pub fn warning(&self) -> Option<&GameError> {
        self.warning.as_ref()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.timer.elapsed_secs()
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.timer.started_at()
    }

    /// Mines minus flags placed. Negative when over-flagged.
    pub fn mines_left(&self) -> isize {
        self.grid.mine_count() as isize - self.grid.flagged_count() as isize
    }
}
