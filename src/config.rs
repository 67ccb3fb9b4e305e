use crate::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_ROWS: usize = 16;
pub const DEFAULT_COLS: usize = 16;
pub const DEFAULT_MINES: usize = 40;
pub const DEFAULT_RADIUS: usize = 1;

/// Board shape and rules. Changing any field means a fresh board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub mine_count: usize,
    pub radius: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            mine_count: DEFAULT_MINES,
            radius: DEFAULT_RADIUS,
        }
    }
}

impl GameConfig {
    pub fn new(rows: usize, cols: usize, mine_count: usize, radius: usize) -> Self {
        Self {
            rows,
            cols,
            mine_count,
            radius,
        }
    }

    /// Builds a config from raw text fields. Anything that is not a positive
    /// integer is read as `1`.
    pub fn from_inputs(rows: &str, cols: &str, mine_count: &str, radius: &str) -> Self {
        Self::new(
            parse_field(rows),
            parse_field(cols),
            parse_field(mine_count),
            parse_field(radius),
        )
    }

    pub fn cell_count(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    pub fn validate(&self) -> Result<()> {
        let valid = self.rows >= 1
            && self.cols >= 1
            && self.mine_count >= 1
            && self.radius >= 1
            && self.cell_count() > self.mine_count;

        if valid {
            Ok(())
        } else {
            Err(GameError::InvalidConfiguration {
                rows: self.rows,
                cols: self.cols,
                mine_count: self.mine_count,
                radius: self.radius,
            })
        }
    }

    /// Lowers the mine count so that at least one safe cell remains.
    pub fn clamped(self) -> Self {
        let max_mines = self.cell_count().saturating_sub(1);
        if self.mine_count > max_mines {
            log::warn!(
                "Clamping mine count from {} to {} for a {}x{} board",
                self.mine_count,
                max_mines,
                self.rows,
                self.cols
            );
            Self {
                mine_count: max_mines,
                ..self
            }
        } else {
            self
        }
    }
}

fn parse_field(input: &str) -> usize {
    match input.trim().parse::<usize>() {
        Ok(value) if value > 0 => value,
        _ => 1,
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Settings file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("Settings file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Settings could not be serialized: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Persisted user preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub board: GameConfig,
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gridsweep").join("settings.toml"))
    }

    /// Reads settings from `path`; a missing file gives the defaults.
    pub fn load(path: &Path) -> std::result::Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> std::result::Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string(self)?)?;
        log::debug!("Saved settings to {}", path.display());
        Ok(())
    }
}
