use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardError, DEFAULT_BOARD_SIZE};

pub const DEFAULT_HISTORY_LIMIT: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid board size: {0}")]
    InvalidBoardSize(#[from] BoardError),

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Per-session settings. Missing keys fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub board_size: usize,
    /// Snapshots kept on the undo stack; the oldest is dropped beyond this. `None` keeps all.
    pub history_limit: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

impl SessionConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.empty_board().map(drop)
    }

    /// The empty board this config starts games on.
    pub fn empty_board(&self) -> Result<Board, ConfigError> {
        Ok(Board::new_empty(self.board_size)?)
    }
}
