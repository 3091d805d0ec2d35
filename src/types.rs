use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two sides. Serialized as its marker, `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Player {
    P1,
    P2,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Self::P1 => Self::P2,
            Self::P2 => Self::P1,
        }
    }

    /// Board marker used in serialized boards and the fingerprint.
    pub fn marker(self) -> u8 {
        match self {
            Self::P1 => 1,
            Self::P2 => 2,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.marker())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid player marker: {0} (expected 1 or 2)")]
pub struct InvalidPlayer(pub u8);

impl TryFrom<u8> for Player {
    type Error = InvalidPlayer;

    fn try_from(marker: u8) -> Result<Self, Self::Error> {
        match marker {
            1 => Ok(Self::P1),
            2 => Ok(Self::P2),
            other => Err(InvalidPlayer(other)),
        }
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> Self {
        player.marker()
    }
}

/// Cell occupancy: empty, or claimed by exactly one player.
pub type Cell = Option<Player>;

/// A board coordinate. Signed so that out-of-range input from a host is representable
/// and rejected by bounds checks instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Claimed-cell count per player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player1: u32,
    pub player2: u32,
}

impl Score {
    pub fn of(&self, player: Player) -> u32 {
        match player {
            Player::P1 => self.player1,
            Player::P2 => self.player2,
        }
    }

    pub fn total(&self) -> u32 {
        self.player1 + self.player2
    }

    /// Rounded share of the claimed cells held by each side, both 0 when nothing is claimed.
    pub fn territory_percent(&self) -> Territory {
        let total = self.total();
        if total == 0 {
            return Territory::default();
        }
        let share = |count: u32| (f64::from(count) * 100.0 / f64::from(total)).round() as u32;
        Territory {
            player1: share(self.player1),
            player2: share(self.player2),
        }
    }
}

/// Percentage of the claimed cells held by each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Territory {
    pub player1: u32,
    pub player2: u32,
}

/// One entry of the move log: who played where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub player: Player,
    pub position: Position,
}

impl fmt::Display for MoveRecord {
    /// Display coordinates are 1-based.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: ({}, {})",
            self.player,
            i64::from(self.position.x) + 1,
            i64::from(self.position.y) + 1
        )
    }
}

/// Read-only projection of a session handed to the host for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateView {
    /// Rows of markers: 0=empty, 1=player 1, 2=player 2.
    pub board: Vec<Vec<u8>>,
    pub board_size: usize,
    pub current_player: u8,
    pub score: Score,
    pub territory: Territory,
    pub move_count: usize,
    pub move_log: Vec<String>,
    pub is_game_over: bool,
    /// 0 when the game is running or tied.
    pub winner: u8,
    pub fingerprint: String,
    /// Display-only; never parsed back.
    pub fingerprint_prefix: String,
    pub elapsed_secs: u64,
    pub can_undo: bool,
    pub can_redo: bool,
}
