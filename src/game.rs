use im::Vector;
use serde::{Deserialize, Serialize};
use web_time::{SystemTime, UNIX_EPOCH};

use crate::board::{Board, BoardError};
use crate::fingerprint;
use crate::rules::{self, Termination};
use crate::types::{MoveRecord, Player, Position, Score};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("game is already over")]
    GameOver,

    #[error("illegal move at {0}")]
    IllegalMove(Position),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Why an externally supplied snapshot was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("fingerprint does not match the state")]
    FingerprintMismatch,

    #[error("move {0} lies outside the board")]
    MoveOffBoard(Position),

    #[error("move {0} does not point at a claimed cell")]
    MoveOnEmptyCell(Position),

    #[error("{moves} moves recorded but {occupied} cells claimed")]
    HistoryLength { moves: usize, occupied: usize },

    #[error("stored score {stored:?} differs from board count {actual:?}")]
    ScoreMismatch { stored: Score, actual: Score },

    #[error("stored game-over flag or winner contradicts the board")]
    TerminationMismatch,
}

/// Immutable snapshot of a game.
///
/// Snapshots are never modified once built; playing a move yields a new one. Board cells and
/// move history are persistent collections, so cloning a snapshot is cheap and successive
/// snapshots share structure.
///
/// The serialized form is the exchange format for exported games. A deserialized snapshot is
/// untrusted until [`GameState::validate`] accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    board: Board,
    current_player: Player,
    move_history: Vector<Position>,
    score: Score,
    is_game_over: bool,
    winner: Option<Player>,
    fingerprint: String,
    /// Milliseconds since the Unix epoch when the game started.
    started_at: u64,
    /// Milliseconds since the Unix epoch when this snapshot was built.
    created_at: u64,
}

impl GameState {
    /// A fresh game on `board`, player 1 to move.
    pub fn initial(board: Board, now_ms: u64) -> Self {
        Self::stamped(
            board,
            Player::P1,
            Vector::new(),
            Termination::IN_PROGRESS,
            now_ms,
            now_ms,
        )
    }

    /// Builds the successor snapshot after the side to move claims `pos`.
    pub fn play(&self, pos: Position, now_ms: u64) -> Result<Self, MoveError> {
        if self.is_game_over {
            return Err(MoveError::GameOver);
        }
        let mover = self.current_player;
        if !rules::is_valid_move(pos, &self.board, mover) {
            return Err(MoveError::IllegalMove(pos));
        }

        let board = self.board.with_cell_set(pos, mover)?;
        let termination = rules::evaluate_termination(&board, mover);
        let mut move_history = self.move_history.clone();
        move_history.push_back(pos);

        Ok(Self::stamped(
            board,
            mover.opponent(),
            move_history,
            termination,
            self.started_at,
            now_ms,
        ))
    }

    fn stamped(
        board: Board,
        current_player: Player,
        move_history: Vector<Position>,
        termination: Termination,
        started_at: u64,
        created_at: u64,
    ) -> Self {
        let fingerprint = fingerprint::digest(&board, current_player, &move_history);
        Self {
            score: rules::compute_score(&board),
            board,
            current_player,
            move_history,
            is_game_over: termination.is_game_over,
            winner: termination.winner,
            fingerprint,
            started_at,
            created_at,
        }
    }

    /// Checks an untrusted snapshot before it may be installed.
    ///
    /// The fingerprint covers board, side to move and history; the remaining fields are
    /// recomputed from the board and must agree with what is stored.
    pub fn validate(&self) -> Result<(), StateError> {
        if !fingerprint::verify(self) {
            return Err(StateError::FingerprintMismatch);
        }
        for &pos in &self.move_history {
            match self.board.cell_at(pos) {
                Ok(Some(_)) => {}
                Ok(None) => return Err(StateError::MoveOnEmptyCell(pos)),
                Err(_) => return Err(StateError::MoveOffBoard(pos)),
            }
        }
        let occupied = self.board.occupied_count();
        if self.move_history.len() != occupied {
            return Err(StateError::HistoryLength {
                moves: self.move_history.len(),
                occupied,
            });
        }
        let actual = rules::compute_score(&self.board);
        if self.score != actual {
            return Err(StateError::ScoreMismatch {
                stored: self.score,
                actual,
            });
        }
        let expected = if self.move_history.is_empty() {
            Termination::IN_PROGRESS
        } else {
            rules::evaluate_termination(&self.board, self.current_player.opponent())
        };
        if (self.is_game_over, self.winner) != (expected.is_game_over, expected.winner) {
            return Err(StateError::TerminationMismatch);
        }
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn move_history(&self) -> &Vector<Position> {
        &self.move_history
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    /// `None` while the game runs and when it ended in a tie.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn started_at(&self) -> u64 {
        self.started_at
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Whole seconds since the game started, saturating at zero for clocks that went backwards.
    pub fn elapsed_secs(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at) / 1000
    }

    /// Moves with the player who made each one. Turns strictly alternate from player 1.
    pub fn move_log(&self) -> impl Iterator<Item = MoveRecord> + '_ {
        self.move_history.iter().enumerate().map(|(i, &position)| MoveRecord {
            player: if i % 2 == 0 { Player::P1 } else { Player::P2 },
            position,
        })
    }
}

/// Wall-clock milliseconds since the Unix epoch; works in the browser and natively.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
