//! Turn orchestration with undo/redo over archived snapshots.
//!
//! A `Session` owns the current [`GameState`] and two stacks of earlier ones. Every operation
//! either fully applies or leaves the session untouched; illegal moves, empty-stack undo/redo
//! and unverifiable loads are absorbed as no-ops and reported through `tracing` and the
//! returned `bool`.

use std::collections::VecDeque;

use tracing::{debug, info, trace};

use crate::board::Board;
use crate::config::{ConfigError, SessionConfig};
use crate::game::{self, GameState};
use crate::rules;
use crate::types::{Player, Position, StateView};

const FINGERPRINT_PREFIX_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    current: GameState,
    /// Oldest snapshot at the front so the history limit can drop it cheaply.
    undo_stack: VecDeque<GameState>,
    redo_stack: Vec<GameState>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let board = config.empty_board()?;
        Ok(Self {
            config,
            current: GameState::initial(board, game::now_ms()),
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn current(&self) -> &GameState {
        &self.current
    }

    pub fn fingerprint(&self) -> &str {
        self.current.fingerprint()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Plays `pos` for the side to move. Returns whether the move was applied.
    pub fn make_move(&mut self, pos: Position) -> bool {
        let next = match self.current.play(pos, game::now_ms()) {
            Ok(next) => next,
            Err(err) => {
                debug!(%pos, player = %self.current.current_player(), %err, "move rejected");
                return false;
            }
        };

        trace!(
            %pos,
            player = %self.current.current_player(),
            fingerprint = next.fingerprint(),
            "move applied"
        );
        if next.is_game_over() {
            let score = next.score();
            info!(
                winner = ?next.winner(),
                player1 = score.player1,
                player2 = score.player2,
                "game over"
            );
        }

        let previous = std::mem::replace(&mut self.current, next);
        self.archive(previous);
        self.redo_stack.clear();
        true
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop_back() else {
            debug!("nothing to undo");
            return false;
        };
        let undone = std::mem::replace(&mut self.current, previous);
        self.redo_stack.push(undone);
        trace!(fingerprint = self.current.fingerprint(), "undo");
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            debug!("nothing to redo");
            return false;
        };
        let redone = std::mem::replace(&mut self.current, next);
        self.archive(redone);
        trace!(fingerprint = self.current.fingerprint(), "redo");
        true
    }

    /// Discards all history and starts a fresh game at the configured board size.
    pub fn reset(&mut self) {
        // The config was validated in `new`.
        let board = self.config.empty_board().unwrap_or_default();
        self.current = GameState::initial(board, game::now_ms());
        self.undo_stack.clear();
        self.redo_stack.clear();
        info!(size = self.current.board().size(), "game reset");
    }

    /// Installs `candidate` as a fresh timeline iff it validates: the fingerprint verifies and
    /// every field outside the fingerprint agrees with the board.
    ///
    /// This is the only entry point for state from outside the engine. A rejected candidate
    /// leaves the session exactly as it was.
    pub fn load_state(&mut self, candidate: GameState) -> bool {
        if let Err(err) = candidate.validate() {
            debug!(claimed = candidate.fingerprint(), %err, "load rejected");
            return false;
        }
        self.current = candidate;
        self.undo_stack.clear();
        self.redo_stack.clear();
        trace!(fingerprint = self.current.fingerprint(), "state loaded");
        true
    }

    /// Parses exported JSON and loads it. Malformed text is rejected like a forged state.
    pub fn import_json(&mut self, text: &str) -> bool {
        match serde_json::from_str::<GameState>(text) {
            Ok(candidate) => self.load_state(candidate),
            Err(err) => {
                debug!(%err, "load rejected: malformed state");
                false
            }
        }
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.current)
    }

    pub fn is_valid_move(&self, pos: Position) -> bool {
        !self.current.is_game_over()
            && rules::is_valid_move(pos, self.current.board(), self.current.current_player())
    }

    /// Cells the side to move may claim; empty once the game is over.
    pub fn valid_moves(&self) -> Vec<Position> {
        if self.current.is_game_over() {
            return Vec::new();
        }
        rules::valid_moves(self.current.board(), self.current.current_player())
    }

    pub fn view(&self, now_ms: u64) -> StateView {
        let state = &self.current;
        let score = state.score();
        let fingerprint = state.fingerprint().to_string();

        StateView {
            board: state.board().to_marker_rows(),
            board_size: state.board().size(),
            current_player: state.current_player().marker(),
            score,
            territory: score.territory_percent(),
            move_count: state.move_history().len(),
            move_log: state.move_log().map(|m| m.to_string()).collect(),
            is_game_over: state.is_game_over(),
            winner: state.winner().map_or(0, Player::marker),
            fingerprint_prefix: fingerprint.chars().take(FINGERPRINT_PREFIX_LEN).collect(),
            fingerprint,
            elapsed_secs: state.elapsed_secs(now_ms),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    fn archive(&mut self, state: GameState) {
        self.undo_stack.push_back(state);
        if let Some(limit) = self.config.history_limit {
            while self.undo_stack.len() > limit {
                self.undo_stack.pop_front();
            }
        }
    }
}

impl Default for Session {
    /// Standard 8×8 game with default settings.
    fn default() -> Self {
        Self {
            config: SessionConfig::default(),
            current: GameState::initial(Board::standard(), game::now_ms()),
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
        }
    }
}
