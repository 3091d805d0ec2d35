//! Placement rules, scoring and end-of-game detection.
//!
//! Everything here is a pure function of a board and a player; hosts may call these freely
//! (e.g. to highlight legal cells) without touching a session.

use crate::board::Board;
use crate::types::{Player, Position, Score};

/// The first placements on the board, whoever makes them, may land on any empty cell.
pub const OPENING_PLACEMENTS: usize = 2;

/// Game status evaluated on the board that results from a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Termination {
    pub is_game_over: bool,
    pub winner: Option<Player>,
}

impl Termination {
    pub const IN_PROGRESS: Self = Self {
        is_game_over: false,
        winner: None,
    };

    fn finished(winner: Option<Player>) -> Self {
        Self {
            is_game_over: true,
            winner,
        }
    }
}

pub fn is_adjacent_to_own_territory(pos: Position, board: &Board, player: Player) -> bool {
    board
        .neighbors(pos)
        .any(|n| matches!(board.cell_at(n), Ok(Some(owner)) if owner == player))
}

pub fn is_valid_move(pos: Position, board: &Board, player: Player) -> bool {
    match board.cell_at(pos) {
        Ok(None) => {}
        Ok(Some(_)) | Err(_) => return false,
    }
    in_opening(board) || is_adjacent_to_own_territory(pos, board, player)
}

pub fn has_any_valid_move(board: &Board, player: Player) -> bool {
    if in_opening(board) {
        return board.empty_count() > 0;
    }
    board
        .positions()
        .any(|pos| is_valid_move(pos, board, player))
}

/// Every cell `player` may claim, row-major.
pub fn valid_moves(board: &Board, player: Player) -> Vec<Position> {
    board
        .positions()
        .filter(|&pos| is_valid_move(pos, board, player))
        .collect()
}

pub fn compute_score(board: &Board) -> Score {
    board.cells().flatten().fold(Score::default(), |mut score, owner| {
        match owner {
            Player::P1 => score.player1 += 1,
            Player::P2 => score.player2 += 1,
        }
        score
    })
}

/// Larger territory wins; equal territory is a tie.
pub fn determine_winner(score: Score) -> Option<Player> {
    use std::cmp::Ordering;

    match score.player1.cmp(&score.player2) {
        Ordering::Greater => Some(Player::P1),
        Ordering::Less => Some(Player::P2),
        Ordering::Equal => None,
    }
}

/// Decides whether the game ends after `mover` produced `board`.
///
/// Both sides are checked against the resulting board. When exactly one side is out of moves
/// the other side wins outright, regardless of territory. Only a mutual stalemate falls back
/// to comparing scores.
pub fn evaluate_termination(board: &Board, mover: Player) -> Termination {
    let next = mover.opponent();
    let next_can_move = has_any_valid_move(board, next);
    let mover_can_move = has_any_valid_move(board, mover);

    match (next_can_move, mover_can_move) {
        (true, true) => Termination::IN_PROGRESS,
        (false, true) => Termination::finished(Some(mover)),
        (true, false) => Termination::finished(Some(next)),
        (false, false) => Termination::finished(determine_winner(compute_score(board))),
    }
}

fn in_opening(board: &Board) -> bool {
    board.occupied_count() < OPENING_PLACEMENTS
}
