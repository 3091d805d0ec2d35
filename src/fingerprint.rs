//! Integrity digest over the parts of a snapshot that define a position.
//!
//! The canonical form is `<cells>-<player>-<moves>`: cells row-major with `0` for empty and
//! the player marker otherwise, the marker of the side to move, then the move history as
//! `x,y` pairs joined by `;`. The fingerprint is the CRC32 of that text in hex followed by the
//! text's length. It detects accidental corruption and hand edits of exported state; it is not
//! a cryptographic commitment.

use crate::board::Board;
use crate::game::GameState;
use crate::types::{Player, Position};

const EMPTY_MARKER: char = '0';

pub fn canonical_form<'a>(
    board: &Board,
    current_player: Player,
    history: impl IntoIterator<Item = &'a Position>,
) -> String {
    let mut out = String::with_capacity(board.size() * board.size() + 8);
    for cell in board.cells() {
        out.push(cell.map_or(EMPTY_MARKER, |p| char::from(b'0' + p.marker())));
    }
    out.push('-');
    out.push(char::from(b'0' + current_player.marker()));
    out.push('-');
    for (i, pos) in history.into_iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        out.push_str(&pos.x.to_string());
        out.push(',');
        out.push_str(&pos.y.to_string());
    }
    out
}

pub fn digest<'a>(
    board: &Board,
    current_player: Player,
    history: impl IntoIterator<Item = &'a Position>,
) -> String {
    let canonical = canonical_form(board, current_player, history);
    format!("{:08x}-{:x}", crc32fast::hash(canonical.as_bytes()), canonical.len())
}

/// Recomputes the digest of `state` from its fields.
pub fn fingerprint(state: &GameState) -> String {
    digest(state.board(), state.current_player(), state.move_history())
}

/// True iff the stored fingerprint matches the one recomputed from the state's fields.
pub fn verify(state: &GameState) -> bool {
    fingerprint(state) == state.fingerprint()
}
