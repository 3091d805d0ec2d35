use wasm_bindgen::prelude::*;

pub mod api;
pub mod board;
pub mod config;
pub mod fingerprint;
pub mod game;
pub mod rules;
pub mod session;
pub mod types;

pub use api::TerritoryGame;
pub use board::{Board, BoardError};
pub use config::{ConfigError, SessionConfig};
pub use game::{GameState, MoveError, StateError};
pub use session::Session;
pub use types::{Cell, MoveRecord, Player, Position, Score, StateView, Territory};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
