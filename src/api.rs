//! JavaScript surface for the browser front end.

use wasm_bindgen::prelude::*;

use crate::config::SessionConfig;
use crate::game::{self, GameState};
use crate::session::Session;
use crate::types::Position;

/// One game session owned by the page.
#[wasm_bindgen]
pub struct TerritoryGame {
    session: Session,
}

#[wasm_bindgen]
impl TerritoryGame {
    /// Standard 8×8 game.
    #[wasm_bindgen(constructor)]
    pub fn new() -> TerritoryGame {
        Self {
            session: Session::default(),
        }
    }

    /// Builds a game from a config object such as `{ boardSize: 6, historyLimit: 32 }`.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<TerritoryGame, JsValue> {
        let config: SessionConfig = serde_wasm_bindgen::from_value(config)?;
        let session = Session::new(config).map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(Self { session })
    }

    #[wasm_bindgen(js_name = makeMove)]
    pub fn make_move(&mut self, x: i32, y: i32) -> bool {
        self.session.make_move(Position::new(x, y))
    }

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    #[wasm_bindgen(js_name = isValidMove)]
    pub fn is_valid_move(&self, x: i32, y: i32) -> bool {
        self.session.is_valid_move(Position::new(x, y))
    }

    /// Array of `{ x, y }` the side to move may claim.
    #[wasm_bindgen(js_name = validMoves)]
    pub fn valid_moves(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.session.valid_moves())?)
    }

    /// Render-ready projection of the current state.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.session.view(game::now_ms()))?)
    }

    pub fn fingerprint(&self) -> String {
        self.session.fingerprint().to_string()
    }

    /// JSON text of the current snapshot, for copying to the clipboard.
    #[wasm_bindgen(js_name = exportState)]
    pub fn export_state(&self) -> Result<String, JsValue> {
        self.session
            .export_json()
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Loads pasted JSON. Returns false, leaving the game untouched, for anything that does not
    /// parse or verify.
    #[wasm_bindgen(js_name = importState)]
    pub fn import_state(&mut self, text: &str) -> bool {
        self.session.import_json(text)
    }

    /// Same gate as `importState` for an already-parsed object.
    #[wasm_bindgen(js_name = loadState)]
    pub fn load_state(&mut self, state: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<GameState>(state) {
            Ok(candidate) => self.session.load_state(candidate),
            Err(err) => {
                tracing::debug!(%err, "load rejected: malformed state object");
                false
            }
        }
    }
}

impl Default for TerritoryGame {
    fn default() -> Self {
        Self::new()
    }
}
