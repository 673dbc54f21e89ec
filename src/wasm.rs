use js_sys::Function;
use serde::de::DeserializeOwned;
use tracing::warn;
use wasm_bindgen::prelude::*;
use web_time::Instant;

use crate::action::Action;
use crate::config::GameConfig;
use crate::game::Game;
use crate::request::RequestId;
use crate::store::SubscriptionId;
use crate::types::{Disk, PlayerMode};

/// Browser-facing wrapper around [`Game`].
///
/// Request ids cross the boundary as plain numbers. Subscribers are called
/// synchronously from inside a dispatch, so they must answer requests from a
/// later task (a promise callback or a timeout), never re-entrantly.
#[wasm_bindgen]
pub struct ReversiGame {
    game: Game,
}

#[wasm_bindgen]
impl ReversiGame {
    /// `config` is a `GameConfig`-shaped object; `undefined` means defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ReversiGame, JsError> {
        Ok(Self {
            game: Game::new(parse_config(config)?),
        })
    }

    pub fn load(data: &str, config: JsValue) -> Result<ReversiGame, JsError> {
        Ok(Self {
            game: Game::load(data, parse_config(config)?)?,
        })
    }

    pub fn start(&mut self) {
        self.game.dispatch(Action::Start);
    }

    #[wasm_bindgen(js_name = selectCell)]
    pub fn select_cell(&mut self, x: u32, y: u32) {
        self.game.dispatch(Action::BoardCellSelected {
            x: x as usize,
            y: y as usize,
        });
    }

    /// `side` is `"dark"` or `"light"`, `mode` is `"manual"` or `"computer"`.
    #[wasm_bindgen(js_name = changePlayerMode)]
    pub fn change_player_mode(&mut self, side: JsValue, mode: JsValue) -> Result<(), JsError> {
        let side: Disk = from_js(side)?;
        let mode: PlayerMode = from_js(mode)?;
        self.game.dispatch(Action::PlayerModeChanged { side, mode });
        Ok(())
    }

    pub fn reset(&mut self) {
        self.game.dispatch(Action::Reset);
    }

    #[wasm_bindgen(js_name = confirmReset)]
    pub fn confirm_reset(&mut self, request_id: u32, execute: bool) {
        self.game.dispatch(Action::ResetConfirmed {
            request_id: request(request_id),
            execute,
        });
    }

    #[wasm_bindgen(js_name = dismissPass)]
    pub fn dismiss_pass(&mut self, request_id: u32) {
        self.game.dispatch(Action::PassDismissed {
            request_id: request(request_id),
        });
    }

    #[wasm_bindgen(js_name = boardUpdated)]
    pub fn board_updated(&mut self, request_id: u32) {
        self.game.dispatch(Action::BoardUpdated {
            request_id: request(request_id),
        });
    }

    #[wasm_bindgen(js_name = saveCompleted)]
    pub fn save_completed(&mut self, request_id: u32) {
        self.game.dispatch(Action::SaveCompleted {
            request_id: request(request_id),
        });
    }

    pub fn tick(&mut self) {
        self.game.tick();
    }

    /// Milliseconds until the next `tick` has work to do.
    #[wasm_bindgen(js_name = nextDelayMs)]
    pub fn next_delay_ms(&self) -> Option<f64> {
        self.game
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()).as_millis() as f64)
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(self.game.state())?)
    }

    #[wasm_bindgen(js_name = saveData)]
    pub fn save_data(&self) -> String {
        self.game.save_data()
    }

    /// Calls `callback(state)` after every published change. Returns a
    /// handle for `unsubscribe`.
    pub fn subscribe(&mut self, callback: Function) -> u32 {
        let id = self.game.subscribe(move |state| {
            let value = match serde_wasm_bindgen::to_value(state) {
                Ok(value) => value,
                Err(err) => {
                    warn!(%err, "cannot convert state for subscriber");
                    return;
                }
            };
            if let Err(err) = callback.call1(&JsValue::NULL, &value) {
                warn!(?err, "subscriber threw");
            }
        });
        id.value() as u32
    }

    pub fn unsubscribe(&mut self, id: u32) -> bool {
        self.game.unsubscribe(SubscriptionId::from(u64::from(id)))
    }
}

fn request(id: u32) -> RequestId {
    RequestId::from(u64::from(id))
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsError> {
    Ok(serde_wasm_bindgen::from_value(value)?)
}

fn parse_config(config: JsValue) -> Result<GameConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(GameConfig::default());
    }
    from_js(config)
}
