use wasm_bindgen::prelude::*;

pub mod action;
pub mod board;
pub mod command;
pub mod config;
pub mod error;
pub mod game;
pub mod phase;
pub mod reducer;
pub mod request;
pub mod save;
pub mod selector;
pub mod state;
pub mod store;
pub mod timer;
pub mod types;
pub mod wasm;

pub use action::Action;
pub use board::Board;
pub use config::GameConfig;
pub use error::{BoardError, GameError};
pub use game::Game;
pub use phase::{Phase, PhaseKind};
pub use request::{BoardUpdate, Request, RequestId};
pub use state::{GameStatus, State};
pub use types::{CellChange, Disk, PerSide, PlayerMode, Position};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
