#![cfg(target_arch = "wasm32")]

use js_sys::{Array, Function, Reflect};
use reversi_engine::wasm::ReversiGame;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

fn get(value: &JsValue, key: &str) -> JsValue {
    Reflect::get(value, &JsValue::from_str(key)).unwrap()
}

fn request_id(state: &JsValue, slot: &str) -> u32 {
    get(&get(state, slot), "id").as_f64().unwrap() as u32
}

#[wasm_bindgen_test]
fn wasm_is_ready() {
    assert!(reversi_engine::wasm_ready());
}

#[wasm_bindgen_test]
fn started_game_waits_for_dark() {
    let mut game = ReversiGame::new(JsValue::UNDEFINED).unwrap();
    game.start();

    let state = game.state().unwrap();

    assert_eq!(get(&get(&state, "phase"), "kind"), JsValue::from_str("waitForPlayer"));
    assert_eq!(get(&state, "turn"), JsValue::from_str("dark"));
    assert_eq!(get(&get(&state, "diskCount"), "dark").as_f64(), Some(2.0));
}

#[wasm_bindgen_test]
fn opening_move_is_acknowledged_cell_by_cell() {
    let mut game = ReversiGame::new(JsValue::UNDEFINED).unwrap();
    game.start();
    game.select_cell(2, 3);

    for _ in 0..2 {
        let state = game.state().unwrap();
        game.board_updated(request_id(&state, "boardUpdateRequest"));
    }

    let state = game.state().unwrap();
    assert_eq!(get(&state, "turn"), JsValue::from_str("light"));
    assert_eq!(get(&get(&state, "diskCount"), "dark").as_f64(), Some(4.0));
    assert!(game.save_data().starts_with("o00\n"));
}

#[wasm_bindgen_test]
fn subscribers_receive_state_snapshots() {
    let mut game = ReversiGame::new(JsValue::UNDEFINED).unwrap();
    let seen = Array::new();
    let callback = Function::new_with_args("state", "this.push(state.phase.kind)").bind(&seen);

    let id = game.subscribe(callback);
    game.start();

    assert_eq!(seen.length(), 2);
    assert_eq!(seen.get(1), JsValue::from_str("waitForPlayer"));
    assert!(game.unsubscribe(id));
}

#[wasm_bindgen_test]
fn malformed_save_is_rejected() {
    assert!(ReversiGame::load("x0", JsValue::UNDEFINED).is_err());
}

#[wasm_bindgen_test]
fn bad_player_mode_is_an_error() {
    let mut game = ReversiGame::new(JsValue::UNDEFINED).unwrap();

    assert!(game
        .change_player_mode(JsValue::from_str("dark"), JsValue::from_str("robot"))
        .is_err());
}
