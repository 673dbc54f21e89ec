use serde::Serialize;

use crate::board::Board;
use crate::phase::Phase;
use crate::request::{BoardUpdate, Request};
use crate::save;
use crate::types::{Disk, PerSide, PlayerMode};

/// The engine's complete, observable snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub board: Board,
    /// Side to move; `None` once the game is over.
    pub turn: Option<Disk>,
    pub player_modes: PerSide<PlayerMode>,
    pub phase: Phase,
    /// The computer is choosing a move.
    pub thinking: bool,
    pub disk_count: PerSide<usize>,
    pub board_update_request: Option<Request<BoardUpdate>>,
    pub pass_notification_request: Option<Request>,
    pub reset_confirmation_request: Option<Request>,
    /// Carries the save text to persist.
    pub save_request: Option<Request<String>>,
}

/// What the host's message line should say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "side", rename_all = "camelCase")]
pub enum GameStatus {
    Turn(Disk),
    Won(Disk),
    Tied,
}

impl State {
    /// A state in the initial phase; disk counts reflect `board`.
    pub fn new(board: Board, turn: Option<Disk>, player_modes: PerSide<PlayerMode>) -> Self {
        let mut state = Self {
            board,
            turn,
            player_modes,
            phase: Phase::Initial,
            thinking: false,
            disk_count: PerSide::default(),
            board_update_request: None,
            pass_notification_request: None,
            reset_confirmation_request: None,
            save_request: None,
        };
        state.recount_disks();
        state
    }

    pub fn recount_disks(&mut self) {
        self.disk_count = PerSide::from_fn(|side| self.board.count_disks(side));
    }

    pub fn clear_requests(&mut self) {
        self.board_update_request = None;
        self.pass_notification_request = None;
        self.reset_confirmation_request = None;
        self.save_request = None;
    }

    /// Save text of this state.
    pub fn save_data(&self) -> String {
        save::encode(self)
    }

    pub fn status(&self) -> GameStatus {
        match self.turn {
            Some(side) => GameStatus::Turn(side),
            None => match self.board.side_with_more_disks() {
                Some(side) => GameStatus::Won(side),
                None => GameStatus::Tied,
            },
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new(Board::new(), Some(Disk::Dark), PerSide::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_dark_to_move_on_opening_board() {
        let state = State::default();

        assert_eq!(state.turn, Some(Disk::Dark));
        assert_eq!(state.phase, Phase::Initial);
        assert_eq!(state.disk_count, PerSide::new(2, 2));
        assert_eq!(state.player_modes, PerSide::new(PlayerMode::Manual, PlayerMode::Manual));
        assert_eq!(state.status(), GameStatus::Turn(Disk::Dark));
    }

    #[test]
    fn status_after_game_over_names_the_winner() {
        let mut state = State::default();
        state.turn = None;
        assert_eq!(state.status(), GameStatus::Tied);

        state.board.place_disk(Disk::Light, 4, 2).unwrap();
        assert_eq!(state.status(), GameStatus::Won(Disk::Light));
    }
}
