use tracing::warn;

use crate::board::{BOARD_SIZE, Board, parse_row};
use crate::error::GameError;
use crate::state::State;
use crate::types::{Disk, PerSide, PlayerMode, cell_symbol};

/// The persisted part of a [`State`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveData {
    pub turn: Option<Disk>,
    pub player_modes: PerSide<PlayerMode>,
    pub board: Board,
}

impl SaveData {
    pub fn into_state(self) -> State {
        State::new(self.board, self.turn, self.player_modes)
    }
}

/// Save text: one header line `<turn><dark mode><light mode>` (e.g. `x01`),
/// then the eight board rows, each line ending in a newline.
pub fn encode(state: &State) -> String {
    let mut output = String::with_capacity((BOARD_SIZE + 1) * (BOARD_SIZE + 1));
    output.push(cell_symbol(state.turn));
    for side in Disk::SIDES {
        output.push(state.player_modes[side].digit());
    }
    output.push('\n');

    for row in state.board.dump() {
        output.extend(row.into_iter().map(cell_symbol));
        output.push('\n');
    }
    output
}

/// Parses save text. Any deviation from the layout rejects the whole text.
pub fn decode(data: &str) -> Result<SaveData, GameError> {
    let restore_error = || {
        warn!(len = data.len(), "malformed save data");
        GameError::Restore {
            data: data.to_string(),
        }
    };

    let mut lines = data.lines().filter(|line| !line.is_empty());
    let header: Vec<char> = lines.next().ok_or_else(restore_error)?.chars().collect();
    let [turn, dark, light] = header[..] else {
        return Err(restore_error());
    };
    let turn = Disk::from_symbol(turn).ok_or_else(restore_error)?;
    let player_modes = PerSide::new(
        PlayerMode::from_digit(dark).ok_or_else(restore_error)?,
        PlayerMode::from_digit(light).ok_or_else(restore_error)?,
    );

    let dump = lines
        .map(parse_row)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(restore_error)?;
    let mut board = Board::empty();
    board.restore(&dump).map_err(|_| restore_error())?;

    Ok(SaveData {
        turn,
        player_modes,
        board,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAVED: &str = "\
o01
--------
--------
--------
--xxx---
---xo---
--------
--------
--------
";

    #[test]
    fn encodes_header_rows_and_trailing_newline() {
        let mut state = State::default();
        state.board.place_disk(Disk::Dark, 2, 3).unwrap();
        state.turn = Some(Disk::Light);
        state.player_modes[Disk::Light] = PlayerMode::Computer;

        assert_eq!(encode(&state), SAVED);
    }

    #[test]
    fn game_over_is_saved_with_dash_turn() {
        let mut state = State::default();
        state.turn = None;

        assert!(encode(&state).starts_with("-00\n"));
    }

    #[test]
    fn decodes_what_it_encodes() {
        let saved = decode(SAVED).unwrap();

        assert_eq!(saved.turn, Some(Disk::Light));
        assert_eq!(saved.player_modes, PerSide::new(PlayerMode::Manual, PlayerMode::Computer));
        assert_eq!(saved.board.count_disks(Disk::Dark), 4);
        assert_eq!(encode(&saved.into_state()), SAVED);
    }

    #[test]
    fn rejects_malformed_text_with_the_raw_data() {
        let cases = [
            String::new(),
            SAVED.replacen("o01", "o0", 1),
            SAVED.replacen("o01", "o012", 1),
            SAVED.replacen("o01", "?01", 1),
            SAVED.replacen("o01", "o21", 1),
            SAVED.replacen("--xxx---", "--xxx--", 1),
            SAVED.replacen("--xxx---", "--xx#---", 1),
            SAVED.replacen("--------\n", "", 1),
            format!("{SAVED}--------\n"),
        ];

        for data in cases {
            assert_eq!(
                decode(&data),
                Err(GameError::Restore { data: data.clone() }),
                "accepted {data:?}"
            );
        }
    }
}
