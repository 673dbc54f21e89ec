use derive_more::{Display, Error};

use crate::types::Disk;

/// Failures of board operations.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// The move flips nothing, or targets an occupied or off-board cell.
    #[display("cannot place a {disk} disk at ({x}, {y})")]
    DiskPlacement { disk: Disk, x: usize, y: usize },
    /// A dump that is not 8 rows of 8 cells.
    #[display("cannot restore a board from {} rows", dump.len())]
    Restore { dump: Vec<Vec<Option<Disk>>> },
}

/// Failures of whole-game operations.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// Malformed save text. Carries the text as given.
    #[display("cannot restore a game from save data ({} bytes)", data.len())]
    Restore { data: String },
}
