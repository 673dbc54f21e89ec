use crate::phase::Phase;
use crate::request::RequestId;
use crate::types::{Disk, PlayerMode};

/// Everything that can advance the game.
///
/// All variants but [`Action::ChangePhase`] come from the host (or from a
/// timer standing in for the computer player).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Start,
    BoardCellSelected { x: usize, y: usize },
    PlayerModeChanged { side: Disk, mode: PlayerMode },
    Reset,
    ResetConfirmed { request_id: RequestId, execute: bool },
    PassDismissed { request_id: RequestId },
    BoardUpdated { request_id: RequestId },
    SaveCompleted { request_id: RequestId },
    /// Leave the current phase and enter the given one.
    ChangePhase(Phase),
}
