use rand::RngCore;
use rand::seq::SliceRandom;

use crate::board::Board;
use crate::types::{Disk, Position};

/// Chooses the computer's move.
pub trait MoveSelector {
    fn select_move(&self, board: &Board, side: Disk, rng: &mut dyn RngCore) -> Option<Position>;
}

/// Picks uniformly among the legal moves.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomMoveSelector;

impl MoveSelector for RandomMoveSelector {
    fn select_move(&self, board: &Board, side: Disk, rng: &mut dyn RngCore) -> Option<Position> {
        board.valid_moves(side).choose(rng).copied()
    }
}
