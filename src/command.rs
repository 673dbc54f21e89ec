use rand::RngCore;
use tracing::warn;
use web_time::Duration;

use crate::action::Action;
use crate::board::Board;
use crate::config::GameConfig;
use crate::phase::Phase;
use crate::request::{IdGenerator, Request, RequestId};
use crate::selector::{MoveSelector, RandomMoveSelector};
use crate::types::{Disk, Position};

/// Deferred work produced by a reduction. The store runs commands only
/// after the state that produced them has been published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Action),
    /// Dispatch `action` once `delay` has passed, unless cancelled first.
    ScheduleTimer {
        id: RequestId,
        delay: Duration,
        action: Action,
    },
    CancelTimer(RequestId),
}

/// Engine-owned resources a reduction may draw on, plus the commands it
/// produced so far.
pub struct Context<'a> {
    ids: &'a mut IdGenerator,
    rng: &'a mut dyn RngCore,
    selector: &'a dyn MoveSelector,
    config: &'a GameConfig,
    commands: Vec<Command>,
}

impl<'a> Context<'a> {
    pub fn new(
        ids: &'a mut IdGenerator,
        rng: &'a mut dyn RngCore,
        selector: &'a dyn MoveSelector,
        config: &'a GameConfig,
    ) -> Self {
        Self {
            ids,
            rng,
            selector,
            config,
            commands: Vec::new(),
        }
    }

    pub fn next_id(&mut self) -> RequestId {
        self.ids.next_id()
    }

    pub fn request<T>(&mut self, detail: T) -> Request<T> {
        Request::new(self.ids, detail)
    }

    pub fn config(&self) -> &GameConfig {
        self.config
    }

    /// Asks the move selector for `side`'s move on `board`.
    ///
    /// `None` only when `side` has no legal move. A selector that declines
    /// or answers an illegal cell is overruled by a random legal move.
    pub fn choose_move(&mut self, board: &Board, side: Disk) -> Option<Position> {
        let legal = board.valid_moves(side);
        if legal.is_empty() {
            return None;
        }

        match self.selector.select_move(board, side, &mut *self.rng) {
            Some(pos) if legal.contains(&pos) => Some(pos),
            chosen => {
                warn!(%side, ?chosen, "selector gave no legal move, picking at random");
                RandomMoveSelector.select_move(board, side, &mut *self.rng)
            }
        }
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Queues a transition; it is reduced after the current state is published.
    pub fn change_phase(&mut self, next: Phase) {
        self.push(Command::Dispatch(Action::ChangePhase(next)));
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }
}
