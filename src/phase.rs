use derive_more::Display;
use serde::Serialize;
use tracing::debug;

use crate::action::Action;
use crate::command::{Command, Context};
use crate::request::{BoardUpdate, RequestId};
use crate::state::State;
use crate::types::{CellChange, Disk, PlayerMode};

/// Current step of the game.
///
/// Each phase owns its reaction to actions ([`Phase::reduce`]) and what
/// happens when it is entered or left. Reductions never run effects; they
/// queue [`Command`]s on the [`Context`], which the store runs after
/// publishing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Phase {
    /// Nothing has started yet.
    Initial,
    /// The side to move is a human, or is about to be routed elsewhere.
    WaitForPlayer,
    /// The computer is choosing. `session` also keys its pending timer.
    Thinking { session: RequestId },
    /// A move at `(x, y)` is being resolved.
    PlaceDisk { x: usize, y: usize },
    /// Changes of the last move still waiting to be shown, one at a time.
    PlacingDisk { remaining: Vec<CellChange> },
    NextTurn,
    /// The side to move has no legal move; waiting for the host to say so.
    Pass,
    GameOver,
    Reset,
}

/// Variant of a [`Phase`] without its payload.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PhaseKind {
    #[display("initial")]
    Initial,
    #[display("waitForPlayer")]
    WaitForPlayer,
    #[display("thinking")]
    Thinking,
    #[display("placeDisk")]
    PlaceDisk,
    #[display("placingDisk")]
    PlacingDisk,
    #[display("nextTurn")]
    NextTurn,
    #[display("pass")]
    Pass,
    #[display("gameOver")]
    GameOver,
    #[display("reset")]
    Reset,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Initial => PhaseKind::Initial,
            Phase::WaitForPlayer => PhaseKind::WaitForPlayer,
            Phase::Thinking { .. } => PhaseKind::Thinking,
            Phase::PlaceDisk { .. } => PhaseKind::PlaceDisk,
            Phase::PlacingDisk { .. } => PhaseKind::PlacingDisk,
            Phase::NextTurn => PhaseKind::NextTurn,
            Phase::Pass => PhaseKind::Pass,
            Phase::GameOver => PhaseKind::GameOver,
            Phase::Reset => PhaseKind::Reset,
        }
    }

    /// Phase-local reaction to `action`. Most phases ignore most actions.
    pub fn reduce(&self, state: State, action: &Action, cx: &mut Context) -> State {
        match (self, action) {
            (Phase::Initial, Action::Start) => {
                cx.change_phase(Phase::WaitForPlayer);
            }

            (Phase::WaitForPlayer, Action::BoardCellSelected { x, y })
            | (Phase::Thinking { .. }, Action::BoardCellSelected { x, y }) => {
                cx.change_phase(Phase::PlaceDisk { x: *x, y: *y });
            }

            (Phase::WaitForPlayer, Action::PlayerModeChanged { side, mode })
                if state.turn == Some(*side) && *mode == PlayerMode::Computer =>
            {
                let session = cx.next_id();
                cx.change_phase(Phase::Thinking { session });
            }

            (Phase::Thinking { .. }, Action::PlayerModeChanged { side, mode })
                if state.turn == Some(*side) && *mode == PlayerMode::Manual =>
            {
                cx.change_phase(Phase::WaitForPlayer);
            }

            (Phase::PlacingDisk { remaining }, Action::BoardUpdated { request_id }) => {
                if state
                    .board_update_request
                    .as_ref()
                    .is_some_and(|request| request.matches(*request_id))
                {
                    let rest = remaining.get(1..).unwrap_or_default().to_vec();
                    cx.change_phase(Phase::PlacingDisk { remaining: rest });
                }
            }

            (Phase::Pass, Action::PassDismissed { request_id }) => {
                if state
                    .pass_notification_request
                    .as_ref()
                    .is_some_and(|request| request.matches(*request_id))
                {
                    cx.change_phase(Phase::NextTurn);
                }
            }

            _ => {}
        }
        state
    }

    /// Runs when this phase becomes current, right after `previous` exited.
    pub fn on_enter(&self, mut state: State, _previous: &Phase, cx: &mut Context) -> State {
        match self {
            Phase::WaitForPlayer => match state.turn {
                None => cx.change_phase(Phase::GameOver),
                Some(turn) if !state.board.has_valid_moves(turn) => cx.change_phase(Phase::Pass),
                Some(turn) if state.player_modes[turn] == PlayerMode::Computer => {
                    let session = cx.next_id();
                    cx.change_phase(Phase::Thinking { session });
                }
                Some(_) => {}
            },

            Phase::Thinking { session } => {
                let Some(turn) = state.turn else {
                    unreachable!("thinking without a side to move");
                };
                state.thinking = true;
                match cx.choose_move(&state.board, turn) {
                    Some(pos) => {
                        let delay = cx.config().thinking_delay();
                        cx.push(Command::ScheduleTimer {
                            id: *session,
                            delay,
                            action: Action::BoardCellSelected { x: pos.x, y: pos.y },
                        });
                    }
                    None => cx.change_phase(Phase::WaitForPlayer),
                }
            }

            Phase::PlaceDisk { x, y } => {
                let Some(turn) = state.turn else {
                    unreachable!("placing a disk without a side to move");
                };
                match state.board.place_disk(turn, *x, *y) {
                    Ok(changes) => cx.change_phase(Phase::PlacingDisk { remaining: changes }),
                    Err(err) => {
                        debug!(%err, "move rejected");
                        cx.change_phase(Phase::WaitForPlayer);
                    }
                }
            }

            Phase::PlacingDisk { remaining } => match remaining.first() {
                Some(change) => {
                    state.board_update_request = Some(cx.request(BoardUpdate::WithAnimation(*change)));
                }
                None => cx.change_phase(Phase::NextTurn),
            },

            Phase::NextTurn => {
                state.recount_disks();
                let Some(turn) = state.turn else {
                    unreachable!("next turn after the game is over");
                };
                let next = turn.flipped();
                state.turn = Some(next);

                if state.board.has_valid_moves(next) {
                    cx.change_phase(Phase::WaitForPlayer);
                } else if state.board.has_valid_moves(turn) {
                    cx.change_phase(Phase::Pass);
                } else {
                    cx.change_phase(Phase::GameOver);
                }
            }

            Phase::Pass => {
                state.pass_notification_request = Some(cx.request(()));
            }

            Phase::GameOver => {
                state.turn = None;
                state.save_request = Some(cx.request(state.save_data()));
            }

            Phase::Reset => {
                let changes = state.board.reset();
                state.turn = Some(Disk::Dark);
                state.player_modes = Default::default();
                state.thinking = false;
                state.recount_disks();
                state.clear_requests();
                state.board_update_request = Some(cx.request(BoardUpdate::WithoutAnimation(changes)));
                cx.change_phase(Phase::WaitForPlayer);
            }

            Phase::Initial => {}
        }
        state
    }

    /// Runs when this phase is left for `next`.
    pub fn on_exit(&self, mut state: State, next: &Phase, cx: &mut Context) -> State {
        match self {
            Phase::Initial => {
                state.thinking = false;
                state.recount_disks();
                state.clear_requests();
            }

            Phase::Thinking { session } => {
                state.thinking = false;
                cx.push(Command::CancelTimer(*session));
            }

            Phase::PlacingDisk { .. } => {
                state.board_update_request = None;
            }

            Phase::NextTurn if next.kind() != PhaseKind::GameOver => {
                state.save_request = Some(cx.request(state.save_data()));
            }

            Phase::Pass => {
                state.pass_notification_request = None;
            }

            Phase::Reset => {
                state.save_request = Some(cx.request(state.save_data()));
            }

            _ => {}
        }
        state
    }
}

/// Leaves the current phase for `next`: exit, commit, enter.
pub fn transition(state: State, next: Phase, cx: &mut Context) -> State {
    let previous = state.phase.clone();
    debug!(from = %previous.kind(), to = %next.kind(), "phase transition");

    let mut state = previous.on_exit(state, &next, cx);
    state.phase = next.clone();
    next.on_enter(state, &previous, cx)
}
