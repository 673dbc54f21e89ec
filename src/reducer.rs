use tracing::{trace, warn};

use crate::action::Action;
use crate::command::{Command, Context};
use crate::phase::{self, Phase};
use crate::request::{BoardUpdate, settle};
use crate::state::State;

/// Signature of a top-level reducer.
pub type ReduceFn = fn(State, Action, &mut Context) -> (State, Vec<Command>);

/// Reduces one action: cross-cutting concerns first, then the current
/// phase, but only when the first step left the phase alone.
pub fn reduce(state: State, action: Action, cx: &mut Context) -> (State, Vec<Command>) {
    trace!(phase = %state.phase.kind(), ?action, "reduce");

    let current = state.phase.clone();
    let (state, phase_changed) = reduce_cross_cutting(state, &action, cx);
    let state = if phase_changed {
        state
    } else {
        current.reduce(state, &action, cx)
    };

    (state, cx.take_commands())
}

/// Actions that apply whatever the phase is. Returns whether the phase changed.
fn reduce_cross_cutting(mut state: State, action: &Action, cx: &mut Context) -> (State, bool) {
    match action {
        Action::ChangePhase(next) => {
            return (phase::transition(state, next.clone(), cx), true);
        }

        Action::PlayerModeChanged { side, mode } => {
            state.player_modes[*side] = *mode;
        }

        Action::Reset => {
            state.reset_confirmation_request = Some(cx.request(()));
        }

        Action::ResetConfirmed {
            request_id,
            execute,
        } => {
            if !settle(&mut state.reset_confirmation_request, *request_id) {
                warn!(%request_id, "stale reset confirmation ignored");
            } else if *execute {
                return (phase::transition(state, Phase::Reset, cx), true);
            }
        }

        Action::SaveCompleted { request_id } => {
            if !settle(&mut state.save_request, *request_id) {
                warn!(%request_id, "stale save completion ignored");
            }
        }

        Action::BoardUpdated { request_id } => {
            let bulk = state.board_update_request.as_ref().is_some_and(|request| {
                request.matches(*request_id)
                    && matches!(request.detail, BoardUpdate::WithoutAnimation(_))
            });
            if bulk {
                state.board_update_request = None;
            }
        }

        _ => {}
    }
    (state, false)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::board::Board;
    use crate::config::GameConfig;
    use crate::request::{IdGenerator, RequestId};
    use crate::selector::RandomMoveSelector;
    use crate::types::{Disk, PerSide, PlayerMode};

    struct Harness {
        ids: IdGenerator,
        rng: Pcg64,
        config: GameConfig,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                ids: IdGenerator::new(),
                rng: Pcg64::seed_from_u64(1),
                config: GameConfig::default(),
            }
        }

        fn reduce(&mut self, state: State, action: Action) -> (State, Vec<Command>) {
            let mut cx = Context::new(&mut self.ids, &mut self.rng, &RandomMoveSelector, &self.config);
            reduce(state, action, &mut cx)
        }
    }

    fn waiting_state() -> State {
        let mut state = State::new(Board::new(), Some(Disk::Dark), PerSide::default());
        state.phase = Phase::WaitForPlayer;
        state
    }

    #[test]
    fn reset_asks_for_confirmation_in_any_phase() {
        let mut harness = Harness::new();
        for phase in [Phase::Initial, Phase::WaitForPlayer, Phase::Pass, Phase::GameOver] {
            let mut state = waiting_state();
            state.phase = phase.clone();

            let (state, commands) = harness.reduce(state, Action::Reset);

            assert!(state.reset_confirmation_request.is_some());
            assert_eq!(state.phase, phase);
            assert!(commands.is_empty());
        }
    }

    #[test]
    fn declined_reset_only_clears_the_request() {
        let mut harness = Harness::new();
        let (asked, _) = harness.reduce(waiting_state(), Action::Reset);
        let request_id = asked.reset_confirmation_request.as_ref().unwrap().id;

        let (state, commands) = harness.reduce(
            asked.clone(),
            Action::ResetConfirmed {
                request_id,
                execute: false,
            },
        );

        assert_eq!(state.reset_confirmation_request, None);
        assert_eq!(state.phase, Phase::WaitForPlayer);
        assert_eq!(state.board, asked.board);
        assert!(commands.is_empty());
    }

    #[test]
    fn confirmed_reset_enters_reset_from_any_phase() {
        let mut harness = Harness::new();
        let mut state = waiting_state();
        state.phase = Phase::Pass;
        state.board.place_disk(Disk::Dark, 2, 3).unwrap();
        let (asked, _) = harness.reduce(state, Action::Reset);
        let request_id = asked.reset_confirmation_request.as_ref().unwrap().id;

        let (state, commands) = harness.reduce(
            asked,
            Action::ResetConfirmed {
                request_id,
                execute: true,
            },
        );

        assert_eq!(state.phase, Phase::Reset);
        assert_eq!(state.board, Board::new());
        assert!(matches!(
            state.board_update_request.as_ref().map(|r| &r.detail),
            Some(BoardUpdate::WithoutAnimation(changes)) if changes.len() == 68
        ));
        assert_eq!(commands, vec![Command::Dispatch(Action::ChangePhase(Phase::WaitForPlayer))]);
    }

    #[test]
    fn stale_answers_leave_requests_untouched() {
        let mut harness = Harness::new();
        let (asked, _) = harness.reduce(waiting_state(), Action::Reset);
        let stale = RequestId::from(9_999);

        let (state, _) = harness.reduce(
            asked.clone(),
            Action::ResetConfirmed {
                request_id: stale,
                execute: true,
            },
        );
        assert_eq!(state, asked);

        let (state, _) = harness.reduce(asked.clone(), Action::SaveCompleted { request_id: stale });
        assert_eq!(state, asked);

        let (state, _) = harness.reduce(asked.clone(), Action::BoardUpdated { request_id: stale });
        assert_eq!(state, asked);
    }

    #[test]
    fn mode_change_is_recorded_before_the_phase_reacts() {
        let mut harness = Harness::new();

        let (state, commands) = harness.reduce(
            waiting_state(),
            Action::PlayerModeChanged {
                side: Disk::Dark,
                mode: PlayerMode::Computer,
            },
        );

        assert_eq!(state.player_modes[Disk::Dark], PlayerMode::Computer);
        assert!(matches!(
            commands.as_slice(),
            [Command::Dispatch(Action::ChangePhase(Phase::Thinking { .. }))]
        ));
    }

    #[test]
    fn change_phase_skips_the_phase_reducer() {
        let mut harness = Harness::new();
        let mut state = waiting_state();
        state.phase = Phase::Initial;

        let (state, commands) = harness.reduce(state, Action::ChangePhase(Phase::WaitForPlayer));

        assert_eq!(state.phase, Phase::WaitForPlayer);
        assert!(commands.is_empty());
    }

    #[test]
    fn save_completion_clears_matching_request() {
        let mut harness = Harness::new();
        let mut state = waiting_state();
        state.phase = Phase::NextTurn;
        let (state, _) = harness.reduce(state, Action::ChangePhase(Phase::WaitForPlayer));
        let request_id = state.save_request.as_ref().unwrap().id;

        let (state, _) = harness.reduce(state, Action::SaveCompleted { request_id });

        assert_eq!(state.save_request, None);
    }
}
