use tracing::{info, instrument};
use web_time::Instant;

use crate::action::Action;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::save;
use crate::selector::MoveSelector;
use crate::state::State;
use crate::store::{Dispatcher, Middleware, Store, SubscriptionId, TracingMiddleware};

/// One game, fresh or restored, as seen by the host.
///
/// The host dispatches actions, answers the requests that show up in the
/// published [`State`], and calls [`Game::tick`] so the computer player's
/// delayed moves can land.
pub struct Game {
    store: Store,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self::with_state(State::default(), config)
    }

    pub fn with_state(state: State, config: GameConfig) -> Self {
        let trace = config.trace_dispatch;
        let mut store = Store::new(state, config);
        if trace {
            store.add_middleware(Box::new(TracingMiddleware));
        }
        Self { store }
    }

    /// Restores a game from save text. The game still has to be started.
    #[instrument(skip(data, config), fields(len = data.len()))]
    pub fn load(data: &str, config: GameConfig) -> Result<Self, GameError> {
        let saved = save::decode(data)?;
        info!(turn = ?saved.turn, "restored saved game");
        Ok(Self::with_state(saved.into_state(), config))
    }

    pub fn dispatch(&mut self, action: Action) {
        self.store.dispatch(action);
    }

    pub fn dispatch_thunk<F>(&mut self, thunk: F)
    where
        F: FnOnce(&mut dyn Dispatcher, &State),
    {
        self.store.dispatch_thunk(thunk);
    }

    /// Calls `subscriber` with every state the engine publishes.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&State) + 'static) -> SubscriptionId {
        self.store.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn state(&self) -> &State {
        self.store.state()
    }

    /// Fires every timer that is due now.
    pub fn tick(&mut self) {
        self.advance(Instant::now());
    }

    pub fn advance(&mut self, now: Instant) {
        self.store.advance(now);
    }

    /// When the next timer is due, if any is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.store.next_deadline()
    }

    pub fn save_data(&self) -> String {
        self.state().save_data()
    }

    pub fn set_selector(&mut self, selector: Box<dyn MoveSelector>) {
        self.store.set_selector(selector);
    }

    pub fn add_middleware(&mut self, middleware: Box<dyn Middleware>) {
        self.store.add_middleware(middleware);
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
