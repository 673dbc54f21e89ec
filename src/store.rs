use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg64;
use tracing::{debug, instrument};
use web_time::Instant;

use crate::action::Action;
use crate::command::{Command, Context};
use crate::config::GameConfig;
use crate::reducer::{self, ReduceFn};
use crate::request::IdGenerator;
use crate::selector::{MoveSelector, RandomMoveSelector};
use crate::state::State;
use crate::timer::TimerQueue;

/// Anything that accepts actions.
pub trait Dispatcher {
    fn dispatch(&mut self, action: Action);
}

/// Observes every reduction the store performs, right before and right
/// after it. Middlewares only watch: they cannot change, delay or drop an
/// action.
pub trait Middleware {
    fn before(&mut self, _state: &State, _action: &Action) {}

    fn after(&mut self, _state: &State) {}
}

/// Logs the phase around each action.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn before(&mut self, state: &State, action: &Action) {
        debug!(phase = ?state.phase, ?action, "dispatch");
    }

    fn after(&mut self, state: &State) {
        debug!(phase = ?state.phase, "dispatched");
    }
}

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for SubscriptionId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

type Subscriber = Box<dyn FnMut(&State)>;

/// Holds the state, reduces actions and runs the commands they produce.
///
/// Every reduction is committed and published before any of its commands
/// run; commands that dispatch go to the back of the queue.
pub struct Store {
    state: State,
    reducer: ReduceFn,
    config: GameConfig,
    ids: IdGenerator,
    rng: Pcg64,
    selector: Box<dyn MoveSelector>,
    timers: TimerQueue,
    queue: VecDeque<Action>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    middlewares: Vec<Box<dyn Middleware>>,
}

impl Store {
    pub fn new(state: State, config: GameConfig) -> Self {
        Self::with_reducer(state, config, reducer::reduce)
    }

    pub fn with_reducer(state: State, config: GameConfig, reducer: ReduceFn) -> Self {
        let rng = Pcg64::seed_from_u64(config.rng_seed());
        Self {
            state,
            reducer,
            config,
            ids: IdGenerator::new(),
            rng,
            selector: Box::new(RandomMoveSelector),
            timers: TimerQueue::new(),
            queue: VecDeque::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
            middlewares: Vec::new(),
        }
    }

    /// The last published state.
    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn set_selector(&mut self, selector: Box<dyn MoveSelector>) {
        self.selector = selector;
    }

    pub fn add_middleware(&mut self, middleware: Box<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&State) + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Runs `thunk` against the published state. Whatever it dispatches goes
    /// through the normal pipeline.
    pub fn dispatch_thunk<F>(&mut self, thunk: F)
    where
        F: FnOnce(&mut dyn Dispatcher, &State),
    {
        let state = self.state.clone();
        thunk(self, &state);
    }

    /// Fires the timers due at `now`, one dispatch at a time.
    pub fn advance(&mut self, now: Instant) {
        while let Some(action) = self.timers.pop_due(now) {
            self.dispatch(action);
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    fn apply(&mut self, action: Action) {
        for middleware in self.middlewares.iter_mut() {
            middleware.before(&self.state, &action);
        }

        let state = std::mem::take(&mut self.state);
        let mut cx = Context::new(&mut self.ids, &mut self.rng, self.selector.as_ref(), &self.config);
        let (state, commands) = (self.reducer)(state, action, &mut cx);
        self.state = state;

        for middleware in self.middlewares.iter_mut() {
            middleware.after(&self.state);
        }
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&self.state);
        }

        for command in commands {
            self.run(command);
        }
    }

    fn run(&mut self, command: Command) {
        match command {
            Command::Dispatch(action) => self.queue.push_back(action),
            Command::ScheduleTimer { id, delay, action } => {
                self.timers.schedule(id, Instant::now(), delay, action);
            }
            Command::CancelTimer(id) => {
                self.timers.cancel(id);
            }
        }
    }
}

impl Dispatcher for Store {
    #[instrument(skip(self))]
    fn dispatch(&mut self, action: Action) {
        self.queue.push_back(action);
        while let Some(action) = self.queue.pop_front() {
            self.apply(action);
        }
    }
}
