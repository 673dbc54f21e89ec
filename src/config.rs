use serde::Deserialize;
use web_time::{Duration, SystemTime, UNIX_EPOCH};

const DEFAULT_THINKING_DELAY_MS: u64 = 2_000;

/// Engine settings supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// How long the computer "thinks" before its move lands.
    pub thinking_delay_ms: u64,
    /// Seed of the computer's move choice. Wall-clock derived when absent.
    pub seed: Option<u64>,
    /// Logs phase and action of every dispatch through `tracing`.
    pub trace_dispatch: bool,
}

impl GameConfig {
    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
    }

    pub fn rng_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_nanos() as u64)
                .unwrap_or_default()
        })
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            thinking_delay_ms: DEFAULT_THINKING_DELAY_MS,
            seed: None,
            trace_dispatch: false,
        }
    }
}
