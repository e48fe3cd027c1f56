//! Configuration for an engine session.

use std::time::Duration;

/// Delay between revealed characters unless configured otherwise.
pub const DEFAULT_TICK: Duration = Duration::from_millis(35);

/// Store key the session is saved under unless configured otherwise.
pub const DEFAULT_SAVE_KEY: &str = "verne_savegame";

/// Configuration for an [`Engine`](crate::Engine).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Time between two revealed characters. Zero disables the animation.
    pub tick_interval: Duration,
    /// Key used in the key-value store for the saved session.
    pub save_key: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK,
            save_key: DEFAULT_SAVE_KEY.to_string(),
        }
    }
}

impl EngineConfig {
    /// Set the tick interval.
    pub fn with_tick_interval(mut self, tick: Duration) -> Self {
        self.tick_interval = tick;
        self
    }

    /// Set the tick interval in milliseconds.
    pub fn with_tick_millis(self, millis: u64) -> Self {
        self.with_tick_interval(Duration::from_millis(millis))
    }

    /// Set the save key. Blank keys are ignored.
    pub fn with_save_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !key.trim().is_empty() {
            self.save_key = key;
        }
        self
    }

    /// Whether text should appear at once instead of animating.
    pub fn is_instant(&self) -> bool {
        self.tick_interval.is_zero()
    }
}
