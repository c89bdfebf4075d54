// src/config/model.rs

use serde::Deserialize;

/// Queue size used for both outbound channels unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 10;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [watcher]
/// event_capacity = 10
/// error_capacity = 10
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watcher: TreeWatcherConfig,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub watcher: TreeWatcherConfig,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(watcher: TreeWatcherConfig) -> Self {
        Self { watcher }
    }
}

/// `[watcher]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreeWatcherConfig {
    /// Capacity of the outbound event queue. When full, the dispatch loop
    /// waits for the client instead of dropping events.
    #[serde(default = "default_capacity")]
    pub event_capacity: usize,

    /// Capacity of the outbound error queue (same waiting behaviour).
    #[serde(default = "default_capacity")]
    pub error_capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for TreeWatcherConfig {
    fn default() -> Self {
        Self {
            event_capacity: default_capacity(),
            error_capacity: default_capacity(),
        }
    }
}

impl TreeWatcherConfig {
    /// Same capacity for both queues.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            event_capacity: capacity,
            error_capacity: capacity,
        }
    }
}
