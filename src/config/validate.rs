// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile, TreeWatcherConfig};
use crate::errors::{Result, TreeWatchError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = TreeWatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_watcher_config(&raw.watcher)?;
        Ok(ConfigFile::new_unchecked(raw.watcher))
    }
}

/// Both queues need room for at least one item; a zero-capacity queue could
/// never hand anything to the client.
pub fn validate_watcher_config(cfg: &TreeWatcherConfig) -> Result<()> {
    if cfg.event_capacity == 0 {
        return Err(TreeWatchError::ConfigError(
            "[watcher].event_capacity must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.error_capacity == 0 {
        return Err(TreeWatchError::ConfigError(
            "[watcher].error_capacity must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}
