// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load `explicit` if given; otherwise load [`default_config_path`] if it
/// exists, or fall back to built-in defaults.
pub fn load_or_default(explicit: Option<&Path>) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        return load_and_validate(path);
    }

    let default_path = default_config_path();
    if default_path.is_file() {
        debug!(path = ?default_path, "using config from working directory");
        load_and_validate(default_path)
    } else {
        Ok(ConfigFile::default())
    }
}

/// `treewatch.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("treewatch.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TreeWatchError;
    use std::io::Write;

    #[test]
    fn partial_watcher_section_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[watcher]\nevent_capacity = 64\n").unwrap();

        let cfg = load_and_validate(file.path()).unwrap();
        assert_eq!(cfg.watcher.event_capacity, 64);
        assert_eq!(cfg.watcher.error_capacity, 10);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let cfg = load_and_validate(file.path()).unwrap();
        assert_eq!(cfg.watcher, Default::default());
    }

    #[test]
    fn unknown_keys_are_a_toml_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[watcher]\nqueue = 3\n").unwrap();

        assert!(matches!(
            load_and_validate(file.path()),
            Err(TreeWatchError::TomlError(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_or_default(Some(dir.path().join("nope.toml").as_path())),
            Err(TreeWatchError::IoError(_))
        ));
    }
}
