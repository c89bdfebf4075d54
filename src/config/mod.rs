// src/config/mod.rs

//! Configuration for the tree watcher.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate queue sizing (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{ConfigFile, RawConfigFile, TreeWatcherConfig, DEFAULT_CAPACITY};
pub use validate::validate_watcher_config;
