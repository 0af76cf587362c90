//! Data-driven setup for Turing's Node: the level list and the game
//! configuration, each read from RON, JSON or TOML by file extension.

pub mod config;
pub mod loader;

pub use config::{CONFIG_FILE, GameConfig, load_config};
pub use loader::{DataFile, DataLoadError, Format, LEVELS_FILE, load_levels};
