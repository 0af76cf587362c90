//! Game configuration.
//!
//! Read from `config.{ron,toml,json}`. Every field has a default, so the
//! file may set any subset of them or be absent entirely.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tracing::debug;
use turing_core::engine::EngineConfig;
use turing_core::theme::ThemeBudget;

use crate::loader::{DataFile, DataLoadError};

/// Base name of the configuration file.
pub const CONFIG_FILE: &str = "config";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Ease score changes over several frames instead of jumping.
    pub animate: bool,
    /// Clicks a special theme survives once its condition lapses.
    pub theme_click_budget: u32,
    pub theme_time_budget_secs: u64,
    /// How long a notification stays up.
    pub notification_ms: u64,
    /// Where progress is saved. `None` keeps it in memory only.
    pub storage_dir: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let budget = ThemeBudget::default();
        Self {
            animate: true,
            theme_click_budget: budget.clicks,
            theme_time_budget_secs: budget.duration_secs,
            notification_ms: 4000,
            storage_dir: None,
        }
    }
}

impl GameConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            animate: self.animate,
            theme_budget: ThemeBudget {
                clicks: self.theme_click_budget,
                duration_secs: self.theme_time_budget_secs,
            },
        }
    }
}

/// Load the configuration from `dir`, or the defaults if there is none.
pub fn load_config(dir: &Path) -> Result<GameConfig, DataLoadError> {
    match DataFile::find(dir, CONFIG_FILE)? {
        Some(file) => {
            let config = file.read()?;
            debug!(file = %file.path.display(), "config loaded");
            Ok(config)
        }
        None => {
            debug!(dir = %dir.display(), "no config file, using defaults");
            Ok(GameConfig::default())
        }
    }
}
