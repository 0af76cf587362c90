//! The medal ledger: the best medal earned per level, and the unlock rule
//! derived from it.
//!
//! Persisted under [`MEDALS_KEY`] as a map from level number to medal name,
//! e.g. `{"1": "gold", "2": "none"}`. A recorded `none` still means the
//! level was completed.

use std::collections::BTreeMap;

use tracing::debug;
use turing_core::level::LevelSet;
use turing_core::medal::Medal;

use crate::storage::{Storage, load_or_default, save_or_warn};

pub const MEDALS_KEY: &str = "best_medals";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MedalLedger {
    best: BTreeMap<u32, Medal>,
}

impl MedalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the ledger from `storage`. Unreadable data yields an empty ledger.
    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        Self {
            best: load_or_default(storage, MEDALS_KEY),
        }
    }

    /// Record a completion. Only a strictly better medal replaces the stored
    /// one; returns whether the ledger changed. Changes are saved
    /// immediately, and a failed save only costs persistence.
    pub fn record<S: Storage + ?Sized>(&mut self, level: u32, medal: Medal, storage: &mut S) -> bool {
        if self.best.get(&level).is_some_and(|&stored| stored >= medal) {
            return false;
        }
        self.best.insert(level, medal);
        debug!(level, %medal, "new best medal");
        save_or_warn(storage, MEDALS_KEY, &self.best);
        true
    }

    pub fn best(&self, level: u32) -> Option<Medal> {
        self.best.get(&level).copied()
    }

    pub fn is_completed(&self, level: u32) -> bool {
        self.best.contains_key(&level)
    }

    /// Level 1 is always open; any other level opens once the one before it
    /// has been completed.
    pub fn is_unlocked(&self, level: u32) -> bool {
        level <= 1 || self.is_completed(level - 1)
    }

    /// Whether anything has been completed at all.
    pub fn has_progress(&self) -> bool {
        !self.best.is_empty()
    }

    /// Where a returning player starts: just past the unbroken run of
    /// completed levels from the first one, capped at the last level.
    pub fn initial_level(&self, levels: &LevelSet) -> u32 {
        let mut level = levels.first().level_number;
        let last = levels.last().level_number;
        while level < last && self.is_completed(level) {
            level += 1;
        }
        level
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, Medal)> + '_ {
        self.best.iter().map(|(&level, &medal)| (level, medal))
    }
}
