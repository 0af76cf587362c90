//! Achievements: one-time unlocks, persisted as a list of ids under
//! [`ACHIEVEMENTS_KEY`].

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use tracing::info;

use crate::notify::Notifier;
use crate::storage::{Storage, load_or_default, save_or_warn};
use crate::translate::Translator;

pub const ACHIEVEMENTS_KEY: &str = "achievements";

/// Every achievement the game can award: one per golden constant.
pub const CATALOGUE: [&str; 9] = [
    "golden_1", "golden_2", "golden_3", "golden_4", "golden_5", "golden_6", "golden_7", "golden_8",
    "golden_9",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementSet {
    unlocked: BTreeSet<String>,
}

impl AchievementSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        Self {
            unlocked: load_or_default(storage, ACHIEVEMENTS_KEY),
        }
    }

    /// Unlock `id`. Already-unlocked ids are a no-op; a new one is saved and
    /// announced through `notifier` as `achievements.<id>`.
    pub fn unlock<S, N, T>(
        &mut self,
        id: &str,
        storage: &mut S,
        notifier: &mut N,
        translator: &T,
        now: NaiveDateTime,
    ) -> bool
    where
        S: Storage + ?Sized,
        N: Notifier + ?Sized,
        T: Translator + ?Sized,
    {
        if self.unlocked.contains(id) {
            return false;
        }
        self.unlocked.insert(id.to_string());
        info!(achievement = id, "achievement unlocked");
        save_or_warn(storage, ACHIEVEMENTS_KEY, &self.unlocked);

        let message = translator.translate(&format!("achievements.{id}"), &[]);
        notifier.show(message, now);
        true
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.unlocked.iter().map(String::as_str)
    }

    /// Catalogue entries paired with their unlock state, in catalogue order.
    pub fn progress(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        CATALOGUE.iter().map(|&id| (id, self.is_unlocked(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Toast;
    use crate::storage::MemoryStorage;
    use crate::translate::KeyTranslator;
    use serde_json::json;
    use turing_core::operator::{ButtonValue, golden_achievement};
    use turing_core::test_utils::noon;

    #[test]
    fn unlock_is_idempotent() {
        let mut storage = MemoryStorage::new();
        let mut toast = Toast::default();
        let mut set = AchievementSet::new();

        assert!(set.unlock("golden_3", &mut storage, &mut toast, &KeyTranslator, noon()));
        assert_eq!(toast.message(), Some("achievements.golden_3"));

        toast.dismiss();
        assert!(!set.unlock("golden_3", &mut storage, &mut toast, &KeyTranslator, noon()));
        assert_eq!(toast.message(), None);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn unlocks_persist_as_an_array() {
        let mut storage = MemoryStorage::new();
        let mut toast = Toast::default();
        let mut set = AchievementSet::new();
        set.unlock("golden_9", &mut storage, &mut toast, &KeyTranslator, noon());
        set.unlock("golden_1", &mut storage, &mut toast, &KeyTranslator, noon());

        assert_eq!(
            storage.get(ACHIEVEMENTS_KEY).unwrap(),
            Some(json!(["golden_1", "golden_9"]))
        );
        let reloaded = AchievementSet::load(&storage);
        assert!(reloaded.is_unlocked("golden_9"));
        assert_eq!(reloaded, set);
    }

    #[test]
    fn catalogue_covers_every_golden_value() {
        for v in 1..=9 {
            let id = golden_achievement(ButtonValue::new(v).unwrap());
            assert!(CATALOGUE.contains(&id.as_str()), "{id} missing");
        }
        let set = AchievementSet::new();
        assert!(set.progress().all(|(_, unlocked)| !unlocked));
    }
}
