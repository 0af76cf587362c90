//! The game: one live [`PuzzleEngine`] plus everything that outlives a
//! session.
//!
//! After every click or frame the engine's events are drained and applied:
//! completions go to the [`MedalLedger`], golden numbers to the
//! [`AchievementSet`]. The applied events stay queued for the host, which
//! uses them for presentation (theme changes, the completion screen).

use chrono::NaiveDateTime;
use tracing::{debug, info};
use turing_core::engine::{ClickOutcome, EngineConfig, EngineError, FrameOutcome, PuzzleEngine};
use turing_core::event::GameEvent;
use turing_core::level::{LevelDef, LevelError, LevelSet};
use turing_core::snapshot::SnapshotError;

use crate::achievement::AchievementSet;
use crate::ledger::MedalLedger;
use crate::notify::Notifier;
use crate::storage::Storage;
use crate::translate::Translator;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("level {0} is locked")]
    Locked(u32),
}

pub struct Game<S, N, T> {
    levels: LevelSet,
    config: EngineConfig,
    storage: S,
    notifier: N,
    translator: T,
    ledger: MedalLedger,
    achievements: AchievementSet,
    engine: PuzzleEngine,
    events: Vec<GameEvent>,
}

impl<S: Storage, N: Notifier, T: Translator> Game<S, N, T> {
    /// Load progress from `storage` and open the player's initial level.
    pub fn new(
        levels: LevelSet,
        config: EngineConfig,
        storage: S,
        notifier: N,
        translator: T,
        now: NaiveDateTime,
    ) -> Result<Self, GameError> {
        let ledger = MedalLedger::load(&storage);
        let achievements = AchievementSet::load(&storage);
        let start = levels.require(ledger.initial_level(&levels))?;
        let engine = PuzzleEngine::new(start, config, now)?;
        info!(
            level = start.level_number,
            levels = levels.len(),
            achievements = achievements.len(),
            "game started"
        );

        let mut game = Self {
            levels,
            config,
            storage,
            notifier,
            translator,
            ledger,
            achievements,
            engine,
            events: Vec::new(),
        };
        game.apply_events(now);
        Ok(game)
    }

    // -----------------------------------------------------------------------
    // Play
    // -----------------------------------------------------------------------

    pub fn click(&mut self, index: usize, now: NaiveDateTime) -> Result<ClickOutcome, GameError> {
        let outcome = self.engine.click(index, now)?;
        self.apply_events(now);
        Ok(outcome)
    }

    pub fn advance_frame(&mut self, now: NaiveDateTime) -> FrameOutcome {
        let outcome = self.engine.advance_frame(now);
        self.apply_events(now);
        outcome
    }

    pub fn finish_animation(&mut self, now: NaiveDateTime) {
        self.engine.finish_animation(now);
        self.apply_events(now);
    }

    pub fn retry(&mut self, now: NaiveDateTime) -> Result<(), GameError> {
        self.engine.retry(now)?;
        self.apply_events(now);
        Ok(())
    }

    /// Move to the level after the current one. Returns `false` on the last
    /// level, leaving the current session alone.
    pub fn advance(&mut self, now: NaiveDateTime) -> Result<bool, GameError> {
        let current = self.current_level();
        let Some(next) = self.levels.next_after(current).map(|l| l.level_number) else {
            debug!(level = current, "no level after the last one");
            return Ok(false);
        };
        self.select_level(next, now)?;
        Ok(true)
    }

    /// Jump to `level`. Locked or unknown levels are refused.
    pub fn select_level(&mut self, level: u32, now: NaiveDateTime) -> Result<(), GameError> {
        let def = self.levels.require(level)?;
        if !self.ledger.is_unlocked(level) {
            return Err(GameError::Locked(level));
        }
        self.engine.load_level(def, now)?;
        debug!(level, "level selected");
        self.apply_events(now);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Save / resume
    // -----------------------------------------------------------------------

    /// Encode the current session so it can be resumed later.
    pub fn save_session(&self) -> Result<Vec<u8>, GameError> {
        Ok(self.engine.snapshot()?)
    }

    /// Resume a saved session. The level it belongs to must be unlocked.
    pub fn resume_session(&mut self, data: &[u8], now: NaiveDateTime) -> Result<(), GameError> {
        let header = turing_core::snapshot::read_snapshot_header(data)?;
        let level = self.levels.require(header.level_number)?;
        if !self.ledger.is_unlocked(level.level_number) {
            return Err(GameError::Locked(level.level_number));
        }
        self.engine = PuzzleEngine::restore(level, self.config, data, now)?;
        self.apply_events(now);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Event handling
    // -----------------------------------------------------------------------

    fn apply_events(&mut self, now: NaiveDateTime) {
        for event in self.engine.drain_events() {
            match &event {
                GameEvent::GoldenNumberFound { achievement, .. } => {
                    self.achievements.unlock(
                        achievement,
                        &mut self.storage,
                        &mut self.notifier,
                        &self.translator,
                        now,
                    );
                }
                GameEvent::LevelCompleted { level, medal, .. } => {
                    self.ledger.record(*level, *medal, &mut self.storage);
                }
                GameEvent::ThemeChanged { .. } => {}
            }
            self.events.push(event);
        }
    }

    /// Drain the events applied since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn engine(&self) -> &PuzzleEngine {
        &self.engine
    }

    pub fn current_level(&self) -> u32 {
        self.engine.level().level_number
    }

    pub fn level(&self) -> &LevelDef {
        self.engine.level()
    }

    pub fn levels(&self) -> &LevelSet {
        &self.levels
    }

    pub fn ledger(&self) -> &MedalLedger {
        &self.ledger
    }

    pub fn achievements(&self) -> &AchievementSet {
        &self.achievements
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
