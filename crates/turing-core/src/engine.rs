//! The puzzle engine: owns one live [`Session`] and runs the click pipeline.
//!
//! # Architecture
//!
//! The `PuzzleEngine` owns:
//! - The [`LevelDef`] being played (immutable)
//! - A [`Session`]: score, displayed score, buttons, click tracker, state
//! - A [`ThemeSignal`] fed after every settle point
//! - A queue of [`GameEvent`]s for the owner to drain
//!
//! # Settle Points
//!
//! Derived button state (condition, tier, disabled) is never updated
//! implicitly. [`PuzzleEngine::click`] either settles synchronously or, when
//! animation is enabled, leaves a pending target that
//! [`PuzzleEngine::advance_frame`] eases toward; derived state, the win
//! check and the theme are recomputed only once the display reaches it.
//! While a transition is in flight further clicks are rejected.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::button::{Button, ClickTracker, Tier};
use crate::event::GameEvent;
use crate::level::{LevelDef, LevelError};
use crate::medal::Medal;
use crate::operator::{self, ButtonValue};
use crate::theme::{ThemeBudget, ThemeInput, ThemeSignal, ThemeState};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Engine tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Ease the displayed score toward each new score over several frames.
    pub animate: bool,
    pub theme_budget: ThemeBudget,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            animate: true,
            theme_budget: ThemeBudget::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes and errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Playing,
    LevelComplete,
}

/// Why a click was ignored. Rejected clicks change nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotPlaying,
    Animating,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Rejected(RejectReason),
    /// A score transition started; call `advance_frame` until it settles.
    Animating,
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No transition in flight.
    Idle,
    InFlight,
    Settled,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid level: {0}")]
    InvalidLevel(#[from] LevelError),
    #[error("button index {index} out of range ({len} buttons)")]
    ButtonOutOfRange { index: usize, len: usize },
}

// ---------------------------------------------------------------------------
// Score animation
// ---------------------------------------------------------------------------

/// Eases the displayed score toward `target`: each frame covers a fifth of
/// the remaining distance, never less than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreAnimation {
    pub target: i64,
}

impl ScoreAnimation {
    pub fn new(target: i64) -> Self {
        Self { target }
    }

    /// The displayed value one frame later.
    pub fn step(&self, displayed: i64) -> i64 {
        let remaining = i128::from(self.target) - i128::from(displayed);
        let mut step = remaining / 5;
        if step == 0 {
            step = remaining.signum();
        }
        // Moves toward the target without passing it, so stays within i64.
        (i128::from(displayed) + step) as i64
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One attempt at a level. Rebuilt from the level on every (re)start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub level_number: u32,
    pub score: i64,
    pub displayed_score: i64,
    pub buttons: Vec<Button>,
    pub tracker: ClickTracker,
    pub clicks_in_level: u32,
    pub state: GameState,
    pub earned_medal: Option<Medal>,
    pub animation: Option<ScoreAnimation>,
}

impl Session {
    pub fn start(level: &LevelDef) -> Result<Self, LevelError> {
        let buttons = level
            .buttons
            .iter()
            .enumerate()
            .map(|(index, seed)| {
                ButtonValue::new(seed.initial_value)
                    .map(|value| Button::new(seed.name, value))
                    .ok_or(LevelError::InvalidButtonValue {
                        level: level.level_number,
                        index,
                        value: seed.initial_value,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            level_number: level.level_number,
            score: level.start_score,
            displayed_score: level.start_score,
            buttons,
            tracker: ClickTracker::from_seeds(&level.buttons),
            clicks_in_level: 0,
            state: GameState::Playing,
            earned_medal: None,
            animation: None,
        })
    }

    pub fn all_conditions_met(&self) -> bool {
        self.buttons.iter().all(|b| b.condition_met)
    }

    pub fn all_unsatisfied(&self) -> bool {
        self.buttons.iter().all(|b| b.tier == Tier::Unsatisfied)
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PuzzleEngine {
    pub(crate) level: LevelDef,
    pub(crate) config: EngineConfig,
    pub(crate) session: Session,
    pub(crate) theme: ThemeSignal,
    pub(crate) events: Vec<GameEvent>,
}

impl PuzzleEngine {
    /// Start a fresh session on `level`. Refuses invalid level data.
    pub fn new(
        level: &LevelDef,
        config: EngineConfig,
        now: NaiveDateTime,
    ) -> Result<Self, EngineError> {
        level.validate()?;
        let mut engine = Self {
            level: level.clone(),
            config,
            session: Session::start(level)?,
            theme: ThemeSignal::new(config.theme_budget, now),
            events: Vec::new(),
        };
        engine.recompute_derived();
        engine.update_theme(now);
        debug!(level = level.level_number, score = level.start_score, "session started");
        Ok(engine)
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Click the button at `index`.
    pub fn click(&mut self, index: usize, now: NaiveDateTime) -> Result<ClickOutcome, EngineError> {
        let len = self.session.buttons.len();
        if index >= len {
            return Err(EngineError::ButtonOutOfRange { index, len });
        }
        if self.session.state != GameState::Playing {
            return Ok(ClickOutcome::Rejected(RejectReason::NotPlaying));
        }
        if self.session.animation.is_some() {
            return Ok(ClickOutcome::Rejected(RejectReason::Animating));
        }
        if self.session.buttons[index].disabled {
            return Ok(ClickOutcome::Rejected(RejectReason::Disabled));
        }

        self.session.tracker.record_click(index);
        self.session.clicks_in_level = self.session.clicks_in_level.saturating_add(1);

        let score = self.session.score;
        let button = &mut self.session.buttons[index];
        let raw = button.kind.transform(score, button.value);
        button.value = button.value.cycled();
        let target = self.level.bounds().reflect(raw);

        debug!(
            button = index,
            kind = %button.kind,
            from = score,
            raw,
            target,
            "click"
        );

        if self.config.animate && target != self.session.displayed_score {
            self.session.animation = Some(ScoreAnimation::new(target));
            Ok(ClickOutcome::Animating)
        } else {
            self.settle(target, now);
            Ok(ClickOutcome::Settled)
        }
    }

    /// Advance the score transition by one frame.
    pub fn advance_frame(&mut self, now: NaiveDateTime) -> FrameOutcome {
        let Some(animation) = self.session.animation else {
            return FrameOutcome::Idle;
        };
        self.session.displayed_score = animation.step(self.session.displayed_score);
        if self.session.displayed_score == animation.target {
            self.session.animation = None;
            self.settle(animation.target, now);
            FrameOutcome::Settled
        } else {
            FrameOutcome::InFlight
        }
    }

    /// Run frames until the pending transition settles.
    pub fn finish_animation(&mut self, now: NaiveDateTime) {
        while self.advance_frame(now) == FrameOutcome::InFlight {}
    }

    /// Start the same level over.
    pub fn retry(&mut self, now: NaiveDateTime) -> Result<(), EngineError> {
        self.session = Session::start(&self.level)?;
        self.theme = ThemeSignal::new(self.config.theme_budget, now);
        self.recompute_derived();
        self.update_theme(now);
        debug!(level = self.level.level_number, "session restarted");
        Ok(())
    }

    /// Replace the level and start a fresh session on it.
    pub fn load_level(&mut self, level: &LevelDef, now: NaiveDateTime) -> Result<(), EngineError> {
        level.validate()?;
        self.level = level.clone();
        self.retry(now)
    }

    // -----------------------------------------------------------------------
    // Settle pipeline
    // -----------------------------------------------------------------------

    fn settle(&mut self, target: i64, now: NaiveDateTime) {
        self.session.score = target;
        self.session.displayed_score = target;
        self.recompute_derived();
        if self.session.state == GameState::Playing && self.session.all_conditions_met() {
            self.complete_level();
        }
        self.update_theme(now);
    }

    /// Conditions, golden overrides and disabled flags from the current score.
    fn recompute_derived(&mut self) {
        let score = self.session.score;
        for (index, button) in self.session.buttons.iter_mut().enumerate() {
            button.condition_met = button.kind.condition(score, button.value);

            let golden = operator::is_golden(score, button.value);
            if golden && button.tier != Tier::Special {
                self.events.push(GameEvent::GoldenNumberFound {
                    button: index,
                    value: button.value,
                    achievement: operator::golden_achievement(button.value),
                });
            }
            button.tier = if golden {
                Tier::Special
            } else if button.condition_met {
                Tier::Satisfied
            } else {
                Tier::Unsatisfied
            };

            button.disabled = self.session.tracker.is_disabled(index);
        }
    }

    fn complete_level(&mut self) {
        let clicks = self.session.clicks_in_level;
        let medal = Medal::for_clicks(clicks, &self.level.thresholds());
        self.session.state = GameState::LevelComplete;
        self.session.earned_medal = Some(medal);
        info!(level = self.level.level_number, clicks, %medal, "level complete");
        self.events.push(GameEvent::LevelCompleted {
            level: self.level.level_number,
            clicks,
            medal,
        });
    }

    pub(crate) fn update_theme(&mut self, now: NaiveDateTime) {
        let input = ThemeInput {
            level_complete: self.session.state == GameState::LevelComplete,
            all_unsatisfied: self.session.all_unsatisfied(),
            score: self.session.score,
            min_score: self.level.min_score,
            clicks: self.session.clicks_in_level,
        };
        if let Some(theme) = self.theme.update(&input, now) {
            debug!(%theme, "theme changed");
            self.events.push(GameEvent::ThemeChanged { theme });
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn level(&self) -> &LevelDef {
        &self.level
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn score(&self) -> i64 {
        self.session.score
    }

    pub fn displayed_score(&self) -> i64 {
        self.session.displayed_score
    }

    pub fn buttons(&self) -> &[Button] {
        &self.session.buttons
    }

    pub fn button(&self, index: usize) -> Option<&Button> {
        self.session.buttons.get(index)
    }

    pub fn tracker(&self) -> &ClickTracker {
        &self.session.tracker
    }

    pub fn clicks(&self) -> u32 {
        self.session.clicks_in_level
    }

    pub fn state(&self) -> GameState {
        self.session.state
    }

    pub fn earned_medal(&self) -> Option<Medal> {
        self.session.earned_medal
    }

    pub fn is_animating(&self) -> bool {
        self.session.animation.is_some()
    }

    pub fn theme(&self) -> &ThemeSignal {
        &self.theme
    }

    pub fn theme_state(&self) -> ThemeState {
        self.theme.state()
    }

    /// Drain all pending events.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }
}
