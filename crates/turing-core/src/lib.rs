//! Turing Core -- the puzzle engine for the Turing's Node number game.
//!
//! A single integer score is transformed by a fixed palette of operator
//! buttons. Each button also carries a predicate over the current score; a
//! level is won the moment every button's predicate holds at once.
//!
//! # Click Pipeline
//!
//! Each call to [`engine::PuzzleEngine::click`] runs:
//!
//! 1. **Gate** -- reject the click if the level is complete, a score
//!    transition is in flight, or the button is disabled.
//! 2. **Transform** -- apply the operator to the current score.
//! 3. **Cycle** -- advance the clicked button's value (1..=9, wrapping).
//! 4. **Reflect** -- fold the raw score back into the level's bounds.
//! 5. **Commit** -- immediately, or once the eased display reaches it.
//! 6. **Settle** -- recompute conditions, golden overrides, disabled flags,
//!    the win check with its medal, and the theme signal.
//!
//! # Key Types
//!
//! - [`engine::PuzzleEngine`] -- owns one [`engine::Session`] and runs the pipeline.
//! - [`operator::OperatorKind`] -- the nine operators and their conditions.
//! - [`boundary::ScoreBounds`] -- boundary reflection.
//! - [`button::ClickTracker`] -- index-addressed click counters and limits.
//! - [`level::LevelSet`] -- validated, immutable level data.
//! - [`theme::ThemeSignal`] -- latched cosmetic theme with expiry.
//! - [`snapshot`] -- versioned session snapshots via bitcode.

pub mod boundary;
pub mod button;
pub mod engine;
pub mod event;
pub mod kernel;
pub mod level;
pub mod medal;
pub mod operator;
pub mod snapshot;
pub mod theme;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
