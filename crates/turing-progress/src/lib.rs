//! Turing Progress -- everything that outlives a single puzzle session.
//!
//! - [`ledger::MedalLedger`] -- best medal per level and the unlock rule.
//! - [`achievement::AchievementSet`] -- one-time golden-number unlocks.
//! - [`storage::Storage`] -- JSON key/value persistence; failures are
//!   logged and never reach gameplay.
//! - [`notify::Notifier`] and [`translate::Translator`] -- host hooks.
//! - [`game::Game`] -- wires a [`turing_core::engine::PuzzleEngine`] to all
//!   of the above.

pub mod achievement;
pub mod game;
pub mod ledger;
pub mod notify;
pub mod storage;
pub mod translate;

pub use game::{Game, GameError};
