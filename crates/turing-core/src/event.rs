//! Events the engine queues for its owner.
//!
//! The engine does not persist medals or achievements itself. It records
//! what happened and the owner drains the queue after each click or frame,
//! the same way research modules hand completions back to game code.

use crate::medal::Medal;
use crate::operator::ButtonValue;
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A button entered the special tier.
    GoldenNumberFound {
        button: usize,
        value: ButtonValue,
        achievement: String,
    },

    /// Every condition held at once.
    LevelCompleted {
        level: u32,
        clicks: u32,
        medal: Medal,
    },

    /// The theme signal switched themes.
    ThemeChanged { theme: Theme },
}
