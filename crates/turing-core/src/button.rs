//! Buttons and the click tracker.
//!
//! Click counters live in a [`ClickTracker`] addressed by button index,
//! parallel to the session's button list, rather than on the buttons
//! themselves.

use serde::{Deserialize, Serialize};

use crate::level::ButtonSeed;
use crate::operator::{ButtonValue, OperatorKind};

/// A button's current classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tier {
    #[default]
    Unsatisfied,
    Satisfied,
    /// Golden override: the score spells this value's constant.
    Special,
}

/// One operator button in a live session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub kind: OperatorKind,
    pub value: ButtonValue,
    /// Derived at every settle point.
    pub condition_met: bool,
    /// Derived at every settle point.
    pub tier: Tier,
    /// Derived at every settle point.
    pub disabled: bool,
}

impl Button {
    pub fn new(kind: OperatorKind, value: ButtonValue) -> Self {
        Self {
            kind,
            value,
            condition_met: false,
            tier: Tier::Unsatisfied,
            disabled: false,
        }
    }
}

/// Click counts and optional limits for one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClickCounter {
    pub total: u32,
    pub consecutive: u32,
    pub total_limit: Option<u32>,
    pub consecutive_limit: Option<u32>,
}

impl ClickCounter {
    pub fn with_limits(total_limit: Option<u32>, consecutive_limit: Option<u32>) -> Self {
        Self {
            total_limit,
            consecutive_limit,
            ..Self::default()
        }
    }

    /// A limit of zero means "no limit".
    pub fn is_exhausted(&self) -> bool {
        let reached = |limit: Option<u32>, count: u32| limit.is_some_and(|l| l != 0 && count >= l);
        reached(self.total_limit, self.total) || reached(self.consecutive_limit, self.consecutive)
    }
}

/// Per-button click counters, indexed like the button list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClickTracker {
    counters: Vec<ClickCounter>,
}

impl ClickTracker {
    pub fn from_seeds(seeds: &[ButtonSeed]) -> Self {
        Self {
            counters: seeds
                .iter()
                .map(|s| ClickCounter::with_limits(s.total_click_limit, s.consecutive_click_limit))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn counter(&self, index: usize) -> Option<&ClickCounter> {
        self.counters.get(index)
    }

    pub fn is_disabled(&self, index: usize) -> bool {
        self.counters.get(index).is_some_and(ClickCounter::is_exhausted)
    }

    /// Count a click on `index`; every other button's streak resets.
    pub fn record_click(&mut self, index: usize) {
        for (i, counter) in self.counters.iter_mut().enumerate() {
            if i == index {
                counter.total = counter.total.saturating_add(1);
                counter.consecutive = counter.consecutive.saturating_add(1);
            } else {
                counter.consecutive = 0;
            }
        }
    }
}
