//! Medals awarded on level completion.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Medal ranks, ordered worst to best. `None` still means the level was
/// completed, just over every threshold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    #[default]
    None,
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Medal {
    pub fn as_str(self) -> &'static str {
        match self {
            Medal::None => "none",
            Medal::Bronze => "bronze",
            Medal::Silver => "silver",
            Medal::Gold => "gold",
            Medal::Platinum => "platinum",
        }
    }

    /// The medal earned by finishing in `clicks`.
    pub fn for_clicks(clicks: u32, thresholds: &MedalThresholds) -> Medal {
        if clicks <= thresholds.min_steps {
            Medal::Platinum
        } else if clicks <= thresholds.gold_steps {
            Medal::Gold
        } else if clicks <= thresholds.silver_steps {
            Medal::Silver
        } else if clicks <= thresholds.bronze_steps {
            Medal::Bronze
        } else {
            Medal::None
        }
    }
}

impl fmt::Display for Medal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Click-count thresholds, best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalThresholds {
    pub min_steps: u32,
    pub gold_steps: u32,
    pub silver_steps: u32,
    pub bronze_steps: u32,
}

impl MedalThresholds {
    pub fn is_ordered(&self) -> bool {
        self.min_steps <= self.gold_steps
            && self.gold_steps <= self.silver_steps
            && self.silver_steps <= self.bronze_steps
    }
}
