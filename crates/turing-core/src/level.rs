//! Level definitions: immutable configuration loaded once at startup.
//!
//! Field names follow the camelCase of the level files
//! (`levelNumber`, `startScore`, `minSteps`, ...). A missing or `null`
//! bound is the unbounded sentinel.

use serde::{Deserialize, Serialize};

use crate::boundary::ScoreBounds;
use crate::medal::MedalThresholds;
use crate::operator::OperatorKind;

/// One button as configured in a level file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonSeed {
    pub name: OperatorKind,
    pub initial_value: u8,
    #[serde(default)]
    pub total_click_limit: Option<u32>,
    #[serde(default)]
    pub consecutive_click_limit: Option<u32>,
}

/// A level as configured in a level file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDef {
    pub level_number: u32,
    pub start_score: i64,
    #[serde(default)]
    pub min_score: Option<i64>,
    #[serde(default)]
    pub max_score: Option<i64>,
    pub min_steps: u32,
    pub gold_steps: u32,
    pub silver_steps: u32,
    pub bronze_steps: u32,
    pub buttons: Vec<ButtonSeed>,
}

/// Errors that make a level unplayable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    #[error("level {level} has no buttons")]
    NoButtons { level: u32 },
    #[error("level {level}: button {index} has initial value {value}, expected 1..=9")]
    InvalidButtonValue { level: u32, index: usize, value: u8 },
    #[error("level {level}: medal thresholds must satisfy min <= gold <= silver <= bronze")]
    ThresholdsOutOfOrder { level: u32 },
    #[error("level {level}: min score {min} exceeds max score {max}")]
    InvertedBounds { level: u32, min: i64, max: i64 },
    #[error("level {level}: start score {score} lies outside its bounds")]
    StartOutOfBounds { level: u32, score: i64 },
    #[error("no levels defined")]
    Empty,
    #[error("level at position {position} is numbered {found}, expected {expected}")]
    OutOfSequence { position: usize, expected: u32, found: u32 },
    #[error("level {0} not found")]
    NotFound(u32),
}

impl LevelDef {
    pub fn bounds(&self) -> ScoreBounds {
        ScoreBounds::new(self.min_score, self.max_score)
    }

    pub fn thresholds(&self) -> MedalThresholds {
        MedalThresholds {
            min_steps: self.min_steps,
            gold_steps: self.gold_steps,
            silver_steps: self.silver_steps,
            bronze_steps: self.bronze_steps,
        }
    }

    /// Check everything the engine relies on before a session may start.
    pub fn validate(&self) -> Result<(), LevelError> {
        let level = self.level_number;
        if self.buttons.is_empty() {
            return Err(LevelError::NoButtons { level });
        }
        for (index, seed) in self.buttons.iter().enumerate() {
            if !(1..=9).contains(&seed.initial_value) {
                return Err(LevelError::InvalidButtonValue {
                    level,
                    index,
                    value: seed.initial_value,
                });
            }
        }
        if !self.thresholds().is_ordered() {
            return Err(LevelError::ThresholdsOutOfOrder { level });
        }
        if let (Some(min), Some(max)) = (self.min_score, self.max_score)
            && min > max
        {
            return Err(LevelError::InvertedBounds { level, min, max });
        }
        if !self.bounds().contains(self.start_score) {
            return Err(LevelError::StartOutOfBounds {
                level,
                score: self.start_score,
            });
        }
        Ok(())
    }
}

/// The validated, ordered list of levels. Immutable once built.
///
/// Levels are numbered `1..=len` in order, so level `n` follows `n - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSet {
    levels: Vec<LevelDef>,
}

impl LevelSet {
    pub fn new(levels: Vec<LevelDef>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::Empty);
        }
        for level in &levels {
            level.validate()?;
        }
        for (position, level) in levels.iter().enumerate() {
            let expected = u32::try_from(position + 1).unwrap_or(u32::MAX);
            if level.level_number != expected {
                return Err(LevelError::OutOfSequence {
                    position,
                    expected,
                    found: level.level_number,
                });
            }
        }
        Ok(Self { levels })
    }

    pub fn get(&self, level_number: u32) -> Option<&LevelDef> {
        self.levels.iter().find(|l| l.level_number == level_number)
    }

    pub fn require(&self, level_number: u32) -> Result<&LevelDef, LevelError> {
        self.get(level_number).ok_or(LevelError::NotFound(level_number))
    }

    /// The level following `level_number`, if any.
    pub fn next_after(&self, level_number: u32) -> Option<&LevelDef> {
        self.levels.iter().find(|l| l.level_number > level_number)
    }

    pub fn first(&self) -> &LevelDef {
        &self.levels[0]
    }

    pub fn last(&self) -> &LevelDef {
        &self.levels[self.levels.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDef> {
        self.levels.iter()
    }

    pub fn level_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.levels.iter().map(|l| l.level_number)
    }
}
