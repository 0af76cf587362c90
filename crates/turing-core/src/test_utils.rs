//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use chrono::{NaiveDate, NaiveDateTime};

use crate::engine::EngineConfig;
use crate::level::{ButtonSeed, LevelDef, LevelSet};
use crate::operator::OperatorKind;

// ===========================================================================
// Levels
// ===========================================================================

/// A level with medal thresholds 3/5/8/12 and no click limits.
pub fn level_with(
    number: u32,
    start: i64,
    min: Option<i64>,
    max: Option<i64>,
    buttons: &[(OperatorKind, u8)],
) -> LevelDef {
    LevelDef {
        level_number: number,
        start_score: start,
        min_score: min,
        max_score: max,
        min_steps: 3,
        gold_steps: 5,
        silver_steps: 8,
        bronze_steps: 12,
        buttons: buttons
            .iter()
            .map(|&(name, initial_value)| ButtonSeed {
                name,
                initial_value,
                total_click_limit: None,
                consecutive_click_limit: None,
            })
            .collect(),
    }
}

/// Start 3 in `0..=100`: one Boost click reaches 4, which satisfies both.
pub fn two_button_level() -> LevelDef {
    level_with(
        1,
        3,
        Some(0),
        Some(100),
        &[(OperatorKind::Boost, 1), (OperatorKind::Split, 2)],
    )
}

pub fn three_levels() -> LevelSet {
    let levels = (1..=3)
        .map(|n| {
            let mut level = two_button_level();
            level.level_number = n;
            level
        })
        .collect();
    LevelSet::new(levels).expect("fixture levels are valid")
}

// ===========================================================================
// Engine
// ===========================================================================

/// Settle every click synchronously.
pub fn instant_config() -> EngineConfig {
    EngineConfig {
        animate: false,
        ..EngineConfig::default()
    }
}

/// Midday on the summer solstice: the default theme is day.
pub fn noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 21)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid fixture date")
}
