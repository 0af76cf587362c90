//! Boundary reflection: folds a raw transformed score back into a level's
//! playable band like a ball bouncing between two walls.

use serde::{Deserialize, Serialize};

/// A level's score bounds. `None` on either side means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBounds {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl ScoreBounds {
    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn closed(min: i64, max: i64) -> Self {
        Self::new(Some(min), Some(max))
    }

    pub fn contains(&self, score: i64) -> bool {
        self.min.is_none_or(|min| score >= min) && self.max.is_none_or(|max| score <= max)
    }

    /// Reflect `raw` into the bounds.
    ///
    /// With both walls and a positive range the result follows a triangular
    /// wave of period `2 * range`. With a single wall the overshoot is
    /// mirrored back once. A degenerate range (`max <= min`) or no walls at
    /// all leaves `raw` untouched.
    pub fn reflect(&self, raw: i64) -> i64 {
        match (self.min, self.max) {
            (Some(min), Some(max)) => reflect_between(raw, min, max),
            (Some(min), None) if raw < min => mirror(min, raw),
            (None, Some(max)) if raw > max => mirror(max, raw),
            _ => raw,
        }
    }
}

fn reflect_between(raw: i64, min: i64, max: i64) -> i64 {
    let (min, max) = (i128::from(min), i128::from(max));
    let range = max - min;
    if range <= 0 {
        return raw as i64;
    }
    let period = 2 * range;
    let rem = (i128::from(raw) - min).rem_euclid(period);
    let folded = if rem < range {
        min + rem
    } else {
        max - (rem - range)
    };
    // `folded` lies in [min, max], both of which came from i64.
    folded as i64
}

/// `wall + (wall - raw)`, saturating at the i64 limits.
fn mirror(wall: i64, raw: i64) -> i64 {
    let mirrored = 2 * i128::from(wall) - i128::from(raw);
    mirrored.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}
