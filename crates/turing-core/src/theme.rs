//! Theme signal: decides which cosmetic theme should be active.
//!
//! The engine never renders anything. After each settle point it feeds a
//! [`ThemeInput`] to the [`ThemeSignal`], which latches special themes
//! (victory, frustration, binary, cold) and reverts to the time-of-day
//! default once a latched theme's condition has lapsed and its click or
//! wall-clock budget has run out.

use std::f64::consts::PI;
use std::fmt;

use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Theme names
// ---------------------------------------------------------------------------

/// Themes the signal can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Day,
    Night,
    Victory,
    Frustration,
    Binary,
    Cold,
}

impl Theme {
    pub fn name(self) -> &'static str {
        match self {
            Theme::Day => "day",
            Theme::Night => "night",
            Theme::Victory => "victory",
            Theme::Frustration => "frustration",
            Theme::Binary => "binary",
            Theme::Cold => "cold",
        }
    }

    pub fn is_special(self) -> bool {
        self.priority() > 0
    }

    /// Higher wins. Default themes have priority 0.
    fn priority(self) -> u8 {
        match self {
            Theme::Victory => 4,
            Theme::Frustration => 3,
            Theme::Binary => 2,
            Theme::Cold => 1,
            Theme::Day | Theme::Night => 0,
        }
    }

    /// Renderer-facing description from the theme table.
    pub fn state(self) -> ThemeState {
        theme_state(self.name())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Theme table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    None,
    Particles,
}

/// What the theme renderer consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeState {
    pub kind: ThemeKind,
    pub name: String,
    pub score_text_color: String,
}

struct ThemeDef {
    name: &'static str,
    kind: ThemeKind,
    score_text_color: &'static str,
}

const DARK_TEXT: &str = "#3c4a61";
const LIGHT_TEXT: &str = "#c7cedb";

/// First entry is the fallback for unknown names.
static THEMES: [ThemeDef; 15] = [
    ThemeDef { name: "day", kind: ThemeKind::Particles, score_text_color: DARK_TEXT },
    ThemeDef { name: "night", kind: ThemeKind::Particles, score_text_color: LIGHT_TEXT },
    ThemeDef { name: "victory", kind: ThemeKind::Particles, score_text_color: LIGHT_TEXT },
    ThemeDef { name: "frustration", kind: ThemeKind::Particles, score_text_color: DARK_TEXT },
    ThemeDef { name: "binary", kind: ThemeKind::Particles, score_text_color: DARK_TEXT },
    ThemeDef { name: "cold", kind: ThemeKind::Particles, score_text_color: LIGHT_TEXT },
    ThemeDef { name: "golden", kind: ThemeKind::Particles, score_text_color: DARK_TEXT },
    ThemeDef { name: "neural", kind: ThemeKind::Particles, score_text_color: LIGHT_TEXT },
    ThemeDef { name: "fireflies", kind: ThemeKind::Particles, score_text_color: LIGHT_TEXT },
    ThemeDef { name: "bubbles", kind: ThemeKind::Particles, score_text_color: LIGHT_TEXT },
    ThemeDef { name: "cyberpunk", kind: ThemeKind::Particles, score_text_color: LIGHT_TEXT },
    ThemeDef { name: "burnt", kind: ThemeKind::Particles, score_text_color: LIGHT_TEXT },
    ThemeDef { name: "abyss", kind: ThemeKind::Particles, score_text_color: LIGHT_TEXT },
    ThemeDef { name: "constellation", kind: ThemeKind::Particles, score_text_color: LIGHT_TEXT },
    ThemeDef { name: "none", kind: ThemeKind::None, score_text_color: DARK_TEXT },
];

/// Look up a theme by name, falling back to the day theme.
pub fn theme_state(name: &str) -> ThemeState {
    let def = THEMES.iter().find(|t| t.name == name).unwrap_or_else(|| {
        tracing::warn!(theme = name, "unknown theme, using default entry");
        &THEMES[0]
    });
    ThemeState {
        kind: def.kind,
        name: def.name.to_string(),
        score_text_color: def.score_text_color.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Default theme resolver
// ---------------------------------------------------------------------------

const WINTER_SUNRISE: f64 = 8.0;
const WINTER_SUNSET: f64 = 17.0;
const SUMMER_SUNRISE: f64 = 5.0;
const SUMMER_SUNSET: f64 = 22.0;
const SUMMER_SOLSTICE_DAY: f64 = 172.0;
const DAYS_PER_YEAR: f64 = 365.25;

/// Day or night for a local wall-clock time.
///
/// Sunrise and sunset are interpolated between winter and summer extremes
/// along a cosine peaking at the summer solstice.
pub fn default_theme(now: NaiveDateTime) -> Theme {
    let hour = f64::from(now.hour());
    let day_of_year = f64::from(now.ordinal());

    let progress = ((day_of_year - SUMMER_SOLSTICE_DAY) * (2.0 * PI / DAYS_PER_YEAR)).cos();
    let summer_weight = (progress + 1.0) / 2.0;
    let sunrise = WINTER_SUNRISE + (SUMMER_SUNRISE - WINTER_SUNRISE) * summer_weight;
    let sunset = WINTER_SUNSET + (SUMMER_SUNSET - WINTER_SUNSET) * summer_weight;

    if hour >= sunset || hour < sunrise {
        Theme::Night
    } else {
        Theme::Day
    }
}

pub fn default_theme_name(now: NaiveDateTime) -> &'static str {
    default_theme(now).name()
}

// ---------------------------------------------------------------------------
// Signal
// ---------------------------------------------------------------------------

/// How long a special theme survives once its condition lapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeBudget {
    pub clicks: u32,
    pub duration_secs: u64,
}

impl Default for ThemeBudget {
    fn default() -> Self {
        Self {
            clicks: 25,
            duration_secs: 60,
        }
    }
}

impl ThemeBudget {
    fn duration(&self) -> TimeDelta {
        i64::try_from(self.duration_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }
}

/// Session facts the signal reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeInput {
    pub level_complete: bool,
    pub all_unsatisfied: bool,
    pub score: i64,
    pub min_score: Option<i64>,
    pub clicks: u32,
}

impl ThemeInput {
    /// The special theme whose condition currently holds, best first.
    fn wanted(&self) -> Option<Theme> {
        if self.level_complete {
            Some(Theme::Victory)
        } else if self.all_unsatisfied {
            Some(Theme::Frustration)
        } else if is_binary_pattern(self.score) {
            Some(Theme::Binary)
        } else if self.min_score == Some(self.score) {
            Some(Theme::Cold)
        } else {
            None
        }
    }
}

/// Exactly eight characters, each `0` or `1`.
pub fn is_binary_pattern(score: i64) -> bool {
    let s = score.to_string();
    s.len() == 8 && s.bytes().all(|b| b == b'0' || b == b'1')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Latch {
    theme: Theme,
    since_clicks: u32,
    since: NaiveDateTime,
}

/// Latched theme state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSignal {
    current: Theme,
    latch: Option<Latch>,
    budget: ThemeBudget,
}

impl ThemeSignal {
    /// Start on the time-of-day default with nothing latched.
    pub fn new(budget: ThemeBudget, now: NaiveDateTime) -> Self {
        Self {
            current: default_theme(now),
            latch: None,
            budget,
        }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// The latched special theme, if any.
    pub fn active_special(&self) -> Option<Theme> {
        self.latch.map(|l| l.theme)
    }

    pub fn state(&self) -> ThemeState {
        self.current.state()
    }

    fn expired(&self, latch: &Latch, clicks: u32, now: NaiveDateTime) -> bool {
        clicks.saturating_sub(latch.since_clicks) >= self.budget.clicks
            || now - latch.since >= self.budget.duration()
    }

    /// Re-evaluate after a settle point. Returns the new theme if it changed.
    pub fn update(&mut self, input: &ThemeInput, now: NaiveDateTime) -> Option<Theme> {
        let previous = self.current;
        match (input.wanted(), self.latch) {
            (Some(wanted), Some(latch)) if latch.theme == wanted => {}
            (Some(wanted), Some(latch))
                if latch.theme.priority() > wanted.priority()
                    && !self.expired(&latch, input.clicks, now) => {}
            (Some(wanted), _) => {
                self.latch = Some(Latch {
                    theme: wanted,
                    since_clicks: input.clicks,
                    since: now,
                });
                self.current = wanted;
            }
            (None, Some(latch)) => {
                if self.expired(&latch, input.clicks, now) {
                    self.latch = None;
                    self.current = default_theme(now);
                }
            }
            (None, None) => {}
        }
        (self.current != previous).then_some(self.current)
    }
}
