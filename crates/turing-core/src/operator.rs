//! The operator registry: nine fixed button kinds, each pairing a score
//! transform with a "satisfied" condition.
//!
//! The registry is a static table built once; [`OperatorKind::def`] looks
//! up an entry. Unknown operator names coming from level data resolve to
//! [`OperatorKind::default`] with a warning instead of failing the load.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kernel;

// ---------------------------------------------------------------------------
// Button value
// ---------------------------------------------------------------------------

/// A button's digit. Always in `1..=9`, so division by it is always defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ButtonValue(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("button value {0} is outside 1..=9")]
pub struct InvalidButtonValue(pub u8);

impl ButtonValue {
    pub const MIN: ButtonValue = ButtonValue(1);
    pub const MAX: ButtonValue = ButtonValue(9);

    pub fn new(value: u8) -> Option<Self> {
        (1..=9).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// The value after one click: `(value mod 9) + 1`.
    pub fn cycled(self) -> Self {
        Self(self.0 % 9 + 1)
    }

    fn as_i64(self) -> i64 {
        i64::from(self.0)
    }
}

impl TryFrom<u8> for ButtonValue {
    type Error = InvalidButtonValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidButtonValue(value))
    }
}

impl From<ButtonValue> for u8 {
    fn from(value: ButtonValue) -> Self {
        value.0
    }
}

impl fmt::Display for ButtonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Operator kinds
// ---------------------------------------------------------------------------

/// The nine operator tags. Serialized by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OperatorKind {
    Primer,
    Split,
    #[default]
    Boost,
    Digit,
    Reduce,
    Align,
    Fiber,
    Factor,
    Cipher,
}

impl OperatorKind {
    pub const ALL: [OperatorKind; 9] = [
        OperatorKind::Primer,
        OperatorKind::Split,
        OperatorKind::Boost,
        OperatorKind::Digit,
        OperatorKind::Reduce,
        OperatorKind::Align,
        OperatorKind::Fiber,
        OperatorKind::Factor,
        OperatorKind::Cipher,
    ];

    /// Registry entry for this kind.
    pub fn def(self) -> &'static OperatorDef {
        &REGISTRY[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.def().name
    }

    /// Resolve a name from level data. `None` if the name is unknown.
    pub fn from_name(name: &str) -> Option<Self> {
        REGISTRY.iter().find(|def| def.name == name).map(|def| def.kind)
    }

    pub fn transform(self, score: i64, value: ButtonValue) -> i64 {
        (self.def().transform)(score, value)
    }

    pub fn condition(self, score: i64, value: ButtonValue) -> bool {
        (self.def().condition)(score, value)
    }
}

impl From<String> for OperatorKind {
    fn from(name: String) -> Self {
        OperatorKind::from_name(&name).unwrap_or_else(|| {
            let fallback = OperatorKind::default();
            tracing::warn!(
                operator = %name,
                fallback = fallback.name(),
                "unknown operator kind, using registry default"
            );
            fallback
        })
    }
}

impl From<OperatorKind> for String {
    fn from(kind: OperatorKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Registry table
// ---------------------------------------------------------------------------

pub type TransformFn = fn(i64, ButtonValue) -> i64;
pub type ConditionFn = fn(i64, ButtonValue) -> bool;

/// One registry row.
#[derive(Debug)]
pub struct OperatorDef {
    pub kind: OperatorKind,
    pub name: &'static str,
    pub transform: TransformFn,
    pub condition: ConditionFn,
}

/// Indexed by `OperatorKind as usize`.
static REGISTRY: [OperatorDef; 9] = [
    OperatorDef {
        kind: OperatorKind::Primer,
        name: "Primer",
        transform: primer_transform,
        condition: primer_condition,
    },
    OperatorDef {
        kind: OperatorKind::Split,
        name: "Split",
        transform: split_transform,
        condition: split_condition,
    },
    OperatorDef {
        kind: OperatorKind::Boost,
        name: "Boost",
        transform: boost_transform,
        condition: boost_condition,
    },
    OperatorDef {
        kind: OperatorKind::Digit,
        name: "Digit",
        transform: digit_transform,
        condition: digit_condition,
    },
    OperatorDef {
        kind: OperatorKind::Reduce,
        name: "Reduce",
        transform: reduce_transform,
        condition: reduce_condition,
    },
    OperatorDef {
        kind: OperatorKind::Align,
        name: "Align",
        transform: align_transform,
        condition: align_condition,
    },
    OperatorDef {
        kind: OperatorKind::Fiber,
        name: "Fiber",
        transform: fiber_transform,
        condition: fiber_condition,
    },
    OperatorDef {
        kind: OperatorKind::Factor,
        name: "Factor",
        transform: factor_transform,
        condition: factor_condition,
    },
    OperatorDef {
        kind: OperatorKind::Cipher,
        name: "Cipher",
        transform: cipher_transform,
        condition: cipher_condition,
    },
];

/// Ceiling division for a positive divisor.
fn ceil_div(n: i64, d: i64) -> i64 {
    let q = n.div_euclid(d);
    if n.rem_euclid(d) == 0 { q } else { q + 1 }
}

/// Past the largest `i64` prime the score stays where it is.
fn primer_transform(score: i64, _value: ButtonValue) -> i64 {
    kernel::next_prime(score).unwrap_or(score)
}

fn primer_condition(score: i64, value: ButtonValue) -> bool {
    let v = value.as_i64();
    (score.saturating_sub(v)..=score.saturating_add(v)).any(kernel::is_prime)
}

fn split_transform(score: i64, value: ButtonValue) -> i64 {
    ceil_div(score, value.as_i64())
}

fn split_condition(score: i64, value: ButtonValue) -> bool {
    score % value.as_i64() == 0
}

fn boost_transform(score: i64, value: ButtonValue) -> i64 {
    score.saturating_add(value.as_i64())
}

fn boost_condition(score: i64, _value: ButtonValue) -> bool {
    kernel::is_perfect_square(score)
}

fn digit_transform(score: i64, value: ButtonValue) -> i64 {
    score.saturating_mul(value.as_i64())
}

fn digit_condition(score: i64, value: ButtonValue) -> bool {
    kernel::digital_root(score.unsigned_abs()) == u64::from(value.get())
}

fn reduce_transform(score: i64, value: ButtonValue) -> i64 {
    let v = value.as_i64();
    ceil_div(score, v * v)
}

/// Divisible by some perfect square `i²` with `i >= 2`.
fn reduce_condition(score: i64, _value: ButtonValue) -> bool {
    kernel::has_square_factor(score)
}

fn align_transform(score: i64, value: ButtonValue) -> i64 {
    let v = value.as_i64();
    score.saturating_add(v - score % v)
}

fn align_condition(score: i64, _value: ButtonValue) -> bool {
    kernel::is_palindrome(score)
}

fn fiber_transform(score: i64, _value: ButtonValue) -> i64 {
    kernel::next_fibonacci(score)
}

fn fiber_condition(score: i64, _value: ButtonValue) -> bool {
    kernel::is_fibonacci(score)
}

fn factor_transform(score: i64, value: ButtonValue) -> i64 {
    score.saturating_add(kernel::factorial(value.as_i64()))
}

fn factor_condition(score: i64, _value: ButtonValue) -> bool {
    kernel::is_factorial(score)
}

fn cipher_transform(score: i64, value: ButtonValue) -> i64 {
    kernel::shift_digits(score, value.get())
}

fn cipher_condition(score: i64, _value: ButtonValue) -> bool {
    kernel::has_unique_digits(score)
}

// ---------------------------------------------------------------------------
// Golden constants
// ---------------------------------------------------------------------------

/// Minimum length of a score's decimal string for the golden override.
pub const GOLDEN_MIN_DIGITS: usize = 4;

/// Leading digits of a constant per button value, kept as strings so no
/// floating-point rounding sneaks into the prefix check.
static GOLDEN_DIGITS: [&str; 9] = [
    "1618033988749894848", // golden ratio
    "1414213562373095048", // sqrt 2
    "3141592653589793238", // pi
    "4669201609102990671", // Feigenbaum delta
    "5772156649015328606", // Euler-Mascheroni
    "6931471805599453094", // ln 2
    "1732050807568877293", // sqrt 3
    "6283185307179586476", // tau
    "2718281828459045235", // e
];

/// The constant digit string associated with a button value.
pub fn golden_digits(value: ButtonValue) -> &'static str {
    GOLDEN_DIGITS[usize::from(value.get() - 1)]
}

/// Whether `score` spells out the leading digits of the value's constant.
pub fn is_golden(score: i64, value: ButtonValue) -> bool {
    let s = score.to_string();
    s.len() >= GOLDEN_MIN_DIGITS && golden_digits(value).starts_with(&s)
}

/// Achievement id unlocked by finding a value's golden number.
pub fn golden_achievement(value: ButtonValue) -> String {
    format!("golden_{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(n: u8) -> ButtonValue {
        ButtonValue::new(n).unwrap()
    }

    #[test]
    fn button_value_bounds() {
        assert!(ButtonValue::new(0).is_none());
        assert!(ButtonValue::new(10).is_none());
        assert_eq!(ButtonValue::try_from(0u8), Err(InvalidButtonValue(0)));
        assert_eq!(v(5).get(), 5);
    }

    #[test]
    fn button_value_cycles_through_nine() {
        let mut value = ButtonValue::MIN;
        let mut seen = Vec::new();
        for _ in 0..10 {
            seen.push(value.get());
            value = value.cycled();
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 1]);
        assert_eq!(ButtonValue::MAX.cycled(), ButtonValue::MIN);
    }

    #[test]
    fn registry_rows_match_their_index() {
        for kind in OperatorKind::ALL {
            assert_eq!(kind.def().kind, kind);
            assert_eq!(OperatorKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn unknown_name_falls_back_to_default() {
        assert_eq!(OperatorKind::from_name("Teleport"), None);
        assert_eq!(OperatorKind::from("Teleport".to_string()), OperatorKind::Boost);
    }

    #[test]
    fn primer_scenario() {
        assert_eq!(OperatorKind::Primer.transform(13, v(3)), 17);
        assert!(OperatorKind::Primer.condition(13, v(3)));
        assert!(OperatorKind::Primer.condition(17, v(3)));
        // 24..=28 holds no prime.
        assert!(!OperatorKind::Primer.condition(26, v(2)));
    }

    #[test]
    fn primer_at_the_top_of_the_range() {
        assert_eq!(OperatorKind::Primer.transform(i64::MAX, v(1)), i64::MAX);
        assert_eq!(
            OperatorKind::Primer.transform(i64::MAX - 30, v(1)),
            9_223_372_036_854_775_783
        );
        assert!(OperatorKind::Primer.condition(i64::MAX - 20, v(5)));
        assert!(!OperatorKind::Primer.condition(i64::MAX, v(9)));
    }

    #[test]
    fn split_scenario() {
        assert_eq!(OperatorKind::Split.transform(42, v(2)), 21);
        assert!(!OperatorKind::Split.condition(21, v(2)));
        assert!(OperatorKind::Split.condition(21, v(3)));
        assert_eq!(OperatorKind::Split.transform(10, v(3)), 4);
        assert_eq!(OperatorKind::Split.transform(-7, v(2)), -3);
    }

    #[test]
    fn boost_adds_and_checks_square() {
        assert_eq!(OperatorKind::Boost.transform(3, v(1)), 4);
        assert!(OperatorKind::Boost.condition(4, v(9)));
        assert!(!OperatorKind::Boost.condition(5, v(9)));
    }

    #[test]
    fn digit_scenario() {
        assert!(OperatorKind::Digit.condition(9, v(9)));
        assert_eq!(OperatorKind::Digit.transform(9, v(9)), 81);
        assert!(!OperatorKind::Digit.condition(81, v(1)));
    }

    #[test]
    fn reduce_divides_by_square() {
        assert_eq!(OperatorKind::Reduce.transform(50, v(3)), 6);
        assert_eq!(OperatorKind::Reduce.transform(36, v(3)), 4);
        assert!(OperatorKind::Reduce.condition(12, v(1)));
        assert!(OperatorKind::Reduce.condition(4, v(1)));
        assert!(!OperatorKind::Reduce.condition(30, v(1)));
        assert!(!OperatorKind::Reduce.condition(3, v(1)));
    }

    #[test]
    fn align_rounds_up_to_next_multiple() {
        assert_eq!(OperatorKind::Align.transform(10, v(4)), 12);
        // Already a multiple: jumps to the next one.
        assert_eq!(OperatorKind::Align.transform(12, v(4)), 16);
        assert!(OperatorKind::Align.condition(1221, v(4)));
        assert!(!OperatorKind::Align.condition(1231, v(4)));
    }

    #[test]
    fn fiber_and_factor() {
        assert_eq!(OperatorKind::Fiber.transform(22, v(1)), 34);
        assert!(OperatorKind::Fiber.condition(34, v(1)));
        assert_eq!(OperatorKind::Factor.transform(4, v(4)), 28);
        assert!(OperatorKind::Factor.condition(120, v(1)));
        assert!(!OperatorKind::Factor.condition(28, v(1)));
    }

    #[test]
    fn cipher_shifts_digits() {
        assert_eq!(OperatorKind::Cipher.transform(129, v(1)), 230);
        assert_eq!(OperatorKind::Cipher.transform(95, v(1)), 6);
        assert!(OperatorKind::Cipher.condition(230, v(1)));
        assert!(!OperatorKind::Cipher.condition(2300, v(1)));
    }

    #[test]
    fn golden_prefix_needs_four_digits() {
        assert!(is_golden(3141, v(3)));
        assert!(is_golden(314159, v(3)));
        assert!(!is_golden(314, v(3)));
        assert!(!is_golden(3142, v(3)));
        assert!(!is_golden(3141, v(4)));
        assert!(is_golden(1618, v(1)));
        assert_eq!(golden_achievement(v(3)), "golden_3");
    }

    #[test]
    fn operator_kind_serializes_by_name() {
        let json = serde_json::to_string(&OperatorKind::Cipher).unwrap();
        assert_eq!(json, "\"Cipher\"");
        let kind: OperatorKind = serde_json::from_str("\"Fiber\"").unwrap();
        assert_eq!(kind, OperatorKind::Fiber);
    }
}
