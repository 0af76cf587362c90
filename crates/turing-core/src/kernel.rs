//! Number theory kernel: the pure integer predicates and functions the
//! operators are built from.
//!
//! Everything here is stateless and total over `i64`. Intermediate values
//! that could overflow (`5n²`, factorial products) are widened or
//! saturated rather than wrapped.

use std::collections::HashSet;

/// Below this, trial division is cheaper than Miller-Rabin.
const TRIAL_DIVISION_LIMIT: i64 = 1 << 20;

/// Witnesses that make Miller-Rabin exact for every 64-bit input.
const MILLER_RABIN_WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Primality test. Anything `<= 1` is not prime.
pub fn is_prime(n: i64) -> bool {
    if n <= 1 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    if n >= TRIAL_DIVISION_LIMIT {
        return miller_rabin(n as u64);
    }
    let mut i = 3;
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

/// Deterministic Miller-Rabin for odd `n > 37`.
fn miller_rabin(n: u64) -> bool {
    let mut d = n - 1;
    let mut r = 0;
    while d % 2 == 0 {
        d /= 2;
        r += 1;
    }
    'witness: for a in MILLER_RABIN_WITNESSES {
        if a % n == 0 {
            continue;
        }
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..r {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    (u128::from(a) * u128::from(b) % u128::from(m)) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut acc = 1;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = mul_mod(acc, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    acc
}

/// The smallest prime strictly greater than `n`, or `None` when that prime
/// does not fit in `i64`.
pub fn next_prime(n: i64) -> Option<i64> {
    if n < 2 {
        return Some(2);
    }
    let mut candidate = n;
    loop {
        candidate = candidate.checked_add(1)?;
        if is_prime(candidate) {
            return Some(candidate);
        }
    }
}

/// Repeated decimal digit sum until a single digit remains.
pub fn digital_root(mut n: u64) -> u64 {
    while n > 9 {
        n = digit_sum(n);
    }
    n
}

fn digit_sum(mut n: u64) -> u64 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

/// `floor(sqrt(n))² == n`. Negative numbers are never squares.
pub fn is_perfect_square(n: i64) -> bool {
    if n < 0 {
        return false;
    }
    let n = n as u64;
    let root = n.isqrt();
    root * root == n
}

fn is_square_u128(n: u128) -> bool {
    let root = n.isqrt();
    root * root == n
}

/// Whether `n == base^k` for some integer `k >= 0`.
///
/// For `base <= 1` only `n == 1` qualifies. Otherwise the exponent is
/// estimated with logarithms, rounded, and confirmed with exact integer
/// exponentiation.
pub fn is_perfect_power(n: i64, base: i64) -> bool {
    if base <= 1 {
        return n == 1;
    }
    if n < 1 {
        return false;
    }
    let exponent = ((n as f64).ln() / (base as f64).ln()).round();
    if !(0.0..=63.0).contains(&exponent) {
        return false;
    }
    base.checked_pow(exponent as u32) == Some(n)
}

/// Whether the decimal representation of `n` reads the same reversed.
/// The sign counts as a character, so negatives are never palindromes.
pub fn is_palindrome(n: i64) -> bool {
    let s = n.to_string();
    s.bytes().eq(s.bytes().rev())
}

/// `n >= 0` and one of `5n² + 4`, `5n² - 4` is a perfect square.
pub fn is_fibonacci(n: i64) -> bool {
    if n < 0 {
        return false;
    }
    let wide = n as u128;
    match wide.checked_mul(wide).and_then(|sq| sq.checked_mul(5)) {
        Some(m) if m < u128::MAX - 4 => {
            is_square_u128(m + 4) || (m >= 4 && is_square_u128(m - 4))
        }
        // Only a few terms are this large; walk to them.
        _ => {
            let (mut a, mut b): (i64, i64) = (0, 1);
            while b < n {
                match a.checked_add(b) {
                    Some(next) => (a, b) = (b, next),
                    None => return false,
                }
            }
            b == n
        }
    }
}

/// The smallest Fibonacci term strictly greater than `n`.
pub fn next_fibonacci(n: i64) -> i64 {
    let (mut a, mut b): (i64, i64) = (0, 1);
    while b <= n {
        match a.checked_add(b) {
            Some(next) => (a, b) = (b, next),
            None => return i64::MAX,
        }
    }
    b
}

/// `n > 0` and `n == i!` for some `i >= 1`.
pub fn is_factorial(n: i64) -> bool {
    if n <= 0 {
        return false;
    }
    let mut product: i64 = 1;
    let mut i: i64 = 1;
    while product < n {
        i += 1;
        product = match product.checked_mul(i) {
            Some(p) => p,
            None => return false,
        };
    }
    product == n
}

/// Whether every character of the decimal representation is distinct.
pub fn has_unique_digits(n: i64) -> bool {
    let mut seen = HashSet::new();
    n.to_string().chars().all(|c| seen.insert(c))
}

/// Whether some square `i²` with `i >= 2` divides `n`.
///
/// Trial division only runs to the cube root: once every prime up to it is
/// divided out, what remains has at most two prime factors, so it carries
/// a square factor only if it is itself a square.
pub fn has_square_factor(n: i64) -> bool {
    if n < 4 {
        return false;
    }
    let mut rest = n as u64;
    let mut p: u64 = 2;
    while p * p * p <= rest {
        if rest % p == 0 {
            rest /= p;
            if rest % p == 0 {
                return true;
            }
        }
        p += 1;
    }
    rest > 1 && rest.isqrt() * rest.isqrt() == rest
}

/// `n!`, saturating at `i64::MAX`. Negative input yields 0.
pub fn factorial(n: i64) -> i64 {
    if n < 0 {
        return 0;
    }
    (1..=n).fold(1i64, |acc, i| acc.saturating_mul(i))
}

/// Shift every decimal digit of `n` by `by` modulo 10, keeping the sign.
/// A leading digit that becomes zero simply drops out of the result.
pub fn shift_digits(n: i64, by: u8) -> i64 {
    let magnitude = n.unsigned_abs();
    let shifted = magnitude
        .to_string()
        .bytes()
        .fold(0u128, |acc, b| {
            let digit = (u128::from(b - b'0') + u128::from(by)) % 10;
            acc * 10 + digit
        });
    let clamped = i64::try_from(shifted).unwrap_or(i64::MAX);
    if n < 0 { -clamped } else { clamped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primes_below_two_are_rejected() {
        for n in [-7, -1, 0, 1] {
            assert!(!is_prime(n), "{n} should not be prime");
        }
    }

    #[test]
    fn small_primes_recognised() {
        let primes: Vec<i64> = (0..50).filter(|&n| is_prime(n)).collect();
        assert_eq!(
            primes,
            vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47]
        );
    }

    #[test]
    fn large_prime_and_square_of_prime() {
        assert!(is_prime(1_000_000_007));
        assert!(!is_prime(1_000_000_007 * 3));
        assert!(!is_prime(49));
    }

    #[test]
    fn large_primality_matches_trial_division() {
        let trial = |n: i64| n > 1 && (2i64..).take_while(|i| i * i <= n).all(|i| n % i != 0);
        for n in TRIAL_DIVISION_LIMIT - 500..TRIAL_DIVISION_LIMIT + 3000 {
            assert_eq!(is_prime(n), trial(n), "{n}");
        }
        // Strong pseudoprime to bases 2, 3, 5 and 7.
        assert!(!is_prime(3_215_031_751));
        assert!(is_prime(2_305_843_009_213_693_951));
        assert!(!is_prime(1_000_000_007 * 1_000_000_009));
    }

    #[test]
    fn next_prime_near_the_top_of_the_range() {
        const LARGEST: i64 = 9_223_372_036_854_775_783;
        assert!(is_prime(LARGEST));
        assert_eq!(next_prime(1 << 62), Some(4_611_686_018_427_388_039));
        assert_eq!(next_prime(LARGEST - 1), Some(LARGEST));
        assert_eq!(next_prime(LARGEST), None);
        assert_eq!(next_prime(i64::MAX), None);
    }

    #[test]
    fn next_prime_is_strictly_greater() {
        assert_eq!(next_prime(13), Some(17));
        assert_eq!(next_prime(2), Some(3));
        assert_eq!(next_prime(1), Some(2));
        assert_eq!(next_prime(-40), Some(2));
        assert_eq!(next_prime(89), Some(97));
    }

    #[test]
    fn digital_root_collapses_to_single_digit() {
        assert_eq!(digital_root(0), 0);
        assert_eq!(digital_root(9), 9);
        assert_eq!(digital_root(81), 9);
        assert_eq!(digital_root(493_193), 2);
    }

    #[test]
    fn perfect_squares() {
        assert!(is_perfect_square(0));
        assert!(is_perfect_square(1));
        assert!(is_perfect_square(144));
        assert!(!is_perfect_square(145));
        assert!(!is_perfect_square(-4));
    }

    #[test]
    fn perfect_powers() {
        assert!(is_perfect_power(1, 1));
        assert!(!is_perfect_power(5, 1));
        assert!(is_perfect_power(1, 0));
        assert!(is_perfect_power(81, 3));
        assert!(is_perfect_power(1, 7));
        assert!(is_perfect_power(1 << 40, 2));
        assert!(!is_perfect_power(80, 3));
        assert!(!is_perfect_power(0, 3));
    }

    #[test]
    fn palindromes() {
        assert!(is_palindrome(0));
        assert!(is_palindrome(121));
        assert!(is_palindrome(4884));
        assert!(!is_palindrome(123));
        assert!(!is_palindrome(-121));
    }

    #[test]
    fn fibonacci_membership() {
        let fibs = [0, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144];
        for f in fibs {
            assert!(is_fibonacci(f), "{f} is fibonacci");
        }
        for n in [4, 6, 7, 9, 10, 100, -1] {
            assert!(!is_fibonacci(n), "{n} is not fibonacci");
        }
        assert!(is_fibonacci(7_540_113_804_746_346_429));
    }

    #[test]
    fn next_fibonacci_skips_equal_terms() {
        assert_eq!(next_fibonacci(0), 1);
        assert_eq!(next_fibonacci(1), 2);
        assert_eq!(next_fibonacci(13), 21);
        assert_eq!(next_fibonacci(14), 21);
        assert_eq!(next_fibonacci(-5), 1);
        assert_eq!(next_fibonacci(i64::MAX), i64::MAX);
    }

    #[test]
    fn factorial_membership() {
        for n in [1, 2, 6, 24, 120, 720, 5040, 40320, 362880] {
            assert!(is_factorial(n), "{n} is a factorial");
        }
        for n in [0, -6, 3, 25, 719] {
            assert!(!is_factorial(n), "{n} is not a factorial");
        }
    }

    #[test]
    fn unique_digits() {
        assert!(has_unique_digits(1234567890));
        assert!(!has_unique_digits(1231));
        assert!(has_unique_digits(7));
        assert!(has_unique_digits(-12));
        assert!(!has_unique_digits(-11));
    }

    #[test]
    fn factorial_values() {
        assert_eq!(factorial(-1), 0);
        assert_eq!(factorial(0), 1);
        assert_eq!(factorial(5), 120);
        assert_eq!(factorial(9), 362_880);
        assert_eq!(factorial(40), i64::MAX);
    }

    #[test]
    fn shift_digits_wraps_each_digit() {
        assert_eq!(shift_digits(129, 1), 230);
        assert_eq!(shift_digits(90, 1), 1);
        assert_eq!(shift_digits(0, 9), 9);
        assert_eq!(shift_digits(-18, 2), -30);
    }

    #[test]
    fn square_factors() {
        let naive = |n: i64| (2..=n).take_while(|i| i * i <= n).any(|i| n % (i * i) == 0);
        for n in -10..2000 {
            assert_eq!(has_square_factor(n), naive(n), "n = {n}");
        }
        // 2^61 - 1 is prime; times 3 is square-free.
        assert!(!has_square_factor(3 * 2_305_843_009_213_693_951));
        assert!(has_square_factor(1_000_000_007 * 9));
    }

    #[test]
    fn huge_fibonacci_membership() {
        assert!(is_fibonacci(7_540_113_804_746_346_429));
        assert!(!is_fibonacci(7_540_113_804_746_346_430));
        assert!(!is_fibonacci(i64::MAX));
    }
}
