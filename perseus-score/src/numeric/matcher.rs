//! Matching typed number answers against a correct value.
//!
//! A guess is read in every accepted [`AnswerForm`], in a fixed order, and
//! the first reading that lands within tolerance of the correct value
//! decides the outcome. Readings that are right but badly written (an
//! unsimplified fraction, a percent without `%`) are reported with a hint
//! instead of being marked wrong.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::math::{approx_equal, DEFAULT_TOLERANCE};
use crate::types::Score;

pub const MISSING_PERCENT_ERROR: &str =
    "Your answer is almost correct, but it is missing a % at the end.";
pub const NEEDS_SIMPLIFYING_ERROR: &str =
    "Your answer is almost correct, but it needs to be simplified.";
pub const APPROXIMATED_PI_ERROR: &str = "Your answer is close, but you may have approximated pi. \
     Enter your answer as a multiple of pi, like 12 pi or 2/3 pi";
pub const EXTRA_SYMBOLS_ERROR: &str =
    "We could not understand your answer. Please check your answer for extra text or symbols.";

/// Relative error under which a decimal is treated as a rounded multiple of pi.
const PI_APPROXIMATION_ERROR: f64 = 0.001;

/// A way of writing a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerForm {
    /// `12`, `-3`, `1,000`
    Integer,
    /// `3/4`, with numerator smaller than denominator
    Proper,
    /// `7/4`, with numerator at least the denominator
    Improper,
    /// `2pi`, `3/4 pi`, `tau`
    Pi,
    /// `1 3/4`
    Mixed,
    /// `0.75`
    Decimal,
    /// `75%`
    Percent,
}

impl AnswerForm {
    /// Every form, in the order guesses are read.
    pub const ALL: [AnswerForm; 7] = [
        AnswerForm::Integer,
        AnswerForm::Proper,
        AnswerForm::Improper,
        AnswerForm::Pi,
        AnswerForm::Mixed,
        AnswerForm::Decimal,
        AnswerForm::Percent,
    ];

    /// Forms accepted when nothing narrower is configured.
    pub const DEFAULTS: [AnswerForm; 5] = [
        AnswerForm::Integer,
        AnswerForm::Decimal,
        AnswerForm::Proper,
        AnswerForm::Improper,
        AnswerForm::Mixed,
    ];

    /// Every reading of `text` in this form.
    fn readings(self, text: &str, decimal_separator: char) -> Vec<Reading> {
        match self {
            Self::Integer => parse_integer(text, decimal_separator)
                .map(Reading::exact)
                .into_iter()
                .collect(),
            Self::Proper => parse_fraction(text)
                .filter(|fraction| fraction.numerator < fraction.denominator)
                .map(|fraction| fraction.reading())
                .into_iter()
                .collect(),
            Self::Improper => parse_fraction(text)
                .filter(|fraction| fraction.numerator >= fraction.denominator)
                .map(|fraction| fraction.reading())
                .into_iter()
                .collect(),
            Self::Pi => parse_pi(text, decimal_separator).into_iter().collect(),
            Self::Mixed => parse_mixed(text).into_iter().collect(),
            Self::Decimal => parse_decimal(text, decimal_separator)
                .map(Reading::exact)
                .into_iter()
                .collect(),
            Self::Percent => {
                let (body, has_sign) = match text.strip_suffix('%') {
                    Some(body) => (body.trim_end(), true),
                    None => (text, false),
                };
                parse_decimal(body, decimal_separator)
                    .map(|value| Reading {
                        value,
                        exact: has_sign,
                    })
                    .into_iter()
                    .collect()
            }
        }
    }
}

/// How strictly unsimplified fractions are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Simplify {
    /// Unsimplified answers are reported as needing simplification, ungraded
    #[default]
    Required,
    /// Unsimplified answers are accepted
    Optional,
    /// Unsimplified answers are graded wrong
    Enforced,
}

/// Outcome of checking one guess.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberCheck {
    /// The guess could not be graded
    pub empty: bool,
    /// The guess matches the correct value
    pub correct: bool,
    /// Feedback for the learner
    pub message: Option<String>,
}

impl NumberCheck {
    fn empty(message: Option<&str>) -> Self {
        Self {
            empty: true,
            correct: false,
            message: message.map(str::to_string),
        }
    }

    /// Convert to a single-point score; empty checks are invalid.
    pub fn into_score(self) -> Score {
        if self.empty {
            Score::Invalid {
                message: self.message,
            }
        } else {
            Score::from_correct(self.correct).with_message(self.message)
        }
    }
}

/// One numeric interpretation of a guess.
#[derive(Debug, Clone, Copy)]
struct Reading {
    value: f64,
    /// Written in its simplest form for the reading's answer form
    exact: bool,
}

impl Reading {
    fn exact(value: f64) -> Self {
        Self { value, exact: true }
    }
}

/// Checks typed guesses against one correct value.
///
/// # Example
///
/// ```
/// use perseus_score::numeric::{AnswerForm, NumberMatcher};
///
/// let matcher = NumberMatcher::new(0.75)
///     .with_forms(&[AnswerForm::Proper, AnswerForm::Decimal]);
///
/// assert!(matcher.check("3/4").correct);
/// assert!(matcher.check("0.75").correct);
/// assert!(matcher.check("6/8").empty);
/// ```
#[derive(Debug, Clone)]
pub struct NumberMatcher {
    value: f64,
    forms: Vec<AnswerForm>,
    simplify: Simplify,
    tolerance: f64,
    decimal_separator: char,
    message: Option<String>,
}

impl NumberMatcher {
    /// Matcher for `value` with the default forms, required simplification
    /// and the default tolerance.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            forms: AnswerForm::DEFAULTS.to_vec(),
            simplify: Simplify::default(),
            tolerance: DEFAULT_TOLERANCE,
            decimal_separator: '.',
            message: None,
        }
    }

    /// Restrict accepted forms. An empty list keeps the defaults.
    pub fn with_forms(mut self, forms: &[AnswerForm]) -> Self {
        if !forms.is_empty() {
            self.forms = forms.to_vec();
        }
        self
    }

    pub fn with_simplify(mut self, simplify: Simplify) -> Self {
        self.simplify = simplify;
        self
    }

    /// Accept guesses within `max_error`, never tighter than the default tolerance.
    pub fn inexact(mut self, max_error: Option<f64>) -> Self {
        self.tolerance = max_error.unwrap_or(0.0).abs().max(DEFAULT_TOLERANCE);
        self
    }

    pub fn with_decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    /// Message reported alongside a correct match.
    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message.filter(|m| !m.is_empty());
        self
    }

    fn accepts(&self, form: AnswerForm) -> bool {
        self.forms.contains(&form)
    }

    fn accepted_forms(&self) -> impl Iterator<Item = AnswerForm> + '_ {
        AnswerForm::ALL.into_iter().filter(|form| self.accepts(*form))
    }

    /// Check a guess. TeX should already have been converted to plain text.
    pub fn check(&self, guess: &str) -> NumberCheck {
        let text = normalize_guess(guess);
        if text.is_empty() || text == "-" || text == "+" {
            return NumberCheck::empty(None);
        }

        for form in self.accepted_forms() {
            for reading in form.readings(&text, self.decimal_separator) {
                if !approx_equal(reading.value, self.value, self.tolerance) {
                    continue;
                }
                if reading.exact || self.simplify == Simplify::Optional {
                    return NumberCheck {
                        empty: false,
                        correct: true,
                        message: self.message.clone(),
                    };
                }
                if form == AnswerForm::Percent {
                    return NumberCheck::empty(Some(MISSING_PERCENT_ERROR));
                }
                return NumberCheck {
                    empty: self.simplify != Simplify::Enforced,
                    correct: false,
                    message: Some(NEEDS_SIMPLIFYING_ERROR.to_string()),
                };
            }
        }

        if self.accepts(AnswerForm::Pi) && self.looks_like_approximated_pi(&text) {
            return NumberCheck::empty(Some(APPROXIMATED_PI_ERROR));
        }

        let understood = self
            .accepted_forms()
            .any(|form| !form.readings(&text, self.decimal_separator).is_empty());
        if !understood {
            return NumberCheck::empty(Some(EXTRA_SYMBOLS_ERROR));
        }

        NumberCheck::default()
    }

    /// A plain decimal or fraction within a rounding error of a pi multiple answer.
    fn looks_like_approximated_pi(&self, text: &str) -> bool {
        let value = parse_decimal(text, self.decimal_separator)
            .or_else(|| parse_fraction(text).map(|fraction| fraction.value()));
        match value {
            Some(value) if value != 0.0 => {
                approx_equal(value, self.value, (value * PI_APPROXIMATION_ERROR).abs())
            }
            _ => false,
        }
    }
}

/// Trim, unify minus signs, and drop grouping parentheses.
fn normalize_guess(guess: &str) -> String {
    guess
        .trim()
        .chars()
        .filter(|c| *c != '(' && *c != ')')
        .map(|c| if c == '\u{2212}' { '-' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

fn split_sign(text: &str) -> (f64, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (-1.0, rest.trim_start())
    } else if let Some(rest) = text.strip_prefix('+') {
        (1.0, rest.trim_start())
    } else {
        (1.0, text)
    }
}

/// Remove thousands grouping (`1,000,000`) from an integer part.
fn ungroup(digits: &str, thousands_separator: char) -> Option<String> {
    if digits.chars().all(|c| c.is_ascii_digit()) {
        return Some(digits.to_string());
    }
    let groups: Vec<&str> = digits.split(thousands_separator).collect();
    let well_formed = groups.iter().all(|g| g.chars().all(|c| c.is_ascii_digit()))
        && (1..=3).contains(&groups[0].len())
        && groups[1..].iter().all(|g| g.len() == 3);
    well_formed.then(|| groups.concat())
}

fn thousands_separator(decimal_separator: char) -> char {
    if decimal_separator == ',' {
        '.'
    } else {
        ','
    }
}

fn parse_integer(text: &str, decimal_separator: char) -> Option<f64> {
    let (sign, body) = split_sign(text);
    if body.is_empty() {
        return None;
    }
    let digits = ungroup(body, thousands_separator(decimal_separator))?;
    digits.parse::<f64>().ok().map(|value| sign * value)
}

fn parse_decimal(text: &str, decimal_separator: char) -> Option<f64> {
    let (sign, body) = split_sign(text);
    let (whole, fraction) = match body.split_once(decimal_separator) {
        Some((whole, fraction)) => (whole, fraction),
        None => (body, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let whole = ungroup(whole, thousands_separator(decimal_separator))?;
    let literal = format!(
        "{}.{}",
        if whole.is_empty() { "0" } else { &whole },
        if fraction.is_empty() { "0" } else { fraction }
    );
    literal.parse::<f64>().ok().map(|value| sign * value)
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

#[derive(Debug, Clone, Copy)]
struct Fraction {
    sign: f64,
    numerator: u64,
    denominator: u64,
}

impl Fraction {
    fn from_captures(captures: &Captures<'_>, sign: usize, num: usize, den: usize) -> Option<Self> {
        let sign = if captures.get(sign).map(|m| m.as_str()) == Some("-") {
            -1.0
        } else {
            1.0
        };
        let numerator = captures.get(num)?.as_str().parse().ok()?;
        let denominator: u64 = captures.get(den)?.as_str().parse().ok()?;
        (denominator != 0).then_some(Self {
            sign,
            numerator,
            denominator,
        })
    }

    fn value(&self) -> f64 {
        self.sign * self.numerator as f64 / self.denominator as f64
    }

    fn is_simplified(&self) -> bool {
        gcd(self.numerator, self.denominator) == 1 && self.denominator != 1
    }

    fn reading(&self) -> Reading {
        Reading {
            value: self.value(),
            exact: self.is_simplified(),
        }
    }
}

fn fraction_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([+-]?)\s*(\d+)\s*/\s*(\d+)$").ok())
        .as_ref()
}

fn mixed_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([+-]?)\s*(\d+)\s+(\d+)\s*/\s*(\d+)$").ok())
        .as_ref()
}

fn pi_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^([+-]?)\s*(?:(\d+)\s*/\s*(\d+)|(\d+(?:[.,]\d+)?))?\s*\*?\s*(pi|π|tau|τ)\s*(?:/\s*(\d+))?$",
        )
        .ok()
    })
    .as_ref()
}

fn parse_fraction(text: &str) -> Option<Fraction> {
    let captures = fraction_regex()?.captures(text)?;
    Fraction::from_captures(&captures, 1, 2, 3)
}

fn parse_mixed(text: &str) -> Option<Reading> {
    let captures = mixed_regex()?.captures(text)?;
    let whole: u64 = captures.get(2)?.as_str().parse().ok()?;
    let fraction = Fraction::from_captures(&captures, 1, 3, 4)?;
    let value = fraction.sign * (whole as f64 + fraction.numerator as f64 / fraction.denominator as f64);
    Some(Reading {
        value,
        exact: fraction.numerator < fraction.denominator && fraction.is_simplified(),
    })
}

fn parse_pi(text: &str, decimal_separator: char) -> Option<Reading> {
    let captures = pi_regex()?.captures(text)?;
    let sign = if captures.get(1).map(|m| m.as_str()) == Some("-") {
        -1.0
    } else {
        1.0
    };
    let unit = match captures.get(5)?.as_str().to_lowercase().as_str() {
        "tau" | "τ" => std::f64::consts::TAU,
        _ => std::f64::consts::PI,
    };
    let divisor: Option<u64> = match captures.get(6) {
        Some(m) => Some(m.as_str().parse().ok()?),
        None => None,
    };
    if divisor == Some(0) {
        return None;
    }

    let (multiplier, exact) = if let (Some(num), Some(den)) = (captures.get(2), captures.get(3)) {
        let numerator: u64 = num.as_str().parse().ok()?;
        let denominator: u64 = den.as_str().parse().ok()?;
        if denominator == 0 {
            return None;
        }
        let denominator = denominator * divisor.unwrap_or(1);
        (
            numerator as f64 / denominator as f64,
            gcd(numerator, denominator) == 1 && denominator != 1,
        )
    } else if let Some(decimal) = captures.get(4) {
        let literal = if decimal_separator == ',' {
            decimal.as_str().replace(',', ".")
        } else {
            decimal.as_str().replace(',', "")
        };
        let multiplier: f64 = literal.parse().ok()?;
        match divisor {
            Some(divisor) => {
                let exact = literal
                    .parse::<u64>()
                    .map(|n| gcd(n, divisor) == 1 && divisor != 1)
                    .unwrap_or(true);
                (multiplier / divisor as f64, exact)
            }
            None => (multiplier, true),
        }
    } else {
        match divisor {
            Some(divisor) => (1.0 / divisor as f64, divisor != 1),
            None => (1.0, true),
        }
    };

    Some(Reading {
        value: sign * multiplier * unit,
        exact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_integer_and_decimal() {
        let matcher = NumberMatcher::new(1000.0);
        assert!(matcher.check("1000").correct);
        assert!(matcher.check("1,000").correct);
        assert!(matcher.check("1000.0").correct);
        assert!(!matcher.check("999").correct);
        assert!(!matcher.check("999").empty);
    }

    #[test]
    fn test_blank_guess_is_empty_without_message() {
        let check = NumberMatcher::new(3.0).check("   ");
        assert_eq!(check, NumberCheck::empty(None));
    }

    #[test]
    fn test_unparseable_guess() {
        let check = NumberMatcher::new(3.0).check("three");
        assert!(check.empty);
        assert_eq!(check.message.as_deref(), Some(EXTRA_SYMBOLS_ERROR));
    }

    #[test]
    fn test_simplification_rules() {
        let required = NumberMatcher::new(0.5);
        let check = required.check("2/4");
        assert!(check.empty);
        assert_eq!(check.message.as_deref(), Some(NEEDS_SIMPLIFYING_ERROR));

        let enforced = NumberMatcher::new(0.5).with_simplify(Simplify::Enforced);
        let check = enforced.check("2/4");
        assert!(!check.empty);
        assert!(!check.correct);
        assert_eq!(check.message.as_deref(), Some(NEEDS_SIMPLIFYING_ERROR));

        let optional = NumberMatcher::new(0.5).with_simplify(Simplify::Optional);
        assert!(optional.check("2/4").correct);
    }

    #[test]
    fn test_mixed_and_improper() {
        let matcher = NumberMatcher::new(1.5);
        assert!(matcher.check("3/2").correct);
        assert!(matcher.check("1 1/2").correct);
        assert!(matcher.check("-1 1/2").empty == false);

        let mixed_only = NumberMatcher::new(1.5).with_forms(&[AnswerForm::Mixed]);
        assert!(!mixed_only.check("3/2").correct);
    }

    #[test]
    fn test_percent_requires_sign() {
        let matcher = NumberMatcher::new(50.0).with_forms(&[AnswerForm::Percent]);
        assert!(matcher.check("50%").correct);

        let check = matcher.check("50");
        assert!(check.empty);
        assert_eq!(check.message.as_deref(), Some(MISSING_PERCENT_ERROR));
    }

    #[test]
    fn test_pi_forms() {
        let matcher = NumberMatcher::new(2.0 * PI / 3.0).with_forms(&[AnswerForm::Pi]);
        assert!(matcher.check("2/3 pi").correct);
        assert!(matcher.check("2pi/3").correct);
        assert!(matcher.check("2π/3").correct);

        let tau = NumberMatcher::new(2.0 * PI).with_forms(&[AnswerForm::Pi]);
        assert!(tau.check("tau").correct);
        assert!(tau.check("2 pi").correct);
    }

    #[test]
    fn test_approximated_pi() {
        let matcher = NumberMatcher::new(PI).with_forms(&[AnswerForm::Pi]);
        let check = matcher.check("3.14");
        assert!(check.empty);
        assert_eq!(check.message.as_deref(), Some(APPROXIMATED_PI_ERROR));

        let check = matcher.check("22/7");
        assert_eq!(check.message.as_deref(), Some(APPROXIMATED_PI_ERROR));
    }

    #[test]
    fn test_inexact_tolerance() {
        let matcher = NumberMatcher::new(3.0).inexact(Some(0.1));
        assert!(matcher.check("3.05").correct);
        assert!(!matcher.check("3.2").correct);

        let strict = NumberMatcher::new(3.0);
        assert!(!strict.check("3.05").correct);
    }

    #[test]
    fn test_decimal_comma_locale() {
        let matcher = NumberMatcher::new(1.5).with_decimal_separator(',');
        assert!(matcher.check("1,5").correct);

        let thousands = NumberMatcher::new(1500.0).with_decimal_separator(',');
        assert!(thousands.check("1.500").correct);
    }

    #[test]
    fn test_parentheses_and_unicode_minus() {
        let matcher = NumberMatcher::new(-3.0);
        assert!(matcher.check("(-3)").correct);
        assert!(matcher.check("\u{2212}3").correct);
    }

    #[test]
    fn test_correct_message_is_carried() {
        let matcher = NumberMatcher::new(4.0).with_message(Some("Nice".to_string()));
        assert_eq!(matcher.check("4").message.as_deref(), Some("Nice"));
    }

    #[test]
    fn test_into_score() {
        assert_eq!(
            NumberMatcher::new(2.0).check("2").into_score(),
            Score::correct()
        );
        assert!(NumberMatcher::new(2.0).check("").into_score().is_empty());
    }
}
