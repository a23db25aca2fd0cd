//! Answer types for the input-number widget.

use serde::{Deserialize, Serialize};

use super::matcher::AnswerForm;

/// Which kinds of number an input-number widget accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputNumberAnswerType {
    #[default]
    Number,
    Decimal,
    Integer,
    Rational,
    Improper,
    Mixed,
    Percent,
    Pi,
}

impl InputNumberAnswerType {
    pub const ALL: [InputNumberAnswerType; 8] = [
        Self::Number,
        Self::Decimal,
        Self::Integer,
        Self::Rational,
        Self::Improper,
        Self::Mixed,
        Self::Percent,
        Self::Pi,
    ];

    /// Human-readable label shown to content authors.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Number => "Numbers",
            Self::Decimal => "Decimals",
            Self::Integer => "Integers",
            Self::Rational => "Fractions and mixed numbers",
            Self::Improper => "Improper numbers (no mixed)",
            Self::Mixed => "Mixed numbers (no improper)",
            Self::Percent => "Numbers or percents",
            Self::Pi => "Numbers with pi",
        }
    }

    /// Answer forms a guess may be written in.
    pub fn forms(self) -> &'static [AnswerForm] {
        use AnswerForm::*;
        match self {
            Self::Number => &[Integer, Decimal, Proper, Improper, Mixed],
            Self::Decimal => &[Decimal],
            Self::Integer => &[Integer],
            Self::Rational => &[Integer, Proper, Improper, Mixed],
            Self::Improper => &[Integer, Proper, Improper],
            Self::Mixed => &[Integer, Proper, Mixed],
            Self::Percent => &[Integer, Decimal, Proper, Improper, Mixed, Percent],
            Self::Pi => &[Pi],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_accepts_some_form() {
        for answer_type in InputNumberAnswerType::ALL {
            assert!(!answer_type.forms().is_empty(), "{answer_type:?}");
        }
    }

    #[test]
    fn test_percent_extends_number() {
        let number = InputNumberAnswerType::Number.forms();
        let percent = InputNumberAnswerType::Percent.forms();
        assert!(number.iter().all(|form| percent.contains(form)));
        assert!(percent.contains(&AnswerForm::Percent));
    }

    #[test]
    fn test_serde_names() {
        let parsed: InputNumberAnswerType = serde_json::from_str("\"rational\"").unwrap();
        assert_eq!(parsed, InputNumberAnswerType::Rational);
    }
}
