//! Token classification.
//!
//! Every raw token falls into exactly one [`ArgumentCategory`], decided by the
//! first matching rule of an ordered rule table. Classification only looks at
//! the literal text of the token, never at parse state.

use std::fmt::{Display, Formatter};

use once_cell::sync::Lazy;
use regex::RegexSet;
use serde::Serialize;

/// Leading sign of an option-like token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sign {
    Minus,
    Plus,
}

impl Sign {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.chars().next()? {
            '-' => Some(Sign::Minus),
            '+' => Some(Sign::Plus),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Sign::Minus => '-',
            Sign::Plus => '+',
        }
    }
}

/// Grammar category of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArgumentCategory {
    /// Exactly `--`: everything after it is a parameter.
    Separator,
    /// `-12` or `+3`; the digits follow the sign.
    Numeric(Sign),
    /// `-a` or `+a`.
    SingleLetter(Sign),
    /// `--long`, or a `-abc` block that may be unpacked later.
    LongOption,
    /// `-name=value`, `--name=value`, `+name=value`.
    OptionWithValue,
    /// `-n5`: either an option glued to its value or a literal option.
    PotentialLetterAndValue,
    /// Anything else.
    ParamOrCommand,
}

impl Display for ArgumentCategory {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ArgumentCategory::Separator => "separator",
            ArgumentCategory::Numeric(Sign::Minus) => "minus numeric",
            ArgumentCategory::Numeric(Sign::Plus) => "plus numeric",
            ArgumentCategory::SingleLetter(Sign::Minus) => "minus letter",
            ArgumentCategory::SingleLetter(Sign::Plus) => "plus letter",
            ArgumentCategory::LongOption => "long option",
            ArgumentCategory::OptionWithValue => "option and value",
            ArgumentCategory::PotentialLetterAndValue => "potential letter and value",
            ArgumentCategory::ParamOrCommand => "param or command",
        };
        formatter.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
enum Rule {
    Separator,
    Numeric,
    SingleLetter,
    DoubleDashLong,
    OptionWithValue,
    LetterBlock,
    PotentialLetterAndValue,
    Anything,
}

// Order matters: the first matching rule wins.
const RULES: [(Rule, &str); 8] = [
    (Rule::Separator, r"^--$"),
    (Rule::Numeric, r"^[-+][0-9]+$"),
    (Rule::SingleLetter, r"^[-+][A-Za-z]$"),
    (Rule::DoubleDashLong, r"^--[A-Za-z][A-Za-z-]*$"),
    (Rule::OptionWithValue, r"(?s)^(?:-|--|\+)[A-Za-z][A-Za-z-]*=.*$"),
    (Rule::LetterBlock, r"^[-+][A-Za-z][A-Za-z-]+$"),
    (Rule::PotentialLetterAndValue, r"(?s)^[-+][A-Za-z].*$"),
    (Rule::Anything, r"(?s)^.*$"),
];

static RULE_SET: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new(RULES.iter().map(|(_, pattern)| *pattern)).expect("classifier rules must compile")
});

/// Classify a single token.
///
/// # Examples
///
/// ```
/// use quickparse_core::classifier::{classify, ArgumentCategory, Sign};
///
/// assert_eq!(classify("--"), ArgumentCategory::Separator);
/// assert_eq!(classify("-12"), ArgumentCategory::Numeric(Sign::Minus));
/// assert_eq!(classify("-a=1"), ArgumentCategory::OptionWithValue);
/// assert_eq!(classify("commit"), ArgumentCategory::ParamOrCommand);
/// ```
pub fn classify(token: &str) -> ArgumentCategory {
    let Some(index) = RULE_SET.matches(token).into_iter().next() else {
        return ArgumentCategory::ParamOrCommand;
    };

    // Every rule but the first and the last requires a leading sign.
    let sign = Sign::from_token(token).unwrap_or(Sign::Minus);

    match RULES[index].0 {
        Rule::Separator => ArgumentCategory::Separator,
        Rule::Numeric => ArgumentCategory::Numeric(sign),
        Rule::SingleLetter => ArgumentCategory::SingleLetter(sign),
        Rule::DoubleDashLong | Rule::LetterBlock => ArgumentCategory::LongOption,
        Rule::OptionWithValue => ArgumentCategory::OptionWithValue,
        Rule::PotentialLetterAndValue => ArgumentCategory::PotentialLetterAndValue,
        Rule::Anything => ArgumentCategory::ParamOrCommand,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_separator() {
        assert_eq!(classify("--"), ArgumentCategory::Separator);
        assert_eq!(classify("---"), ArgumentCategory::ParamOrCommand);
    }

    #[test]
    fn test_classify_numeric_keeps_sign() {
        assert_eq!(classify("-11"), ArgumentCategory::Numeric(Sign::Minus));
        assert_eq!(classify("+7"), ArgumentCategory::Numeric(Sign::Plus));
        assert_eq!(classify("-1a"), ArgumentCategory::ParamOrCommand);
        assert_eq!(classify("12"), ArgumentCategory::ParamOrCommand);
    }

    #[test]
    fn test_classify_single_letter() {
        assert_eq!(classify("-a"), ArgumentCategory::SingleLetter(Sign::Minus));
        assert_eq!(classify("+Z"), ArgumentCategory::SingleLetter(Sign::Plus));
        assert_eq!(classify("-_"), ArgumentCategory::ParamOrCommand);
    }

    #[test]
    fn test_classify_long_options() {
        assert_eq!(classify("--all"), ArgumentCategory::LongOption);
        assert_eq!(classify("--dry-run"), ArgumentCategory::LongOption);
        assert_eq!(classify("-abc"), ArgumentCategory::LongOption);
        assert_eq!(classify("-abc-d"), ArgumentCategory::LongOption);
        assert_eq!(classify("+ab"), ArgumentCategory::LongOption);
    }

    #[test]
    fn test_classify_option_with_value_wins_over_letter_and_value() {
        assert_eq!(classify("-a=1"), ArgumentCategory::OptionWithValue);
        assert_eq!(classify("--name=Steve"), ArgumentCategory::OptionWithValue);
        assert_eq!(classify("+level=a=b"), ArgumentCategory::OptionWithValue);
        assert_eq!(classify("--name="), ArgumentCategory::OptionWithValue);
    }

    #[test]
    fn test_classify_potential_letter_and_value() {
        assert_eq!(classify("-n5"), ArgumentCategory::PotentialLetterAndValue);
        assert_eq!(classify("-a.b"), ArgumentCategory::PotentialLetterAndValue);
        assert_eq!(classify("+x_1"), ArgumentCategory::PotentialLetterAndValue);
    }

    #[test]
    fn test_classify_everything_else() {
        assert_eq!(classify(""), ArgumentCategory::ParamOrCommand);
        assert_eq!(classify("-"), ArgumentCategory::ParamOrCommand);
        assert_eq!(classify("--5"), ArgumentCategory::ParamOrCommand);
        assert_eq!(classify("file.txt"), ArgumentCategory::ParamOrCommand);
        assert_eq!(classify("multi\nline"), ArgumentCategory::ParamOrCommand);
    }

    #[test]
    fn test_classify_letters_are_ascii_only() {
        assert_eq!(classify("-é"), ArgumentCategory::ParamOrCommand);
        assert_eq!(classify("--über"), ArgumentCategory::ParamOrCommand);
        assert_eq!(classify("-aé"), ArgumentCategory::PotentialLetterAndValue);
    }

    #[test]
    fn test_classify_is_idempotent() {
        for token in ["-a", "--all", "-abc", "x", "-n5", "-1", "--"] {
            assert_eq!(classify(token), classify(token));
        }
    }

    #[test]
    fn test_category_display() {
        assert_eq!(
            ArgumentCategory::Numeric(Sign::Plus).to_string(),
            "plus numeric"
        );
        assert_eq!(ArgumentCategory::ParamOrCommand.to_string(), "param or command");
    }
}
