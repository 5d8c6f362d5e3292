//! Business rule checks run after parsing.
//!
//! Rules can be built in code or read from YAML:
//!
//! ```
//! use quickparse_core::validation::ValidationRules;
//!
//! let rules = ValidationRules::from_yaml(
//!     "parameters: {min: 1, max: 2}\noptions: {mandatory: [--name], forbidden: [-f]}",
//! )?;
//! assert_eq!(rules.parameters.unwrap().max, Some(2));
//! # Ok::<(), quickparse_core::Error>(())
//! ```

use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::engine::ParseResult;
use crate::error::{ParseError, Result};

/// Inclusive bounds on a number of occurrences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CountBounds {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl CountBounds {
    pub fn exactly(count: usize) -> Self {
        Self::between(count, count)
    }

    pub fn between(min: usize, max: usize) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: usize) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: usize) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn contains(&self, count: usize) -> bool {
        self.min.map_or(true, |min| count >= min) && self.max.map_or(true, |max| count <= max)
    }
}

impl Display for CountBounds {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min == max => write!(formatter, "exactly {min}"),
            (Some(min), Some(max)) => write!(formatter, "between {min} and {max}"),
            (Some(min), None) => write!(formatter, "at least {min}"),
            (None, Some(max)) => write!(formatter, "at most {max}"),
            (None, None) => formatter.write_str("any number"),
        }
    }
}

/// Which options must, may or must not be present.
///
/// Naming one spelling of an equivalency group covers the whole group. When
/// `mandatory` or `optional` is non-empty, any other option is unexpected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionRules {
    pub mandatory: Vec<String>,
    pub optional: Vec<String>,
    pub forbidden: Vec<String>,
}

/// Declarative rules for [`ParseResult::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationRules {
    pub parameters: Option<CountBounds>,
    pub options: Option<OptionRules>,
    pub numeric: Option<CountBounds>,
    pub plusnumeric: Option<CountBounds>,
}

impl ValidationRules {
    /// Read rules from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Rules`] if the document is malformed or has
    /// unknown keys.
    pub fn from_yaml(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Collect every rule violation of `parsed`, keyed by error target.
    pub fn check<T, A>(&self, parsed: &ParseResult<T, A>) -> Vec<(String, ParseError)> {
        let mut findings = Vec::new();

        if let Some(bounds) = self.parameters {
            let found = parsed.parameters().len();
            if !bounds.contains(found) {
                findings.push((
                    "parameters".to_string(),
                    ParseError::ParameterCount { found, bounds },
                ));
            }
        }

        for (target, value, bounds) in [
            ("numeric", parsed.numeric(), self.numeric),
            ("plusnumeric", parsed.plusnumeric(), self.plusnumeric),
        ] {
            let Some(bounds) = bounds else {
                continue;
            };
            let found = value.map_or(0, |value| value.occurrences());
            if !bounds.contains(found) {
                findings.push((
                    target.to_string(),
                    ParseError::NumericCount {
                        target: target.to_string(),
                        found,
                        bounds,
                    },
                ));
            }
        }

        if let Some(option_rules) = &self.options {
            check_options(option_rules, parsed, &mut findings);
        }

        findings
    }
}

fn check_options<T, A>(
    rules: &OptionRules,
    parsed: &ParseResult<T, A>,
    findings: &mut Vec<(String, ParseError)>,
) {
    for mandatory in &rules.mandatory {
        if !parsed.has_option(mandatory) {
            let options = parsed.equivalents(mandatory);
            let error = ParseError::MissingOption {
                options: options.clone(),
            };
            findings.extend(options.into_iter().map(|option| (option, error.clone())));
        }
    }

    for forbidden in &rules.forbidden {
        if parsed.has_option(forbidden) {
            let error = ParseError::ForbiddenOption {
                option: forbidden.clone(),
            };
            findings.extend(
                parsed
                    .equivalents(forbidden)
                    .into_iter()
                    .map(|option| (option, error.clone())),
            );
        }
    }

    if rules.mandatory.is_empty() && rules.optional.is_empty() {
        return;
    }

    let allowed: HashSet<&str> = rules
        .mandatory
        .iter()
        .chain(&rules.optional)
        .map(String::as_str)
        .collect();
    let forbidden: HashSet<&str> = rules.forbidden.iter().map(String::as_str).collect();
    let mut reported = HashSet::new();

    for option in parsed.options().keys() {
        let group = parsed.equivalents(option);
        let is_listed = group
            .iter()
            .any(|spelling| allowed.contains(spelling.as_str()) || forbidden.contains(spelling.as_str()));
        if is_listed || !reported.insert(group[0].clone()) {
            continue;
        }

        let error = ParseError::UnexpectedOption {
            option: option.clone(),
        };
        findings.extend(group.into_iter().map(|spelling| (spelling, error.clone())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_bounds_contains() {
        assert!(CountBounds::default().contains(100));
        assert!(CountBounds::exactly(2).contains(2));
        assert!(!CountBounds::exactly(2).contains(1));
        assert!(CountBounds::at_least(1).contains(5));
        assert!(!CountBounds::at_most(1).contains(2));
        assert!(CountBounds::between(1, 3).contains(3));
    }

    #[test]
    fn test_count_bounds_display() {
        assert_eq!(CountBounds::exactly(1).to_string(), "exactly 1");
        assert_eq!(CountBounds::between(1, 3).to_string(), "between 1 and 3");
        assert_eq!(CountBounds::at_least(2).to_string(), "at least 2");
        assert_eq!(CountBounds::at_most(0).to_string(), "at most 0");
        assert_eq!(CountBounds::default().to_string(), "any number");
    }

    #[test]
    fn test_rules_from_yaml() {
        let rules = ValidationRules::from_yaml(
            r#"
parameters:
  max: 1
options:
  mandatory: ["-n"]
numeric:
  min: 1
  max: 1
"#,
        )
        .unwrap();

        assert_eq!(rules.parameters, Some(CountBounds::at_most(1)));
        assert_eq!(rules.options.unwrap().mandatory, vec!["-n"]);
        assert_eq!(rules.numeric, Some(CountBounds::exactly(1)));
        assert!(rules.plusnumeric.is_none());
    }

    #[test]
    fn test_rules_from_yaml_rejects_unknown_keys() {
        let result = ValidationRules::from_yaml("parameter: {max: 1}");
        assert!(matches!(result, Err(crate::error::Error::Rules(_))));
    }

    #[test]
    fn test_empty_rules_from_yaml() {
        let rules = ValidationRules::from_yaml("{}").unwrap();
        assert_eq!(rules, ValidationRules::default());
    }
}
