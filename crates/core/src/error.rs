use std::ffi::OsString;

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::validation::CountBounds;

pub type Result<T> = std::result::Result<T, Error>;

/// Parse-time findings keyed by their target: an option spelling, a command
/// path, `parameters`, `numeric` or `plusnumeric`.
pub type ErrorMap = IndexMap<String, Vec<ParseError>>;

/// Record `error` under every target.
pub fn record_error<S: AsRef<str>>(errors: &mut ErrorMap, targets: &[S], error: &ParseError) {
    for target in targets {
        errors
            .entry(target.as_ref().to_string())
            .or_default()
            .push(error.clone());
    }
}

/// Configuration errors. These abort construction of a [`crate::Parser`]
/// because they point at a mistake by the integrator, not the user.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid command label `{}`: use letters, `_` and `-`, not starting with `-`", .0)]
    InvalidCommandLabel(String),

    #[error("The empty command label may only map to a handler, not to a subtree")]
    EmptyLabelSubtree,

    #[error("Duplicate key in commands config: `{}`", .0)]
    DuplicateCommandLabel(String),

    #[error("Valid option formats are `-*`, `--*` or `+*`, got `{}`", .0)]
    InvalidOptionSpelling(String),

    #[error("Option found multiple times in options config: `{}`", .0)]
    DuplicateOptionSpelling(String),

    #[error("More than one type found for options {}", .0.join(", "))]
    MultipleValueTypes(Vec<String>),

    #[error("An option group must contain at least one spelling")]
    EmptyOptionGroup,

    #[error("Command-line argument is not valid unicode: {:?}", .0)]
    NonUnicodeArgument(OsString),

    #[error("YAML error: {}", .0)]
    Rules(#[from] serde_yaml::Error),

    #[error("STDIO error: {}", .0)]
    Stdio(#[from] std::io::Error),
}

/// Coarse classification of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    TypeValidation,
    ValueNotFound,
    IncompleteCommand,
    RuleViolation,
}

/// A recoverable finding recorded while parsing or validating.
///
/// The parse always runs to completion; these only populate the error map of
/// the [`crate::ParseResult`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid value `{}` for {}, expected {}: {}", .value, .option, .expected, .reason)]
    TypeValidation {
        option: String,
        value: String,
        expected: String,
        reason: String,
    },

    #[error("No value got for {}, expected {}", .option, .expected)]
    ValueNotFound { option: String, expected: String },

    #[error("Incomplete command `{}`: no handler registered at this level", .path)]
    IncompleteCommand { path: String },

    #[error("Got {} parameters, expected {}", .found, .bounds)]
    ParameterCount { found: usize, bounds: CountBounds },

    #[error("Mandatory option missing: {}", .options.join(", "))]
    MissingOption { options: Vec<String> },

    #[error("Option `{}` is not allowed here", .option)]
    ForbiddenOption { option: String },

    #[error("Unexpected option `{}`", .option)]
    UnexpectedOption { option: String },

    #[error("Got {} `{}` flags, expected {}", .found, .target, .bounds)]
    NumericCount {
        target: String,
        found: usize,
        bounds: CountBounds,
    },
}

impl ParseError {
    pub fn type_validation(option: &str, value: &str, expected: &str, reason: String) -> Self {
        Self::TypeValidation {
            option: option.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
            reason,
        }
    }

    pub fn value_not_found(option: &str, expected: &str) -> Self {
        Self::ValueNotFound {
            option: option.to_string(),
            expected: expected.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TypeValidation { .. } => ErrorKind::TypeValidation,
            Self::ValueNotFound { .. } => ErrorKind::ValueNotFound,
            Self::IncompleteCommand { .. } => ErrorKind::IncompleteCommand,
            Self::ParameterCount { .. }
            | Self::MissingOption { .. }
            | Self::ForbiddenOption { .. }
            | Self::UnexpectedOption { .. }
            | Self::NumericCount { .. } => ErrorKind::RuleViolation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of_parse_errors() {
        assert_eq!(
            ParseError::value_not_found("-x", "int").kind(),
            ErrorKind::ValueNotFound
        );
        assert_eq!(
            ParseError::IncompleteCommand {
                path: "user".to_string()
            }
            .kind(),
            ErrorKind::IncompleteCommand
        );
        assert_eq!(
            ParseError::ForbiddenOption {
                option: "-f".to_string()
            }
            .kind(),
            ErrorKind::RuleViolation
        );
    }

    #[test]
    fn test_parse_error_messages() {
        let error = ParseError::type_validation("-x", "abc", "int", "not an int".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid value `abc` for -x, expected int: not an int"
        );

        let error = ParseError::value_not_found("--depth", "int");
        assert_eq!(error.to_string(), "No value got for --depth, expected int");
    }

    #[test]
    fn test_record_error_under_every_target() {
        let mut errors = ErrorMap::new();
        let error = ParseError::value_not_found("-n", "str");
        record_error(&mut errors, &["-n", "--name"], &error);
        record_error(&mut errors, &["-n"], &error);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors["-n"].len(), 2);
        assert_eq!(errors["--name"], vec![error]);
    }

    #[test]
    fn test_config_error_messages() {
        let error = Error::MultipleValueTypes(vec!["-n".to_string(), "--name".to_string()]);
        assert_eq!(error.to_string(), "More than one type found for options -n, --name");
    }
}
