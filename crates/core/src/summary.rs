//! A serializable snapshot of a [`ParseResult`], for logging and reports.

use indexmap::IndexMap;
use serde::Serialize;

use crate::engine::ParseResult;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub commands: Vec<String>,
    pub parameters: Vec<Value>,
    pub options: IndexMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plusnumeric: Option<Value>,
    pub non_commands: Vec<String>,
    /// Error messages keyed by target.
    pub errors: IndexMap<String, Vec<String>>,
    pub has_target: bool,
}

impl<T, A> From<&ParseResult<T, A>> for Summary {
    fn from(parsed: &ParseResult<T, A>) -> Self {
        let errors = parsed
            .errors()
            .iter()
            .map(|(target, errors)| {
                (
                    target.clone(),
                    errors.iter().map(ToString::to_string).collect(),
                )
            })
            .collect();

        Self {
            commands: parsed.commands().to_vec(),
            parameters: parsed.parameters().to_vec(),
            options: parsed.options().clone(),
            numeric: parsed.numeric().cloned(),
            plusnumeric: parsed.plusnumeric().cloned(),
            non_commands: parsed.non_commands().to_vec(),
            errors,
            has_target: parsed.target().is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::{CommandTree, Target};
    use crate::engine::Parser;
    use crate::options::OptionConfig;
    use crate::value::{Value, ValueType};

    #[test]
    fn test_summary_reflects_parse() {
        let commands: CommandTree<()> = CommandTree::new().alias(["help", "h"], Target::Value(()));
        let options = OptionConfig::new().typed(["-x"], ValueType::Int);
        let parser = Parser::new(Some(commands), Some(options)).unwrap();

        let summary = parser.parse(&["h", "-x", "file", "-3"]).summary();

        assert_eq!(summary.commands, vec!["help", "h"]);
        assert_eq!(summary.options.get("-x"), Some(&Value::from("file")));
        assert_eq!(summary.numeric, Some(Value::Int(3)));
        assert!(summary.plusnumeric.is_none());
        assert_eq!(summary.errors["-x"].len(), 1);
        assert!(summary.has_target);
    }

    #[test]
    fn test_summary_serializes_to_yaml() {
        let parser: Parser<()> = Parser::new(None, None).unwrap();
        let summary = parser.parse(&["-a", "7"]).summary();

        let yaml = serde_yaml::to_string(&summary).unwrap();

        assert!(yaml.contains("parameters:\n- 7\n"));
        assert!(yaml.contains("options:"));
        assert!(!yaml.contains("numeric"));
        assert!(yaml.contains("has_target: false"));
    }
}
