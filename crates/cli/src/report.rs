//! Rendering of classifications, parse results and dispatch outcomes.

use std::io::Write;

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use itertools::Itertools;
use quickparse_core::{classify, Outcome, ParseResult, Result, Summary, Value};
use serde::Serialize;

#[derive(Serialize)]
struct Classified<'a> {
    token: &'a str,
    category: String,
}

/// Print every token with its category.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_classification<W: Write>(out: &mut W, tokens: &[String], yaml: bool) -> Result<()> {
    if yaml {
        let classified: Vec<Classified> = tokens
            .iter()
            .map(|token| Classified {
                token,
                category: classify(token).to_string(),
            })
            .collect();
        write!(out, "{}", serde_yaml::to_string(&classified)?)?;
        return Ok(());
    }

    let width = tokens.iter().map(|token| token.len()).max().unwrap_or(0);
    for token in tokens {
        writeln!(out, "{token:<width$}  {}", classify(token))?;
    }
    Ok(())
}

fn optional(value: Option<&Value>) -> String {
    value.map_or_else(|| "-".to_string(), ToString::to_string)
}

/// Print a parse result as aligned text, errors in red.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_text<W: Write, T, A>(out: &mut W, parsed: &ParseResult<T, A>) -> Result<()> {
    writeln!(out, "commands:     {}", parsed.commands().iter().join(" | "))?;
    writeln!(out, "parameters:   {}", parsed.parameters().iter().join(", "))?;
    writeln!(out, "numeric:      {}", optional(parsed.numeric()))?;
    writeln!(out, "plusnumeric:  {}", optional(parsed.plusnumeric()))?;
    writeln!(out, "non-commands: {}", parsed.non_commands().iter().join(" "))?;

    writeln!(out, "options:")?;
    for (spelling, value) in parsed.options() {
        writeln!(out, "  {spelling} = {value}")?;
    }

    if parsed.has_errors() {
        writeln!(out, "errors:")?;
        for (target, errors) in parsed.errors() {
            for error in errors {
                queue!(
                    out,
                    SetForegroundColor(Color::Red),
                    Print(format!("  [{target}] {error}")),
                    ResetColor,
                    Print("\n")
                )?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

/// Print a parse result as a YAML document.
///
/// # Errors
///
/// Returns an error if serializing or writing fails.
pub fn write_yaml<W: Write>(out: &mut W, summary: &Summary) -> Result<()> {
    write!(out, "{}", serde_yaml::to_string(summary)?)?;
    Ok(())
}

/// Print what the dispatched target returned, one line per value.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_outcome<W: Write>(out: &mut W, outcome: Option<Outcome<String>>) -> Result<()> {
    match outcome {
        Some(outcome) => {
            for value in outcome.into_vec() {
                writeln!(out, "=> {value}")?;
            }
        }
        None => writeln!(out, "=> no command resolved")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;
    use quickparse_core::ParserSettings;

    fn render<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut out = Vec::new();
        write(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_classification_text() {
        let tokens = vec!["--".to_string(), "-ab".to_string()];
        let text = render(|out| write_classification(out, &tokens, false));
        assert_eq!(
            text,
            "--   separator\n-ab  long option\n"
        );
    }

    #[test]
    fn test_classification_yaml() {
        let tokens = vec!["+3".to_string()];
        let yaml = render(|out| write_classification(out, &tokens, true));
        assert!(yaml.contains("token: '+3'") || yaml.contains("token: +3"));
        assert!(yaml.contains("category: plus numeric"));
    }

    #[test]
    fn test_text_report_colours_errors() {
        let parser = demo::parser(ParserSettings::default()).unwrap();
        let parsed = parser.parse(&["branch", "-x"]);
        let text = render(|out| write_text(out, &parsed));

        assert!(text.contains("commands:     branch | br\n"));
        assert!(text.contains("  -x = true\n"));
        assert!(text.contains("errors:\n"));
        assert!(text.contains("[-x] No value got for -x, expected int"));
    }

    #[test]
    fn test_text_report_without_errors() {
        let parser = demo::parser(ParserSettings::default()).unwrap();
        let parsed = parser.parse(&["log", "-5", "src"]);
        let text = render(|out| write_text(out, &parsed));

        assert!(text.contains("parameters:   \"src\"\n"));
        assert!(text.contains("numeric:      5\n"));
        assert!(text.contains("plusnumeric:  -\n"));
        assert!(!text.contains("errors:"));
    }

    #[test]
    fn test_outcome_lines() {
        let text = render(|out| {
            write_outcome(out, Some(Outcome::Many(vec!["a".to_string(), "b".to_string()])))
        });
        assert_eq!(text, "=> a\n=> b\n");

        let text = render(|out| write_outcome(out, None));
        assert_eq!(text, "=> no command resolved\n");
    }
}
