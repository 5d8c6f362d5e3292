//! The built-in configuration `qp` parses against: a small git-like tool.

use quickparse_core::{
    handler, CommandTree, OptionConfig, ParseResult, Parser, ParserSettings, Result, Target,
    Value, ValueType,
};

pub const USAGE: &str = "usage: qp -- [commit|log|stash|branch|help|version] [options] [args]";

fn usage(_: &ParseResult<String>) -> String {
    USAGE.to_string()
}

fn commit(parsed: &ParseResult<String>) -> String {
    let message = parsed
        .option("--message")
        .map_or_else(|| "<no message>".to_string(), ToString::to_string);
    let scope = if parsed.has_option("-a") {
        "all tracked files"
    } else {
        "staged files"
    };
    format!("commit {scope} with message {message}")
}

fn log(parsed: &ParseResult<String>) -> String {
    let limit = match parsed.numeric() {
        Some(Value::Tuple(values)) => values.last().map(ToString::to_string),
        Some(value) => Some(value.to_string()),
        None => None,
    };
    let depth = parsed.option("--depth").map(ToString::to_string);

    match (limit, depth) {
        (Some(limit), _) => format!("show last {limit} entries"),
        (None, Some(depth)) => format!("show entries up to depth {depth}"),
        (None, None) => "show every entry".to_string(),
    }
}

fn branch_list(parsed: &ParseResult<String>) -> String {
    if parsed.has_option("--verbose") {
        "list branches with their last commit".to_string()
    } else {
        "list branches".to_string()
    }
}

fn branch_add(parsed: &ParseResult<String>) -> String {
    match parsed.parameters().first() {
        Some(name) => format!("create branch {name}"),
        None => "branch name missing".to_string(),
    }
}

/// The demo command tree.
pub fn commands() -> CommandTree<String> {
    CommandTree::new()
        .default(Target::handler(usage))
        .command("commit", Target::handler(commit))
        .command("log", Target::handler(log))
        .command(
            "stash",
            CommandTree::new()
                .default(Target::Value("stash changes".to_string()))
                .command("list", Target::Value("list stashes".to_string())),
        )
        .alias(
            ["branch", "br"],
            CommandTree::new()
                .default(Target::handlers(vec![handler(branch_list), handler(usage)]))
                .alias(["list", "ls"], Target::handler(branch_list))
                .command("add", Target::handler(branch_add)),
        )
        .alias(["help", "h"], Target::handler(usage))
        .command("version", Target::Value(env!("CARGO_PKG_VERSION").to_string()))
}

/// The demo option declarations.
pub fn options() -> OptionConfig {
    OptionConfig::new()
        .typed(["-m", "--message"], ValueType::Str)
        .flag(["-p", "--patch"])
        .typed(["-n", "-name", "--name"], ValueType::Str)
        .flag(["-v", "--verbose"])
        .typed(["-x"], ValueType::Int)
        .typed(["--depth"], ValueType::Int)
        .typed(["--ratio"], ValueType::Float)
}

/// Build the demo parser.
///
/// # Errors
///
/// Fails only if the demo configuration itself is malformed.
pub fn parser(settings: ParserSettings) -> Result<Parser<String>> {
    Parser::with_settings(Some(commands()), Some(options()), settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickparse_core::Outcome;

    fn run(tokens: &[&str]) -> Option<Outcome<String>> {
        parser(ParserSettings::default())
            .unwrap()
            .parse(tokens)
            .execute()
    }

    #[test]
    fn test_demo_configuration_is_valid() {
        assert!(parser(ParserSettings::default()).is_ok());
    }

    #[test]
    fn test_default_prints_usage() {
        assert_eq!(run(&[]), Some(Outcome::Single(USAGE.to_string())));
    }

    #[test]
    fn test_commit_handler_reads_options() {
        let outcome = run(&["commit", "-am", "fix"]).and_then(Outcome::into_single);
        assert_eq!(
            outcome.as_deref(),
            Some("commit all tracked files with message \"fix\"")
        );
    }

    #[test]
    fn test_log_handler_reads_numeric() {
        let outcome = run(&["log", "-3"]).and_then(Outcome::into_single);
        assert_eq!(outcome.as_deref(), Some("show last 3 entries"));
    }

    #[test]
    fn test_branch_default_runs_handler_list() {
        let outcome = run(&["br", "-v"]).map(Outcome::into_vec);
        assert_eq!(
            outcome,
            Some(vec![
                "list branches with their last commit".to_string(),
                USAGE.to_string()
            ])
        );
    }

    #[test]
    fn test_version_is_data() {
        let outcome = run(&["version"]).and_then(Outcome::into_single);
        assert_eq!(outcome.as_deref(), Some(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_stash_list() {
        let outcome = run(&["stash", "list"]).and_then(Outcome::into_single);
        assert_eq!(outcome.as_deref(), Some("list stashes"));
    }
}
