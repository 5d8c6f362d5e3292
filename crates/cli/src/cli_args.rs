//! Command-line argument parsing.
//!
//! `qp` takes its own switches first and the tokens to inspect after `--`.

use clap::{Parser, ValueEnum};
use quickparse_core::ParserSettings;

/// How the parse report is printed.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Text,
    Yaml,
}

/// Command-line arguments for the `qp` parse inspector.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use quickparse_cli::cli_args::Args;
///
/// let args = Args::parse_from(["qp", "--execute", "--", "commit", "-am", "fix"]);
/// assert_eq!(args.tokens, vec!["commit", "-am", "fix"]);
/// ```
#[derive(Parser, Debug)]
#[command(name = "qp", term_width = 0)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Output format of the report.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Print the category of every token instead of parsing them.
    #[arg(long, action)]
    pub classify: bool,

    /// Validation rules as an inline YAML document.
    ///
    /// # Examples
    /// ```bash
    /// qp --rules '{parameters: {max: 1}, options: {forbidden: [-p]}}' -- log -p
    /// ```
    #[arg(long)]
    pub rules: Option<String>,

    /// Dispatch the resolved command and print what it returns.
    #[arg(long, short = 'e', action)]
    pub execute: bool,

    /// Bind `-abc` literally instead of splitting it into `-a`, `-b`, `-c`.
    #[arg(long, action)]
    pub no_unpack_minus: bool,

    /// Bind `+abc` literally instead of splitting it into `+a`, `+b`, `+c`.
    #[arg(long, action)]
    pub no_unpack_plus: bool,

    /// The tokens to parse.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub tokens: Vec<String>,
}

impl Args {
    pub fn settings(&self) -> ParserSettings {
        ParserSettings {
            unpack_minus_blocks: !self.no_unpack_minus,
            unpack_plus_blocks: !self.no_unpack_plus,
        }
    }
}
