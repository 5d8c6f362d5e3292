//! QuickParse CLI Library
//!
//! This crate provides `qp`, a parse inspector for the quickparse engine. It
//! runs the engine over the tokens given on the command line against a small
//! built-in git-like configuration and prints what the engine made of them.
//!
//! # Architecture
//!
//! - [`cli_args`]: Switches of `qp` itself
//! - [`demo`]: The command tree and option declarations parsed against
//! - [`report`]: Text and YAML rendering
//!
//! # Examples
//!
//! ```bash
//! # Show how every token is classified
//! qp --classify -- commit -am "first" -3 --depth=2
//!
//! # Parse, check rules and dispatch
//! qp --rules '{options: {mandatory: [-m]}}' --execute -- commit -a
//!
//! # Machine readable output
//! qp --format yaml -- branch ls -v
//! ```

use std::io::Write;

use log::debug;
use quickparse_core::{Result, ValidationRules};

use crate::cli_args::{Args, Format};

pub mod cli_args;
pub mod demo;
pub mod report;

/// Run `qp` with parsed arguments, writing the report to `out`.
///
/// Returns whether the parse result carries errors.
///
/// # Errors
///
/// Returns an error if the rules document is malformed or writing fails.
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<bool> {
    if args.classify {
        report::write_classification(out, &args.tokens, args.format == Format::Yaml)?;
        return Ok(false);
    }

    let parser = demo::parser(args.settings())?;
    let mut parsed = parser.parse(&args.tokens);
    debug!("Parsed {} tokens", parsed.raw_args().len());

    if let Some(rules) = &args.rules {
        let rules = ValidationRules::from_yaml(rules)?;
        debug!("Validating against {rules:?}");
        parsed.validate(&rules);
    }

    match args.format {
        Format::Text => report::write_text(out, &parsed)?,
        Format::Yaml => report::write_yaml(out, &parsed.summary())?,
    }

    if args.execute {
        report::write_outcome(out, parsed.execute())?;
    }

    Ok(parsed.has_errors())
}
