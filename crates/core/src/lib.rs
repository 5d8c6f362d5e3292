//! QuickParse Core Library
//!
//! Classifies raw command line tokens, resolves them against a command tree and
//! an option configuration, and dispatches the matched handler.
//!
//! # Key Features
//!
//! - **Classification**: Every token falls into exactly one [`ArgumentCategory`]
//! - **Command Tree**: Nested commands with aliases and default handlers
//! - **Options**: Equivalent spellings, typed values, letter block unpacking
//! - **Collected Errors**: Parsing never fails on user input, findings go to an error map
//! - **Validation**: Declarative rules on parameters, options and numeric flags
//!
//! # Examples
//!
//! ```
//! use quickparse_core::{CommandTree, OptionConfig, ParseResult, Parser, Target};
//!
//! let commands = CommandTree::new()
//!     .default(Target::Value("usage".to_string()))
//!     .command(
//!         "greet",
//!         Target::handler(|parsed: &ParseResult<String>| {
//!             format!("hello {}", parsed.parameters()[0].as_str().unwrap_or_default())
//!         }),
//!     );
//! let options = OptionConfig::new().flag(["-l", "--loud"]);
//!
//! let parser = Parser::new(Some(commands), Some(options))?;
//! let parsed = parser.parse(&["greet", "world", "--loud"]);
//!
//! assert!(parsed.has_option("-l"));
//! let outcome = parsed.execute().and_then(|outcome| outcome.into_single());
//! assert_eq!(outcome.as_deref(), Some("hello world"));
//! # Ok::<(), quickparse_core::Error>(())
//! ```

pub mod classifier;
pub mod commands;
pub mod engine;
pub mod error;
pub mod options;
pub mod summary;
pub mod validation;
pub mod value;

pub use classifier::{classify, ArgumentCategory, Sign};
pub use commands::{handler, handler_with, CommandNode, CommandTree, Handler, Target};
pub use engine::{Outcome, ParseResult, Parser, ParserSettings};
pub use error::{Error, ErrorKind, ErrorMap, ParseError, Result};
pub use options::{OptionConfig, OptionGroup};
pub use summary::Summary;
pub use validation::{CountBounds, OptionRules, ValidationRules};
pub use value::{Validator, Value, ValueType};
