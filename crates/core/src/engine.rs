//! The parse engine: one left-to-right pass over the tokens.

use std::ffi::OsString;
use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, trace, warn};

use crate::classifier::{classify, ArgumentCategory, Sign};
use crate::commands::{CommandTree, NormalizedTree, Target};
use crate::error::{record_error, Error, ErrorMap, ParseError, Result};
use crate::options::{OptionConfig, OptionResolver, OptionTable};
use crate::summary::Summary;
use crate::validation::ValidationRules;
use crate::value::{accumulate_into, coerce_parameter, Value};

/// Engine level switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserSettings {
    /// Split undeclared `-abc` blocks into `-a`, `-b`, `-c`.
    pub unpack_minus_blocks: bool,
    /// Split undeclared `+abc` blocks into `+a`, `+b`, `+c`.
    pub unpack_plus_blocks: bool,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            unpack_minus_blocks: true,
            unpack_plus_blocks: true,
        }
    }
}

/// A validated, reusable parser configuration.
///
/// # Examples
///
/// ```
/// use quickparse_core::{CommandTree, OptionConfig, Parser, Target, Value, ValueType};
///
/// let commands: CommandTree<&str> = CommandTree::new()
///     .default(Target::Value("help"))
///     .alias(["commit", "ci"], Target::Value("commit"));
/// let options = OptionConfig::new()
///     .typed(["-m", "--message"], ValueType::Str)
///     .flag(["-a", "--all"]);
///
/// let parser = Parser::new(Some(commands), Some(options))?;
/// let parsed = parser.parse(&["ci", "-am", "first"]);
///
/// assert_eq!(parsed.commands(), ["commit", "ci"]);
/// assert_eq!(parsed.option("--message"), Some(&Value::from("first")));
/// assert_eq!(parsed.option("--all"), Some(&Value::Bool(true)));
/// # Ok::<(), quickparse_core::Error>(())
/// ```
#[derive(Debug)]
pub struct Parser<T, A = ()> {
    commands: NormalizedTree<T, A>,
    options: Arc<OptionTable>,
    settings: ParserSettings,
}

impl<T> Parser<T> {
    pub fn classify(token: &str) -> ArgumentCategory {
        classify(token)
    }
}

impl<T: Clone, A> Parser<T, A> {
    /// Validate and normalise the command tree and option configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either configuration is malformed, see
    /// [`NormalizedTree::from_tree`] and [`OptionTable::from_config`].
    pub fn new(commands: Option<CommandTree<T, A>>, options: Option<OptionConfig>) -> Result<Self> {
        Self::with_settings(commands, options, ParserSettings::default())
    }

    /// Like [`Parser::new`] with explicit [`ParserSettings`].
    ///
    /// # Errors
    ///
    /// Returns an error if either configuration is malformed.
    pub fn with_settings(
        commands: Option<CommandTree<T, A>>,
        options: Option<OptionConfig>,
        settings: ParserSettings,
    ) -> Result<Self> {
        let commands = match commands {
            Some(tree) => NormalizedTree::from_tree(&tree)?,
            None => NormalizedTree::default(),
        };
        let options = match options {
            Some(config) => OptionTable::from_config(&config)?,
            None => OptionTable::default(),
        };

        debug!(
            "Parser ready with {} option spellings and settings {:?}",
            options.len(),
            settings
        );

        Ok(Self {
            commands,
            options: Arc::new(options),
            settings,
        })
    }

    pub fn commands(&self) -> &NormalizedTree<T, A> {
        &self.commands
    }

    pub fn options(&self) -> &OptionTable {
        &self.options
    }

    pub fn settings(&self) -> ParserSettings {
        self.settings
    }

    /// Parse OS arguments, failing before any parsing if one is not unicode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonUnicodeArgument`] for the first non unicode argument.
    pub fn parse_os<I>(&self, tokens: I) -> Result<ParseResult<T, A>>
    where
        I: IntoIterator<Item = OsString>,
    {
        let tokens = tokens
            .into_iter()
            .map(|token| token.into_string().map_err(Error::NonUnicodeArgument))
            .collect::<Result<Vec<String>>>()?;

        Ok(self.parse(&tokens))
    }

    /// Parse a token sequence. Never fails: problems end up in the error map.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> ParseResult<T, A> {
        let raw_args: Vec<String> = tokens.iter().map(|t| t.as_ref().to_string()).collect();

        let mut resolver = OptionResolver::new(&self.options, &self.settings);
        let mut walker = self.commands.walker();
        let mut parameters = Vec::new();
        let mut numeric = None;
        let mut plusnumeric = None;
        let mut non_commands = Vec::new();
        let mut parameters_only = false;

        let mut rest = raw_args.iter();
        while let Some(token) = rest.next() {
            if parameters_only {
                non_commands.push(token.clone());
                parameters.push(coerce_parameter(token));
                continue;
            }

            let category = classify(token);
            trace!("`{token}` is {category}");

            if category == ArgumentCategory::Separator {
                debug!("Separator found, only parameters from here on");
                parameters_only = true;
                continue;
            }

            non_commands.push(token.clone());

            match category {
                ArgumentCategory::Numeric(sign) => {
                    let value = coerce_parameter(&token[1..]);
                    let slot = match sign {
                        Sign::Minus => &mut numeric,
                        Sign::Plus => &mut plusnumeric,
                    };
                    accumulate_into(slot, value);
                }
                ArgumentCategory::ParamOrCommand => {
                    if walker.step(token) {
                        non_commands.pop();
                    } else {
                        parameters.push(coerce_parameter(token));
                    }
                }
                _ => {
                    if let Some(consumed) = resolver.resolve(token, category, &mut rest) {
                        non_commands.push(consumed.to_string());
                    }
                }
            }
        }

        let walk = walker.finish();
        let (options, mut errors) = resolver.into_parts();

        if let Some(error) = walk.error {
            warn!("{error}");
            record_error(&mut errors, &[walk.command_path.join(" ")], &error);
        }

        ParseResult {
            raw_args,
            commands: walk.commands,
            command_path: walk.command_path,
            parameters,
            options,
            numeric,
            plusnumeric,
            non_commands,
            errors,
            target: walk.target,
            option_table: Arc::clone(&self.options),
        }
    }
}

/// Return value(s) of [`ParseResult::execute`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Single(T),
    /// One value per handler of a handler list, in order.
    Many(Vec<T>),
}

impl<T> Outcome<T> {
    pub fn into_single(self) -> Option<T> {
        match self {
            Outcome::Single(value) => Some(value),
            Outcome::Many(_) => None,
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Outcome::Single(value) => vec![value],
            Outcome::Many(values) => values,
        }
    }
}

/// Everything one parse found out about a token sequence.
#[derive(Debug, Clone)]
pub struct ParseResult<T, A = ()> {
    raw_args: Vec<String>,
    commands: Vec<String>,
    command_path: Vec<String>,
    parameters: Vec<Value>,
    options: IndexMap<String, Value>,
    numeric: Option<Value>,
    plusnumeric: Option<Value>,
    non_commands: Vec<String>,
    errors: ErrorMap,
    target: Option<Target<T, A>>,
    option_table: Arc<OptionTable>,
}

impl<T, A> ParseResult<T, A> {
    pub fn raw_args(&self) -> &[String] {
        &self.raw_args
    }

    /// Matched command paths in every alias spelling, shortest first.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Matched command labels as they were typed.
    pub fn command_path(&self) -> &[String] {
        &self.command_path
    }

    pub fn parameters(&self) -> &[Value] {
        &self.parameters
    }

    pub fn options(&self) -> &IndexMap<String, Value> {
        &self.options
    }

    pub fn option(&self, spelling: &str) -> Option<&Value> {
        self.options.get(spelling)
    }

    pub fn has_option(&self, spelling: &str) -> bool {
        self.options.contains_key(spelling)
    }

    /// Spellings declared equivalent to `spelling`, itself included.
    pub fn equivalents(&self, spelling: &str) -> Vec<String> {
        self.option_table.equivalents(spelling)
    }

    /// Value of `-N` flags: a scalar, or a tuple when repeated.
    pub fn numeric(&self) -> Option<&Value> {
        self.numeric.as_ref()
    }

    /// Value of `+N` flags: a scalar, or a tuple when repeated.
    pub fn plusnumeric(&self) -> Option<&Value> {
        self.plusnumeric.as_ref()
    }

    /// Every token except the separator and the matched commands.
    pub fn non_commands(&self) -> &[String] {
        &self.non_commands
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn errors_for(&self, target: &str) -> &[ParseError] {
        self.errors.get(target).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn target(&self) -> Option<&Target<T, A>> {
        self.target.as_ref()
    }

    /// Check the result against business rules, appending any findings to
    /// the error map.
    pub fn validate(&mut self, rules: &ValidationRules) {
        for (target, error) in rules.check(self) {
            warn!("{error}");
            record_error(&mut self.errors, &[target], &error);
        }
    }

    pub fn summary(&self) -> Summary {
        Summary::from(self)
    }
}

impl<T: Clone> ParseResult<T> {
    /// Dispatch the resolved target without call arguments.
    ///
    /// See [`ParseResult::execute_with`].
    pub fn execute(&self) -> Option<Outcome<T>> {
        self.execute_with(&())
    }
}

impl<T: Clone, A> ParseResult<T, A> {
    /// Dispatch the resolved target with `args`.
    ///
    /// A handler is called with this result and `args`, a handler list calls
    /// each in order with the same `args` and a plain value is returned
    /// unchanged. `None` means no target was resolved.
    pub fn execute_with(&self, args: &A) -> Option<Outcome<T>> {
        let outcome = match self.target.as_ref()? {
            Target::Value(value) => Outcome::Single(value.clone()),
            Target::Handler(handler) => Outcome::Single(handler(self, args)),
            Target::Handlers(handlers) => Outcome::Many(
                handlers
                    .iter()
                    .map(|handler| handler(self, args))
                    .collect(),
            ),
        };

        Some(outcome)
    }
}
