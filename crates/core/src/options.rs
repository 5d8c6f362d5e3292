//! Option declarations, their equivalency table and the option resolver.
//!
//! An option is declared as a group of equivalent spellings sharing one
//! [`ValueType`]:
//!
//! ```
//! use quickparse_core::options::{OptionConfig, OptionGroup};
//! use quickparse_core::value::ValueType;
//!
//! let config = OptionConfig::new()
//!     .group(OptionGroup::new(["-a", "--all"]))
//!     .group(OptionGroup::new(["-n", "-name", "--name"]).typed(ValueType::Str));
//! assert_eq!(config.groups().len(), 2);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::classifier::{ArgumentCategory, Sign};
use crate::engine::ParserSettings;
use crate::error::Error::{
    DuplicateOptionSpelling, EmptyOptionGroup, InvalidOptionSpelling, MultipleValueTypes,
};
use crate::error::{record_error, ErrorMap, ParseError, Result};
use crate::value::{Value, ValueType};

static OPTION_SPELLING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:-|--|\+)[A-Za-z][A-Za-z-]*$").expect("option spelling regex must compile")
});

/// A group of equivalent option spellings.
///
/// Without a type the group is a boolean flag. Declaring more than one type
/// is a configuration error reported by [`OptionTable::from_config`].
#[derive(Debug, Clone, Default)]
pub struct OptionGroup {
    spellings: Vec<String>,
    value_types: Vec<ValueType>,
}

impl OptionGroup {
    pub fn new<I, S>(spellings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            spellings: spellings.into_iter().map(Into::into).collect(),
            value_types: Vec::new(),
        }
    }

    #[must_use]
    pub fn typed(mut self, value_type: ValueType) -> Self {
        self.value_types.push(value_type);
        self
    }

    pub fn spellings(&self) -> &[String] {
        &self.spellings
    }
}

/// Ordered list of option groups.
#[derive(Debug, Clone, Default)]
pub struct OptionConfig {
    groups: Vec<OptionGroup>,
}

impl OptionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn group(mut self, group: OptionGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Shorthand for a boolean group.
    #[must_use]
    pub fn flag<const N: usize>(self, spellings: [&str; N]) -> Self {
        self.group(OptionGroup::new(spellings))
    }

    /// Shorthand for a typed group.
    #[must_use]
    pub fn typed<const N: usize>(self, spellings: [&str; N], value_type: ValueType) -> Self {
        self.group(OptionGroup::new(spellings).typed(value_type))
    }

    pub fn groups(&self) -> &[OptionGroup] {
        &self.groups
    }
}

impl From<Vec<OptionGroup>> for OptionConfig {
    fn from(groups: Vec<OptionGroup>) -> Self {
        Self { groups }
    }
}

/// Shared record of one equivalency group.
#[derive(Debug)]
pub struct Equivalency {
    pub value_type: ValueType,
    pub spellings: Vec<String>,
}

/// Lookup from every declared spelling to its equivalency record.
#[derive(Debug, Default)]
pub struct OptionTable {
    by_spelling: HashMap<String, Arc<Equivalency>>,
}

impl OptionTable {
    /// Validate an option configuration and build its equivalency table.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A group has no spelling
    /// - A spelling is not `-name`, `--name` or `+name`
    /// - A spelling appears in more than one place
    /// - A group declares more than one type
    pub fn from_config(config: &OptionConfig) -> Result<Self> {
        validate(config)?;
        Ok(build_equivalency(config))
    }

    pub fn get(&self, spelling: &str) -> Option<&Arc<Equivalency>> {
        self.by_spelling.get(spelling)
    }

    pub fn contains(&self, spelling: &str) -> bool {
        self.by_spelling.contains_key(spelling)
    }

    /// All spellings equivalent to `spelling`, itself included.
    pub fn equivalents(&self, spelling: &str) -> Vec<String> {
        match self.get(spelling) {
            Some(equivalency) => equivalency.spellings.clone(),
            None => vec![spelling.to_string()],
        }
    }

    pub fn len(&self) -> usize {
        self.by_spelling.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_spelling.is_empty()
    }
}

fn validate(config: &OptionConfig) -> Result<()> {
    let mut seen = HashSet::new();

    for group in config.groups() {
        if group.spellings.is_empty() {
            return Err(EmptyOptionGroup);
        }

        if group.value_types.len() > 1 {
            return Err(MultipleValueTypes(group.spellings.clone()));
        }

        for spelling in &group.spellings {
            let spelling = spelling.trim();
            if !OPTION_SPELLING.is_match(spelling) {
                return Err(InvalidOptionSpelling(spelling.to_string()));
            }

            if !seen.insert(spelling.to_string()) {
                return Err(DuplicateOptionSpelling(spelling.to_string()));
            }
        }
    }

    Ok(())
}

fn build_equivalency(config: &OptionConfig) -> OptionTable {
    let mut by_spelling = HashMap::new();

    for group in config.groups() {
        let spellings: Vec<String> = group
            .spellings
            .iter()
            .map(|spelling| spelling.trim().to_string())
            .collect();
        let equivalency = Arc::new(Equivalency {
            value_type: group.value_types.first().cloned().unwrap_or_default(),
            spellings: spellings.clone(),
        });

        for spelling in spellings {
            by_spelling.insert(spelling, Arc::clone(&equivalency));
        }
    }

    OptionTable { by_spelling }
}

/// Binds option tokens to values while the engine walks the token stream.
pub struct OptionResolver<'c> {
    table: &'c OptionTable,
    settings: &'c ParserSettings,
    options: IndexMap<String, Value>,
    errors: ErrorMap,
}

impl<'c> OptionResolver<'c> {
    pub fn new(table: &'c OptionTable, settings: &'c ParserSettings) -> Self {
        Self {
            table,
            settings,
            options: IndexMap::new(),
            errors: ErrorMap::new(),
        }
    }

    /// Resolve one option token.
    ///
    /// `rest` yields the tokens after `token`; a typed option takes the next
    /// one as its value. The consumed value token, if any, is returned.
    pub fn resolve<'t, I>(
        &mut self,
        token: &str,
        category: ArgumentCategory,
        rest: &mut I,
    ) -> Option<&'t str>
    where
        I: Iterator<Item = &'t String>,
    {
        match category {
            ArgumentCategory::SingleLetter(_) => self.resolve_declared_or_flag(token, rest),
            ArgumentCategory::LongOption if self.table.contains(token) => {
                self.resolve_declared_or_flag(token, rest)
            }
            ArgumentCategory::LongOption | ArgumentCategory::PotentialLetterAndValue => {
                self.resolve_block(token, rest)
            }
            ArgumentCategory::OptionWithValue => {
                self.resolve_inline(token);
                None
            }
            ArgumentCategory::Separator
            | ArgumentCategory::Numeric(_)
            | ArgumentCategory::ParamOrCommand => None,
        }
    }

    pub fn into_parts(self) -> (IndexMap<String, Value>, ErrorMap) {
        (self.options, self.errors)
    }

    fn resolve_declared_or_flag<'t, I>(&mut self, spelling: &str, rest: &mut I) -> Option<&'t str>
    where
        I: Iterator<Item = &'t String>,
    {
        match self.table.get(spelling) {
            Some(equivalency) if !equivalency.value_type.is_bool() => {
                let equivalency = Arc::clone(equivalency);
                self.bind_next(spelling, &equivalency, rest)
            }
            _ => {
                self.bind(spelling, Value::Bool(true));
                None
            }
        }
    }

    /// `-abc`, `-n5`, `--some-thing`: a glued value, a block of letters or a literal option.
    fn resolve_block<'t, I>(&mut self, token: &str, rest: &mut I) -> Option<&'t str>
    where
        I: Iterator<Item = &'t String>,
    {
        let table = self.table;
        let (Some(sign), Some(prefix), Some(body)) =
            (Sign::from_token(token), token.get(..2), token.get(1..))
        else {
            self.bind(token, Value::Bool(true));
            return None;
        };

        if let Some(equivalency) = table.get(prefix) {
            if !equivalency.value_type.is_bool() {
                let equivalency = Arc::clone(equivalency);
                self.bind_value(prefix, &equivalency, &token[2..]);
                return None;
            }
        }

        let unpack = match sign {
            Sign::Minus => self.settings.unpack_minus_blocks,
            Sign::Plus => self.settings.unpack_plus_blocks,
        };
        if !unpack || !body.chars().all(|c| c.is_ascii_alphabetic()) {
            self.bind(token, Value::Bool(true));
            return None;
        }

        let flags: Vec<String> = body
            .chars()
            .map(|letter| format!("{}{letter}", sign.as_char()))
            .collect();
        let valued: Vec<&String> = flags
            .iter()
            .filter(|flag| {
                table
                    .get(flag.as_str())
                    .is_some_and(|equivalency| !equivalency.value_type.is_bool())
            })
            .collect();

        if valued.len() > 1 {
            debug!("Not unpacking `{token}`: more than one letter expects a value");
            self.bind(token, Value::Bool(true));
            return None;
        }

        debug!("Unpacking letter block `{token}`");
        let mut consumed = None;
        for flag in &flags {
            consumed = self.resolve_declared_or_flag(flag, rest).or(consumed);
        }
        consumed
    }

    /// `name=value`: split once on the first `=`.
    fn resolve_inline(&mut self, token: &str) {
        let Some((name, raw)) = token.split_once('=') else {
            self.bind(token, Value::Bool(true));
            return;
        };

        match self.table.get(name) {
            Some(equivalency) => {
                let equivalency = Arc::clone(equivalency);
                self.bind_value(name, &equivalency, raw);
            }
            None => self.bind(name, Value::Str(raw.to_string())),
        }
    }

    fn bind_next<'t, I>(
        &mut self,
        spelling: &str,
        equivalency: &Equivalency,
        rest: &mut I,
    ) -> Option<&'t str>
    where
        I: Iterator<Item = &'t String>,
    {
        let Some(raw) = rest.next() else {
            let error = ParseError::value_not_found(spelling, equivalency.value_type.name());
            warn!("{error}");
            record_error(&mut self.errors, &equivalency.spellings, &error);
            self.bind(spelling, Value::Bool(true));
            return None;
        };

        self.bind_value(spelling, equivalency, raw);
        Some(raw.as_str())
    }

    fn bind_value(&mut self, spelling: &str, equivalency: &Equivalency, raw: &str) {
        match equivalency.value_type.coerce(raw) {
            Ok(value) => self.bind(spelling, value),
            Err(reason) => {
                let error = ParseError::type_validation(
                    spelling,
                    raw,
                    equivalency.value_type.name(),
                    reason,
                );
                warn!("{error}");
                record_error(&mut self.errors, &equivalency.spellings, &error);
                self.bind(spelling, Value::Str(raw.to_string()));
            }
        }
    }

    /// Bind `value` to `spelling` and every equivalent, accumulating repeats.
    fn bind(&mut self, spelling: &str, value: Value) {
        let targets = self.table.equivalents(spelling);
        debug!("Binding {value} to {}", targets.join(", "));

        for target in targets {
            match self.options.get_mut(&target) {
                Some(existing) => {
                    let previous = std::mem::replace(existing, Value::Bool(true));
                    *existing = previous.accumulate(value.clone());
                }
                None => {
                    self.options.insert(target, value.clone());
                }
            }
        }
    }
}
