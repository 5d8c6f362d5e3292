//! Command tree declaration, normalisation and walking.
//!
//! A command tree maps labels, or groups of equivalent alias labels, to
//! either a nested tree or a dispatch [`Target`]. The empty label marks the
//! target used when no further command token matched at that level.
//!
//! ```
//! use quickparse_core::commands::{CommandTree, Target};
//!
//! let tree: CommandTree<&str> = CommandTree::new()
//!     .default(Target::Value("help"))
//!     .command("commit", Target::Value("commit"))
//!     .alias(["branch", "br"], CommandTree::new()
//!         .default(Target::Value("branch"))
//!         .alias(["list", "ls"], Target::Value("branch list")));
//! assert_eq!(tree.len(), 3);
//! ```

use std::collections::HashSet;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::engine::ParseResult;
use crate::error::Error::{DuplicateCommandLabel, EmptyLabelSubtree, InvalidCommandLabel};
use crate::error::{ParseError, Result};

// A leading `-` would make the label classify as an option, never as a command.
static COMMAND_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z_-]*$").expect("command label regex must compile")
});

/// A callable dispatch target.
///
/// It receives the parse result it was resolved from and the arguments given
/// to [`ParseResult::execute_with`].
pub type Handler<T, A = ()> = Arc<dyn Fn(&ParseResult<T, A>, &A) -> T + Send + Sync>;

/// Wrap a closure that ignores the call arguments as a [`Handler`].
pub fn handler<T, A, F>(f: F) -> Handler<T, A>
where
    T: 'static,
    A: 'static,
    F: Fn(&ParseResult<T, A>) -> T + Send + Sync + 'static,
{
    Arc::new(move |parsed: &ParseResult<T, A>, _: &A| f(parsed))
}

/// Wrap a closure taking the call arguments as a [`Handler`].
pub fn handler_with<T, A, F>(f: F) -> Handler<T, A>
where
    F: Fn(&ParseResult<T, A>, &A) -> T + Send + Sync + 'static,
{
    Arc::new(f)
}

/// What a command resolves to.
pub enum Target<T, A = ()> {
    /// Plain data, returned as is by `execute`.
    Value(T),
    Handler(Handler<T, A>),
    /// Called in order with the same arguments, collecting every return value.
    Handlers(Vec<Handler<T, A>>),
}

impl<T: 'static, A: 'static> Target<T, A> {
    pub fn handler<F>(f: F) -> Self
    where
        F: Fn(&ParseResult<T, A>) -> T + Send + Sync + 'static,
    {
        Target::Handler(handler(f))
    }

    pub fn handler_with<F>(f: F) -> Self
    where
        F: Fn(&ParseResult<T, A>, &A) -> T + Send + Sync + 'static,
    {
        Target::Handler(Arc::new(f))
    }
}

impl<T, A> Target<T, A> {
    pub fn handlers(handlers: Vec<Handler<T, A>>) -> Self {
        Target::Handlers(handlers)
    }
}

impl<T: Clone, A> Clone for Target<T, A> {
    fn clone(&self) -> Self {
        match self {
            Target::Value(value) => Target::Value(value.clone()),
            Target::Handler(handler) => Target::Handler(Arc::clone(handler)),
            Target::Handlers(handlers) => Target::Handlers(handlers.clone()),
        }
    }
}

impl<T: Debug, A> Debug for Target<T, A> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Value(value) => formatter.debug_tuple("Value").field(value).finish(),
            Target::Handler(_) => formatter.write_str("Handler(..)"),
            Target::Handlers(handlers) => write!(formatter, "Handlers({})", handlers.len()),
        }
    }
}

/// Value of a command tree entry.
#[derive(Debug, Clone)]
pub enum CommandNode<T, A = ()> {
    Branch(CommandTree<T, A>),
    Leaf(Target<T, A>),
}

impl<T, A> From<CommandTree<T, A>> for CommandNode<T, A> {
    fn from(tree: CommandTree<T, A>) -> Self {
        CommandNode::Branch(tree)
    }
}

impl<T, A> From<Target<T, A>> for CommandNode<T, A> {
    fn from(target: Target<T, A>) -> Self {
        CommandNode::Leaf(target)
    }
}

/// Ordered command declarations of one level.
#[derive(Debug, Clone)]
pub struct CommandTree<T, A = ()> {
    entries: Vec<(Vec<String>, CommandNode<T, A>)>,
}

impl<T, A> Default for CommandTree<T, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A> CommandTree<T, A> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn command(self, label: &str, node: impl Into<CommandNode<T, A>>) -> Self {
        self.alias([label], node)
    }

    /// Declare a group of equivalent labels.
    #[must_use]
    pub fn alias<I, S>(mut self, labels: I, node: impl Into<CommandNode<T, A>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .push((labels.into_iter().map(Into::into).collect(), node.into()));
        self
    }

    /// The target used when no further command follows.
    #[must_use]
    pub fn default(self, target: Target<T, A>) -> Self {
        self.command("", target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T, A> From<Target<T, A>> for CommandTree<T, A> {
    fn from(target: Target<T, A>) -> Self {
        CommandTree::new().default(target)
    }
}

/// Normalised entry: every alias label of a group shares one entry.
#[derive(Debug)]
pub struct Entry<T, A> {
    aliases: Arc<[String]>,
    node: Arc<Node<T, A>>,
}

#[derive(Debug)]
enum Node<T, A> {
    Branch(Level<T, A>),
    Leaf(Target<T, A>),
}

/// One level of the normalised tree: a flat label lookup.
#[derive(Debug)]
pub struct Level<T, A> {
    entries: IndexMap<String, Entry<T, A>>,
}

impl<T, A> Level<T, A> {
    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Validated command tree with alias groups expanded into plain labels.
#[derive(Debug)]
pub struct NormalizedTree<T, A = ()> {
    root: Level<T, A>,
}

impl<T: Clone, A> NormalizedTree<T, A> {
    /// Validate and expand a command tree.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A label contains anything but letters, `_` and `-`
    /// - The empty label maps to a subtree
    /// - A label appears twice anywhere in the tree
    pub fn from_tree(tree: &CommandTree<T, A>) -> Result<Self> {
        validate(tree)?;
        Ok(Self {
            root: expand(tree),
        })
    }

    pub fn root(&self) -> &Level<T, A> {
        &self.root
    }

    pub fn walker(&self) -> TreeWalker<'_, T, A> {
        TreeWalker::new(&self.root)
    }
}

impl<T, A> Default for NormalizedTree<T, A> {
    fn default() -> Self {
        Self {
            root: Level {
                entries: IndexMap::new(),
            },
        }
    }
}

fn validate<T, A>(tree: &CommandTree<T, A>) -> Result<()> {
    let mut seen = HashSet::new();
    validate_level(tree, &mut seen)
}

fn validate_level<'a, T, A>(tree: &'a CommandTree<T, A>, seen: &mut HashSet<&'a str>) -> Result<()> {
    let mut has_default = false;

    for (labels, node) in &tree.entries {
        if labels.is_empty() {
            return Err(InvalidCommandLabel(String::new()));
        }

        for label in labels {
            if label.is_empty() {
                if matches!(node, CommandNode::Branch(_)) {
                    return Err(EmptyLabelSubtree);
                }
                if has_default {
                    return Err(DuplicateCommandLabel(String::new()));
                }
                has_default = true;
                continue;
            }

            if !COMMAND_LABEL.is_match(label) {
                return Err(InvalidCommandLabel(label.clone()));
            }

            if !seen.insert(label.as_str()) {
                return Err(DuplicateCommandLabel(label.clone()));
            }
        }

        if let CommandNode::Branch(subtree) = node {
            validate_level(subtree, seen)?;
        }
    }

    Ok(())
}

fn expand<T: Clone, A>(tree: &CommandTree<T, A>) -> Level<T, A> {
    let mut entries = IndexMap::new();

    for (labels, node) in &tree.entries {
        let aliases: Arc<[String]> = labels.clone().into();
        let node = Arc::new(match node {
            CommandNode::Branch(subtree) => Node::Branch(expand(subtree)),
            CommandNode::Leaf(target) => Node::Leaf(target.clone()),
        });

        for label in labels {
            entries.insert(
                label.clone(),
                Entry {
                    aliases: Arc::clone(&aliases),
                    node: Arc::clone(&node),
                },
            );
        }
    }

    Level { entries }
}

/// Outcome of walking the command tree over a token stream.
#[derive(Debug)]
pub struct Walk<T, A = ()> {
    /// Every alias permutation of every matched path prefix.
    pub commands: Vec<String>,
    /// Labels as they were typed.
    pub command_path: Vec<String>,
    pub target: Option<Target<T, A>>,
    pub error: Option<ParseError>,
}

/// Descends one level per matched command token.
pub struct TreeWalker<'p, T, A = ()> {
    level: Option<&'p Level<T, A>>,
    matched: Vec<&'p Entry<T, A>>,
    path: Vec<String>,
    target: Option<&'p Target<T, A>>,
}

impl<'p, T: Clone, A> TreeWalker<'p, T, A> {
    pub fn new(root: &'p Level<T, A>) -> Self {
        Self {
            level: Some(root),
            matched: Vec::new(),
            path: Vec::new(),
            target: None,
        }
    }

    /// Try `token` as a command at the current level.
    ///
    /// Returns `false` when the token is not a command here and should be
    /// treated as a parameter.
    pub fn step(&mut self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }

        let Some(entry) = self.level.and_then(|level| level.entries.get(token)) else {
            return false;
        };

        self.matched.push(entry);
        self.path.push(token.to_string());

        match entry.node.as_ref() {
            Node::Branch(level) => {
                debug!("Descending into command `{}`", self.path.join(" "));
                self.level = Some(level);
            }
            Node::Leaf(target) => {
                debug!("Command `{}` resolved", self.path.join(" "));
                self.target = Some(target);
                self.level = None;
            }
        }

        true
    }

    pub fn finish(self) -> Walk<T, A> {
        let mut target = self.target;
        let mut error = None;

        if let Some(level) = self.level {
            match level.entries.get("").map(|entry| entry.node.as_ref()) {
                Some(Node::Leaf(default)) => target = Some(default),
                // The empty label never maps to a subtree once validated.
                Some(Node::Branch(_)) => {}
                None if level.is_empty() && self.path.is_empty() => {}
                None => {
                    let path = self.path.join(" ");
                    debug!("Incomplete command `{path}`");
                    error = Some(ParseError::IncompleteCommand { path });
                }
            }
        }

        Walk {
            commands: alias_permutations(&self.matched),
            command_path: self.path,
            target: target.cloned(),
            error,
        }
    }
}

/// Expand matched entries into every alias spelling of every path prefix.
fn alias_permutations<T, A>(matched: &[&Entry<T, A>]) -> Vec<String> {
    (1..=matched.len())
        .flat_map(|depth| {
            matched[..depth]
                .iter()
                .map(|entry| entry.aliases.iter().filter(|label| !label.is_empty()))
                .multi_cartesian_product()
                .map(|labels| labels.into_iter().join(" "))
        })
        .collect()
}
