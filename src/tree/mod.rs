//! Command tree model
//!
//! The completion engine never owns the CLI's command definitions; it reads an
//! immutable snapshot of them. [`CommandTree::from_clap`] converts a
//! `clap::Command` hierarchy into that snapshot: every node knows its full path,
//! its local and inherited flags, its children in declaration order and the
//! arity of its positional arguments.
//!
//! Nothing in this module is mutated after construction. Per-request flag
//! state lives in [`FlagProbe`], produced by the walker.

mod walker;

pub use walker::{FlagProbe, Walk};

use std::sync::Arc;

use clap::ArgAction;

/// Value-type category of a flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// Boolean switch, takes no value
    Bool,
    /// Repeat counter (`-vvv`), takes no value
    Count,
    /// Single value
    Value,
    /// Value that may be given several times
    MultiValue,
}

impl FlagKind {
    /// Whether the flag consumes the following token as its value
    pub fn takes_value(&self) -> bool {
        matches!(self, FlagKind::Value | FlagKind::MultiValue)
    }

    /// Whether the flag may meaningfully appear more than once on a line
    pub fn is_repeatable(&self) -> bool {
        matches!(self, FlagKind::Count | FlagKind::MultiValue)
    }

    fn from_action(action: &ArgAction) -> Self {
        match action {
            ArgAction::SetTrue
            | ArgAction::SetFalse
            | ArgAction::Help
            | ArgAction::HelpShort
            | ArgAction::HelpLong
            | ArgAction::Version => FlagKind::Bool,
            ArgAction::Count => FlagKind::Count,
            ArgAction::Append => FlagKind::MultiValue,
            _ => FlagKind::Value,
        }
    }
}

/// Flag descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    /// Long name without the leading dashes
    pub name: String,
    /// Optional single-character shorthand
    pub short: Option<char>,
    /// Help text
    pub help: String,
    /// Value-type category
    pub kind: FlagKind,
    /// Hidden flags are accepted but never suggested
    pub hidden: bool,
    /// Propagated to every descendant command
    pub global: bool,
    /// Default value, if any
    pub default: Option<String>,
}

impl FlagSpec {
    /// Create a visible, local flag
    pub fn new(name: impl Into<String>, kind: FlagKind) -> Self {
        Self {
            name: name.into(),
            short: None,
            help: String::new(),
            kind,
            hidden: false,
            global: false,
            default: None,
        }
    }

    fn from_arg(arg: &clap::Arg) -> Self {
        let name = arg
            .get_long()
            .map(str::to_string)
            .unwrap_or_else(|| arg.get_id().as_str().to_string());

        Self {
            name,
            short: arg.get_short(),
            help: arg.get_help().map(ToString::to_string).unwrap_or_default(),
            kind: FlagKind::from_action(arg.get_action()),
            hidden: arg.is_hide_set(),
            global: arg.is_global_set(),
            default: arg
                .get_default_values()
                .first()
                .map(|v| v.to_string_lossy().into_owned()),
        }
    }

    /// Whether the flag consumes a value
    pub fn takes_value(&self) -> bool {
        self.kind.takes_value()
    }
}

/// Number of positional arguments a command accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// At most this many positionals
    Exact(usize),
    /// Any number of positionals
    Variadic,
}

impl Arity {
    pub fn is_variadic(&self) -> bool {
        matches!(self, Arity::Variadic)
    }

    fn from_positionals(positionals: &[&clap::Arg]) -> Self {
        let mut count = 0;
        for arg in positionals {
            let max = arg.get_num_args().map(|r| r.max_values()).unwrap_or(1);
            if max == usize::MAX || matches!(arg.get_action(), ArgAction::Append) {
                return Arity::Variadic;
            }
            count += max;
        }
        Arity::Exact(count)
    }
}

/// A node in the command tree
#[derive(Debug)]
pub struct CommandNode {
    name: String,
    about: String,
    path: Vec<String>,
    aliases: Vec<String>,
    hidden: bool,
    local_flags: Vec<FlagSpec>,
    inherited_flags: Vec<FlagSpec>,
    children: Vec<Arc<CommandNode>>,
    arity: Arity,
}

impl CommandNode {
    /// Command name (last path segment)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short description
    pub fn about(&self) -> &str {
        &self.about
    }

    /// Full path from the root, root name included
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Path without the root program name, space separated
    pub fn command_path(&self) -> String {
        self.path[1..].join(" ")
    }

    pub fn is_root(&self) -> bool {
        self.path.len() == 1
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Children in declaration order
    pub fn children(&self) -> &[Arc<CommandNode>] {
        &self.children
    }

    /// Find a direct child by name or alias
    pub fn child(&self, name: &str) -> Option<&Arc<CommandNode>> {
        self.children
            .iter()
            .find(|c| c.name == name || c.aliases.iter().any(|a| a == name))
    }

    pub fn local_flags(&self) -> &[FlagSpec] {
        &self.local_flags
    }

    pub fn inherited_flags(&self) -> &[FlagSpec] {
        &self.inherited_flags
    }

    /// Local flags followed by inherited ones
    pub fn flags(&self) -> impl Iterator<Item = &FlagSpec> {
        self.local_flags.iter().chain(self.inherited_flags.iter())
    }

    /// Look up a flag by long name
    pub fn flag(&self, name: &str) -> Option<&FlagSpec> {
        self.flags().find(|f| f.name == name)
    }

    /// Look up a flag by shorthand
    pub fn flag_by_short(&self, short: char) -> Option<&FlagSpec> {
        self.flags().find(|f| f.short == Some(short))
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    fn from_clap(command: &clap::Command, parent_path: &[String], inherited: &[FlagSpec]) -> Self {
        let mut path = parent_path.to_vec();
        path.push(command.get_name().to_string());

        let mut local_flags = Vec::new();
        let mut positionals = Vec::new();
        for arg in command.get_arguments() {
            if arg.is_positional() {
                positionals.push(arg);
            } else {
                local_flags.push(FlagSpec::from_arg(arg));
            }
        }

        // Local definitions shadow inherited ones of the same name
        let inherited_flags: Vec<FlagSpec> = inherited
            .iter()
            .filter(|f| !local_flags.iter().any(|l| l.name == f.name))
            .cloned()
            .collect();

        let mut propagated = inherited_flags.clone();
        propagated.extend(local_flags.iter().filter(|f| f.global).cloned());

        let children = command
            .get_subcommands()
            .map(|sub| Arc::new(CommandNode::from_clap(sub, &path, &propagated)))
            .collect();

        Self {
            name: command.get_name().to_string(),
            about: command.get_about().map(ToString::to_string).unwrap_or_default(),
            path,
            aliases: command.get_all_aliases().map(str::to_string).collect(),
            hidden: command.is_hide_set(),
            local_flags,
            inherited_flags,
            children,
            arity: Arity::from_positionals(&positionals),
        }
    }
}

/// Immutable command tree
#[derive(Debug, Clone)]
pub struct CommandTree {
    root: Arc<CommandNode>,
}

impl CommandTree {
    /// Snapshot a clap command hierarchy
    pub fn from_clap(command: &clap::Command) -> Self {
        Self {
            root: Arc::new(CommandNode::from_clap(command, &[], &[])),
        }
    }

    pub fn root(&self) -> &Arc<CommandNode> {
        &self.root
    }

    /// Resolve a node from path segments (root name excluded)
    pub fn find<S: AsRef<str>>(&self, segments: &[S]) -> Option<Arc<CommandNode>> {
        let mut node = &self.root;
        for segment in segments {
            node = node.child(segment.as_ref())?;
        }
        Some(Arc::clone(node))
    }

    /// Resolve a node from a space separated command path
    pub fn find_path(&self, command_path: &str) -> Option<Arc<CommandNode>> {
        let segments: Vec<&str> = command_path.split_whitespace().collect();
        self.find(&segments)
    }

    /// Nodes from the root down to the node at `segments`
    pub fn lineage<S: AsRef<str>>(&self, segments: &[S]) -> Option<Vec<Arc<CommandNode>>> {
        let mut nodes = vec![Arc::clone(&self.root)];
        for segment in segments {
            let next = nodes[nodes.len() - 1].child(segment.as_ref())?.clone();
            nodes.push(next);
        }
        Some(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, Command};

    fn sample() -> CommandTree {
        CommandTree::from_clap(
            &Command::new("cloud")
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .global(true)
                        .help("Output format"),
                )
                .subcommand(
                    Command::new("kafka").subcommand(
                        Command::new("cluster")
                            .about("Manage clusters")
                            .subcommand(Command::new("list").alias("ls"))
                            .subcommand(
                                Command::new("describe")
                                    .arg(Arg::new("id"))
                                    .arg(Arg::new("all").long("all").action(ArgAction::SetTrue)),
                            ),
                    ),
                )
                .subcommand(
                    Command::new("secret")
                        .hide(true)
                        .arg(Arg::new("names").num_args(1..)),
                ),
        )
    }

    #[test]
    fn test_paths_and_lookup() {
        let tree = sample();
        let describe = tree.find(&["kafka", "cluster", "describe"]).unwrap();
        assert_eq!(describe.path(), ["cloud", "kafka", "cluster", "describe"]);
        assert_eq!(describe.command_path(), "kafka cluster describe");
        assert!(tree.root().is_root());
        assert!(tree.find(&["kafka", "nope"]).is_none());
        assert_eq!(tree.find_path("kafka cluster").unwrap().about(), "Manage clusters");
    }

    #[test]
    fn test_lineage() {
        let tree = sample();
        let names: Vec<String> = tree
            .lineage(&["kafka", "cluster"])
            .unwrap()
            .iter()
            .map(|n| n.name().to_string())
            .collect();
        assert_eq!(names, ["cloud", "kafka", "cluster"]);
        assert!(tree.lineage(&["nope"]).is_none());
    }

    #[test]
    fn test_alias_resolution() {
        let tree = sample();
        let cluster = tree.find_path("kafka cluster").unwrap();
        assert_eq!(cluster.child("ls").unwrap().name(), "list");
    }

    #[test]
    fn test_global_flags_are_inherited() {
        let tree = sample();
        let describe = tree.find_path("kafka cluster describe").unwrap();
        assert_eq!(describe.local_flags().len(), 1);
        assert_eq!(describe.inherited_flags()[0].name, "output");
        assert_eq!(describe.flag_by_short('o').unwrap().name, "output");
        assert!(tree.root().inherited_flags().is_empty());
    }

    #[test]
    fn test_flag_kinds() {
        let tree = sample();
        let describe = tree.find_path("kafka cluster describe").unwrap();
        assert_eq!(describe.flag("all").unwrap().kind, FlagKind::Bool);
        assert!(!describe.flag("all").unwrap().takes_value());
        assert!(describe.flag("output").unwrap().takes_value());
    }

    #[test]
    fn test_arity() {
        let tree = sample();
        assert_eq!(tree.find_path("kafka cluster describe").unwrap().arity(), Arity::Exact(1));
        assert_eq!(tree.find_path("kafka cluster list").unwrap().arity(), Arity::Exact(0));
        assert!(tree.find_path("secret").unwrap().arity().is_variadic());
        assert!(tree.find_path("secret").unwrap().is_hidden());
    }
}
