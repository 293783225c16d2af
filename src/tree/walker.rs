//! Walks tokenized input down the command tree

use std::sync::Arc;

use super::{CommandNode, CommandTree, FlagSpec};

/// Flags observed on the line during one completion request.
///
/// This is a request-local snapshot; the tree's flag definitions are never
/// touched, so probing the same line twice yields the same result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagProbe {
    set: Vec<(String, Vec<String>)>,
    unknown: Vec<String>,
}

impl FlagProbe {
    fn record(&mut self, name: &str, value: Option<String>) {
        let index = match self.set.iter().position(|(n, _)| n == name) {
            Some(index) => index,
            None => {
                self.set.push((name.to_string(), Vec::new()));
                self.set.len() - 1
            }
        };
        if let Some(value) = value {
            self.set[index].1.push(value);
        }
    }

    /// Whether the flag appeared on the line
    pub fn is_set(&self, name: &str) -> bool {
        self.set.iter().any(|(n, _)| n == name)
    }

    /// Values given to the flag, in line order
    pub fn values(&self, name: &str) -> &[String] {
        self.set
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    /// Flag tokens the matched commands do not define
    pub fn unknown(&self) -> &[String] {
        &self.unknown
    }
}

/// Result of resolving a token sequence against the tree
#[derive(Debug, Clone)]
pub struct Walk {
    /// Nodes from the root to the deepest matched command
    pub lineage: Vec<Arc<CommandNode>>,
    /// Positional tokens that did not match a subcommand
    pub residual: Vec<String>,
    /// Flags seen along the way
    pub probe: FlagProbe,
    /// Value-taking flag that ends the token sequence without its value
    pub pending_flag: Option<FlagSpec>,
}

impl Walk {
    /// Deepest matched node
    pub fn node(&self) -> &Arc<CommandNode> {
        // lineage always starts with the root
        &self.lineage[self.lineage.len() - 1]
    }

    /// Parent of the deepest matched node, None at the root
    pub fn parent(&self) -> Option<&Arc<CommandNode>> {
        self.lineage.len().checked_sub(2).map(|i| &self.lineage[i])
    }
}

enum FlagRef<'a> {
    Long(&'a str),
    Short(char),
}

/// Split `--name[=value]` or `-c[value]` into its flag reference and inline value
fn split_flag(token: &str) -> Option<(FlagRef<'_>, Option<&str>)> {
    if let Some(long) = token.strip_prefix("--") {
        if long.is_empty() {
            return None;
        }
        return Some(match long.split_once('=') {
            Some((name, value)) => (FlagRef::Long(name), Some(value)),
            None => (FlagRef::Long(long), None),
        });
    }

    let short = token.strip_prefix('-')?;
    let mut chars = short.chars();
    let c = chars.next()?;
    let rest = chars.as_str();
    let inline = match rest.strip_prefix('=') {
        Some(value) => Some(value),
        None if rest.is_empty() => None,
        None => Some(rest),
    };
    Some((FlagRef::Short(c), inline))
}

impl CommandTree {
    /// Resolve tokens to the deepest command they name.
    ///
    /// Subcommand names are only followed while no positional argument has
    /// been seen; flags are skipped together with the value of value-taking
    /// flags, and everything after `--` is positional.
    pub fn walk<S: AsRef<str>>(&self, tokens: &[S]) -> Walk {
        let mut current = Arc::clone(self.root());
        let mut lineage = vec![Arc::clone(&current)];
        let mut residual: Vec<String> = Vec::new();
        let mut probe = FlagProbe::default();
        let mut pending_flag = None;
        let mut positional_only = false;

        let mut tokens = tokens.iter().map(AsRef::as_ref);
        while let Some(token) = tokens.next() {
            pending_flag = None;

            if positional_only {
                residual.push(token.to_string());
                continue;
            }
            if token == "--" {
                positional_only = true;
                continue;
            }

            if let Some((flag_ref, inline)) = split_flag(token) {
                let flag = match flag_ref {
                    FlagRef::Long(name) => current.flag(name),
                    FlagRef::Short(c) => current.flag_by_short(c),
                };
                match flag {
                    Some(flag) if flag.takes_value() && inline.is_none() => match tokens.next() {
                        Some(value) => probe.record(&flag.name, Some(value.to_string())),
                        None => {
                            probe.record(&flag.name, None);
                            pending_flag = Some(flag.clone());
                        }
                    },
                    Some(flag) => probe.record(&flag.name, inline.map(str::to_string)),
                    None => probe.unknown.push(token.to_string()),
                }
                continue;
            }

            if residual.is_empty() {
                if let Some(child) = current.child(token).cloned() {
                    lineage.push(Arc::clone(&child));
                    current = child;
                    continue;
                }
            }
            residual.push(token.to_string());
        }

        Walk {
            lineage,
            residual,
            probe,
            pending_flag,
        }
    }
}
