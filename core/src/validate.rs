//! Structural validation of built command trees.
//!
//! The export engine assumes the host tree is well-formed: finite, acyclic,
//! with unique names per scope. These checks catch violations at build time,
//! before a walk would either misbehave or recurse forever.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::{Command, Flag, validate_tree};
//!
//! let tree = Command::new("mycli")
//!     .with_flag(Flag::bool("verbose", false, "Verbose output"))
//!     .with_child(Command::new("serve"));
//! assert!(validate_tree(&tree).is_empty());
//!
//! // Duplicate child name in one scope
//! let bad = Command::new("mycli")
//!     .with_child(Command::new("serve"))
//!     .with_child(Command::new("serve"));
//! assert!(!validate_tree(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::Command;

/// Structural problems in a host command tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// Flag name is empty or whitespace-only.
    #[error("flag name cannot be empty on command '{0}'")]
    EmptyFlagName(String),
    /// Two children in the same scope share a name.
    #[error("duplicate child command in scope: {0}")]
    DuplicateChild(String),
    /// Two flags on the same command share a name.
    #[error("duplicate flag '{flag}' on command '{command}'")]
    DuplicateFlag { command: String, flag: String },
    /// A child path repeats an ancestor name (e.g. `git remote git`).
    #[error("command name cycle detected at path: {0}")]
    CommandCycle(String),
}

/// Validates a full command tree, stopping at the first failing scope.
pub fn validate_tree(root: &Command) -> Vec<TreeError> {
    let mut errors = Vec::new();

    if root.name().trim().is_empty() {
        errors.push(TreeError::EmptyCommandName);
        return errors;
    }

    errors.extend(validate_flags(root));
    if !errors.is_empty() {
        return errors;
    }

    let mut path = vec![root.name().to_string()];
    errors.extend(validate_children(root.children(), &mut path));

    errors
}

fn validate_children(children: &[Command], path: &mut Vec<String>) -> Vec<TreeError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for child in children {
        let name = child.name().trim();
        if name.is_empty() {
            errors.push(TreeError::EmptyCommandName);
            return errors;
        }

        if !seen.insert(name) {
            errors.push(TreeError::DuplicateChild(name.to_string()));
            return errors;
        }

        if path.iter().any(|segment| segment == name) {
            let cycle_path = path
                .iter()
                .cloned()
                .chain(std::iter::once(name.to_string()))
                .collect::<Vec<_>>()
                .join(" ");
            errors.push(TreeError::CommandCycle(cycle_path));
            return errors;
        }

        errors.extend(validate_flags(child));
        if !errors.is_empty() {
            return errors;
        }

        path.push(name.to_string());
        errors.extend(validate_children(child.children(), path));
        path.pop();
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn validate_flags(command: &Command) -> Vec<TreeError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for flag in command.flags() {
        if flag.name().trim().is_empty() {
            errors.push(TreeError::EmptyFlagName(command.name().to_string()));
            return errors;
        }
        if !seen.insert(flag.name()) {
            errors.push(TreeError::DuplicateFlag {
                command: command.name().to_string(),
                flag: flag.name().to_string(),
            });
            return errors;
        }
    }

    errors
}
