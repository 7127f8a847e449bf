//! Recursive command-tree traversal.
//!
//! Depth-first, synchronous, no shared mutable state: each walk is a pure
//! function of the tree it is handed and may run concurrently with other
//! walks of the same (unmutated) tree. There is no caching and no
//! cancellation checkpoint; callers needing timeouts impose them at the
//! transport layer.
//!
//! The tree is assumed finite and acyclic. That is the host framework's
//! contract (see [`cmdtree_core::validate_tree`]), not something the walker
//! defends against.

use cmdtree_core::{Command, CommandNode};

use crate::describe::describe;
use crate::error::{AggregateError, OptionFailure};
use crate::registry::AccessorRegistry;

/// Result of a successful walk: the root node plus every subtree that was
/// dropped because its own options failed to describe.
#[derive(Debug)]
pub struct WalkReport {
    /// The described tree.
    pub root: CommandNode,
    /// Subtrees dropped during the walk, with their command paths. A broken
    /// branch never hides its siblings.
    pub pruned: Vec<BranchFailure>,
}

/// One dropped subtree.
#[derive(Debug)]
pub struct BranchFailure {
    /// Space-joined command path from the root (e.g. `"mycli remote add"`).
    pub path: String,
    /// Why the subtree's node failed.
    pub error: AggregateError,
}

/// Walks a command tree into a detached [`CommandNode`] tree.
///
/// Per command, every option is described in declaration order; if any option
/// fails, the whole node fails as a unit with an [`AggregateError`] listing
/// each failing option; already-computed fields are discarded. Children are
/// visited in declaration order, skipping unavailable commands and pure
/// help-topic placeholders entirely (their descendants are never visited). A
/// failing *child* walk does not abort the parent: the subtree is dropped,
/// logged, and reported in [`WalkReport::pruned`].
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Command, Flag};
/// use cmdtree_export::{AccessorRegistry, walk};
///
/// let tree = Command::new("mycli")
///     .with_flag(Flag::bool("verbose", false, "Verbose output"))
///     .with_child(Command::new("serve").with_flag(Flag::int("port", 8080, "Listen port")));
///
/// let report = walk(&tree, &AccessorRegistry::standard()).unwrap();
/// assert_eq!(report.root.commands[0].name, "serve");
/// assert!(report.pruned.is_empty());
/// ```
pub fn walk(command: &Command, registry: &AccessorRegistry) -> Result<WalkReport, AggregateError> {
    let mut pruned = Vec::new();
    let root = walk_node(command, None, command.name(), registry, &mut pruned)?;
    Ok(WalkReport { root, pruned })
}

fn walk_node(
    command: &Command,
    parent: Option<&Command>,
    path: &str,
    registry: &AccessorRegistry,
    pruned: &mut Vec<BranchFailure>,
) -> Result<CommandNode, AggregateError> {
    let mut options = Vec::new();
    let mut failures = Vec::new();
    for flag in command.flags() {
        match describe(flag, registry) {
            Ok(descriptor) => options.push(descriptor),
            Err(cause) => failures.push(OptionFailure {
                option: flag.name().to_string(),
                cause,
            }),
        }
    }
    if !failures.is_empty() {
        return Err(AggregateError {
            command: command.name().to_string(),
            failures,
        });
    }

    let mut children = Vec::new();
    for child in command.children() {
        if !child.is_available() || child.is_help_topic() {
            tracing::debug!(command = child.name(), "Skipping unavailable or help-topic command");
            continue;
        }
        let child_path = format!("{path} {}", child.name());
        match walk_node(child, Some(command), &child_path, registry, pruned) {
            Ok(node) => children.push(node),
            Err(error) => {
                tracing::warn!(command = %child_path, error = %error, "Dropping broken command subtree");
                pruned.push(BranchFailure {
                    path: child_path,
                    error,
                });
            }
        }
    }

    Ok(CommandNode {
        name: command.name().to_string(),
        use_line: command.use_line().to_string(),
        aliases: command.aliases().to_vec(),
        short: command.short().to_string(),
        long: command.long().to_string(),
        example: command.example().to_string(),
        hidden: command.hidden(),
        available: command.is_available(),
        has_parent: parent.is_some(),
        parent_name: parent.map(|p| p.name().to_string()).unwrap_or_default(),
        parent_use: parent.map(|p| p.use_line().to_string()).unwrap_or_default(),
        options,
        commands: children,
    })
}
