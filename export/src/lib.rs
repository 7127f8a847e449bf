//! Introspection engine: command tree in, normalized snapshot out.
//!
//! The engine walks a host [`Command`](cmdtree_core::Command) tree and
//! produces a detached, JSON-serializable
//! [`ExportSnapshot`](cmdtree_core::ExportSnapshot) for an external renderer.
//! Its pieces, leaf-first:
//!
//! - [`normalize`]: maps raw option-type tags to the canonical vocabulary
//!   (`boolSlice` → `[]bool`), passing unrecognized tags through.
//! - [`AccessorRegistry`]: raw tag → typed default-value reader; the single
//!   place a new option kind is wired in.
//! - [`describe`]: one flag → one [`OptionDescriptor`], all-or-nothing.
//! - [`walk`]: depth-first traversal with availability filtering, parent
//!   identity threaded down by value, and broken-branch isolation.
//!
//! Each export re-walks the tree from scratch: no caching, no memoization,
//! no ambient state. Two concurrent exports of the same unmutated tree are
//! safe and yield equal results.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::{Command, Flag};
//! use cmdtree_export::{AccessorRegistry, export_snapshot};
//!
//! let tree = Command::new("mycli")
//!     .with_flag(Flag::bool("verbose", false, "Enable verbose output"))
//!     .with_child(Command::new("serve").with_flag(Flag::int("port", 8080, "Listen port")));
//!
//! let outcome = export_snapshot(
//!     "mycli",
//!     "2026-01-01T00:00:00Z",
//!     &tree,
//!     &AccessorRegistry::standard(),
//! )
//! .unwrap();
//! assert_eq!(outcome.snapshot.root.commands[0].options[0].name, "port");
//! ```

mod describe;
mod error;
mod normalize;
pub mod output;
mod registry;
mod walk;

pub use describe::describe;
pub use error::{AggregateError, DescribeError, OptionFailure};
pub use normalize::normalize;
pub use registry::{Accessor, AccessorRegistry};
pub use walk::{BranchFailure, WalkReport, walk};

use cmdtree_core::{Command, ExportSnapshot};

/// A finished export: the snapshot plus any subtrees dropped on the way.
#[derive(Debug)]
pub struct ExportOutcome {
    /// The detached snapshot.
    pub snapshot: ExportSnapshot,
    /// Subtrees dropped because their options failed to describe.
    pub pruned: Vec<BranchFailure>,
}

/// Walks `root` and wraps the result with application metadata.
///
/// Pure function of its arguments: `generated_at` is caller-supplied (an
/// ISO-8601 string) so the engine itself reads no clock and no ambient
/// state. Fails only when the root command's own options fail to describe.
pub fn export_snapshot(
    application_name: &str,
    generated_at: &str,
    root: &Command,
    registry: &AccessorRegistry,
) -> Result<ExportOutcome, AggregateError> {
    let report = walk(root, registry)?;
    Ok(ExportOutcome {
        snapshot: ExportSnapshot::new(application_name, generated_at, report.root),
        pruned: report.pruned,
    })
}
