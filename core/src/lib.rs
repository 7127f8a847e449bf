//! Command-tree model and export data types.
//!
//! This crate defines both sides of the introspection boundary:
//!
//! - The **host model** the export engine reads: [`Command`] (one node of the
//!   application's command hierarchy), [`Flag`] (a named, typed option), the
//!   open-ended [`FlagValue`] trait, and the single-option [`ValueHolder`]
//!   typed reads go through.
//! - The **detached output model** an export produces: [`OptionDescriptor`],
//!   [`CommandNode`], and [`ExportSnapshot`], plain serializable value trees
//!   with parent identity carried by value, never by reference.
//!
//! Structural validation ([`validate_tree`]) catches empty names, duplicate
//! names in one scope, and name cycles before a walk sees them.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::{Command, Flag, validate_tree};
//!
//! let tree = Command::new("mycli")
//!     .with_use("mycli [command]")
//!     .with_short("A demonstration CLI")
//!     .with_flag(Flag::bool("verbose", false, "Enable verbose output"))
//!     .with_child(
//!         Command::new("serve")
//!             .with_flag(Flag::int("port", 8080, "Listen port"))
//!             .with_flag(Flag::string("server.mode", "fast", "Server mode")),
//!     );
//!
//! assert!(validate_tree(&tree).is_empty());
//! assert_eq!(tree.children()[0].flags()[1].name(), "server.mode");
//! ```

mod command;
mod flag;
mod snapshot;
mod validate;

pub use command::Command;
pub use flag::{Flag, FlagError, FlagValue, ValueHolder, format_duration, parse_duration};
pub use snapshot::{CommandNode, EXPORT_CONTRACT_VERSION, ExportSnapshot, OptionDescriptor};
pub use validate::{TreeError, validate_tree};
