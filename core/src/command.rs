//! Host command-tree model.
//!
//! A [`Command`] is one node of the hierarchical application being described:
//! a name, a use line, descriptive text, an ordered flag list, and an ordered
//! child list. The tree is built once at startup and treated as immutable
//! afterwards; the export engine only ever reads it.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::{Command, Flag};
//!
//! let root = Command::new("mycli")
//!     .with_use("mycli [command]")
//!     .with_short("A demonstration CLI")
//!     .with_flag(Flag::bool("verbose", false, "Enable verbose output"))
//!     .with_child(Command::new("serve").with_short("Run the server"));
//!
//! assert!(root.is_available());
//! assert_eq!(root.children().len(), 1);
//! ```

use crate::Flag;

/// One node of the host command tree.
///
/// New commands are runnable by default; mark pure documentation entries with
/// [`help_topic`](Command::help_topic) so the export engine skips them.
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    use_line: String,
    aliases: Vec<String>,
    short: String,
    long: String,
    example: String,
    hidden: bool,
    runnable: bool,
    flags: Vec<Flag>,
    children: Vec<Command>,
}

impl Command {
    /// Creates a runnable command. The use line defaults to the name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            use_line: name.to_string(),
            aliases: Vec::new(),
            short: String::new(),
            long: String::new(),
            example: String::new(),
            hidden: false,
            runnable: true,
            flags: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets the use line (e.g. `"serve [flags]"`).
    pub fn with_use(mut self, use_line: &str) -> Self {
        self.use_line = use_line.to_string();
        self
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Sets the short description.
    pub fn with_short(mut self, short: &str) -> Self {
        self.short = short.to_string();
        self
    }

    /// Sets the long description.
    pub fn with_long(mut self, long: &str) -> Self {
        self.long = long.to_string();
        self
    }

    /// Sets the example text.
    pub fn with_example(mut self, example: &str) -> Self {
        self.example = example.to_string();
        self
    }

    /// Hides the command from user-facing listings.
    pub fn hide(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Marks the command as a pure help topic with no executable behavior.
    pub fn help_topic(mut self) -> Self {
        self.runnable = false;
        self
    }

    /// Appends a flag, preserving declaration order.
    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    /// Appends a child command, preserving declaration order.
    pub fn with_child(mut self, child: Command) -> Self {
        self.children.push(child);
        self
    }

    /// Command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared use line.
    pub fn use_line(&self) -> &str {
        &self.use_line
    }

    /// Aliases, in declaration order.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Short description.
    pub fn short(&self) -> &str {
        &self.short
    }

    /// Long description.
    pub fn long(&self) -> &str {
        &self.long
    }

    /// Example text.
    pub fn example(&self) -> &str {
        &self.example
    }

    /// Whether the command is hidden.
    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// Whether the command has executable behavior of its own.
    pub fn runnable(&self) -> bool {
        self.runnable
    }

    /// Declared flags, in declaration order.
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    /// Child commands, in declaration order.
    pub fn children(&self) -> &[Command] {
        &self.children
    }

    /// Whether the command shows up for users: not hidden, and either
    /// runnable itself or the ancestor of something runnable.
    pub fn is_available(&self) -> bool {
        if self.hidden {
            return false;
        }
        self.runnable || self.children.iter().any(Command::is_available)
    }

    /// Whether the command is a pure help-topic placeholder: nothing in its
    /// subtree is runnable.
    pub fn is_help_topic(&self) -> bool {
        !self.runnable && self.children.iter().all(Command::is_help_topic)
    }
}
