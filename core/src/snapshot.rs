//! Detached export data model.
//!
//! These types are what an export produces: plain value trees with no
//! back-references to the live [`Command`](crate::Command) tree, safe to
//! serialize and hand to a renderer long after the walk finished. They are
//! built fresh on every export and never mutated afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version of the export contract (semver).
pub const EXPORT_CONTRACT_VERSION: &str = "1.0.0";

/// Normalized description of one option.
///
/// `name` is preserved verbatim, dots included, so consumers can reconstruct
/// grouping; `section` is the substring before the first dot (empty when the
/// name has none). `default` is never omitted: an accessor that produced no
/// usable value serializes as `null`.
///
/// # Examples
///
/// ```
/// use cmdtree_core::OptionDescriptor;
///
/// let descriptor = OptionDescriptor {
///     name: "server.timeout".to_string(),
///     default: serde_json::json!(30_000_000_000u64),
///     description: "Request timeout".to_string(),
///     hidden: false,
///     section: "server".to_string(),
///     canonical_type: "duration".to_string(),
///     values: Vec::new(),
/// };
/// let json = serde_json::to_value(&descriptor).unwrap();
/// assert_eq!(json["type"], "duration");
/// assert_eq!(json["section"], "server");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDescriptor {
    pub name: String,
    pub default: Value,
    pub description: String,
    pub hidden: bool,
    pub section: String,
    #[serde(rename = "type")]
    pub canonical_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

/// Description of one command and its subtree.
///
/// Parent linkage is carried by value (`parent_name`, `parent_use`) rather
/// than by reference; the snapshot is an acyclic value tree. Child ordering
/// matches the host tree's declaration order, and option names are not
/// de-duplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandNode {
    pub name: String,
    #[serde(rename = "use")]
    pub use_line: String,
    pub aliases: Vec<String>,
    pub short: String,
    pub long: String,
    pub example: String,
    pub hidden: bool,
    pub available: bool,
    pub has_parent: bool,
    pub parent_name: String,
    pub parent_use: String,
    pub options: Vec<OptionDescriptor>,
    pub commands: Vec<CommandNode>,
}

/// Root wrapper for one export invocation.
///
/// Fully self-contained; `generated_at` is supplied by the caller so the
/// walk itself stays deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSnapshot {
    /// Export contract version (populated from [`EXPORT_CONTRACT_VERSION`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_version: Option<String>,
    pub application_name: String,
    /// ISO-8601 timestamp of the export.
    pub generated_at: String,
    pub root: CommandNode,
}

impl ExportSnapshot {
    /// Wraps a walked root node with application metadata.
    pub fn new(application_name: &str, generated_at: &str, root: CommandNode) -> Self {
        Self {
            contract_version: Some(EXPORT_CONTRACT_VERSION.to_string()),
            application_name: application_name.to_string(),
            generated_at: generated_at.to_string(),
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_node() -> CommandNode {
        CommandNode {
            name: "serve".to_string(),
            use_line: "serve [flags]".to_string(),
            aliases: vec!["s".to_string()],
            short: "Run the server".to_string(),
            long: String::new(),
            example: String::new(),
            hidden: false,
            available: true,
            has_parent: true,
            parent_name: "mycli".to_string(),
            parent_use: "mycli [command]".to_string(),
            options: vec![OptionDescriptor {
                name: "port".to_string(),
                default: Value::from(8080),
                description: "Listen port".to_string(),
                hidden: false,
                section: String::new(),
                canonical_type: "int".to_string(),
                values: Vec::new(),
            }],
            commands: Vec::new(),
        }
    }

    #[test]
    fn test_use_field_renamed() {
        let json = serde_json::to_value(sample_node()).unwrap();
        assert_eq!(json["use"], "serve [flags]");
        assert!(json.get("use_line").is_none());
    }

    #[test]
    fn test_empty_values_omitted() {
        let json = serde_json::to_value(sample_node()).unwrap();
        assert!(json["options"][0].get("values").is_none());
    }

    #[test]
    fn test_null_default_serialized_not_omitted() {
        let mut node = sample_node();
        node.options[0].default = Value::Null;
        let json = serde_json::to_value(node).unwrap();
        assert!(json["options"][0]["default"].is_null());
        assert!(json["options"][0].as_object().unwrap().contains_key("default"));
    }

    #[test]
    fn test_snapshot_round_trips() {
        let snapshot = ExportSnapshot::new("mycli", "2026-01-01T00:00:00Z", sample_node());
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: ExportSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
