//! Output formatting for export snapshots.

use cmdtree_core::{CommandNode, ExportSnapshot};

/// Supported output formats.
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
}

/// Formats a snapshot in the requested output format.
pub fn format_snapshot(snapshot: &ExportSnapshot, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(snapshot)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(snapshot).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(snapshot_to_markdown(snapshot)),
    }
}

fn snapshot_to_markdown(snapshot: &ExportSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", snapshot.application_name));
    out.push_str(&format!("Generated: {}\n\n", snapshot.generated_at));
    node_to_markdown(&snapshot.root, &snapshot.root.name, &mut out);
    out
}

fn node_to_markdown(node: &CommandNode, path: &str, out: &mut String) {
    out.push_str(&format!("## {path}\n\n"));

    if !node.short.is_empty() {
        out.push_str(&format!("{}\n\n", node.short));
    }
    if !node.example.is_empty() {
        out.push_str(&format!("```\n{}\n```\n\n", node.example));
    }

    if !node.options.is_empty() {
        out.push_str("| Option | Type | Default | Description |\n");
        out.push_str("|--------|------|---------|-------------|\n");
        for option in &node.options {
            out.push_str(&format!(
                "| `{}` | `{}` | `{}` | {} |\n",
                option.name, option.canonical_type, option.default, option.description
            ));
        }
        out.push('\n');
    }

    for child in &node.commands {
        node_to_markdown(child, &format!("{path} {}", child.name), out);
    }
}
