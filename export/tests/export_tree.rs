//! End-to-end export scenarios over a realistic command tree.

use std::time::Duration;

use serde_json::json;

use cmdtree_core::{Command, Flag, validate_tree};
use cmdtree_export::{AccessorRegistry, export_snapshot, walk};

/// A tree shaped like a small real CLI: global flags on the root, a couple
/// of leaf commands, a grouping command, and some noise that must not export.
fn sample_tree() -> Command {
    Command::new("mycli")
        .with_use("mycli [command]")
        .with_short("A demonstration CLI")
        .with_flag(Flag::bool("verbose", false, "Enable verbose output"))
        .with_flag(Flag::duration("server.timeout", Duration::from_secs(30), "Request timeout"))
        .with_child(
            Command::new("serve")
                .with_use("serve [flags]")
                .with_alias("s")
                .with_short("Run the HTTP server")
                .with_flag(Flag::int("port", 8080, "Listen port"))
                .with_flag(Flag::string_slice("server.hosts", &["localhost"], "Bind hosts")),
        )
        .with_child(
            Command::new("remote")
                .with_short("Manage remotes")
                .help_topic()
                .with_child(
                    Command::new("add")
                        .with_flag(Flag::string("name", "", "Remote name"))
                        .with_flag(Flag::bool("fetch", true, "Fetch after adding")),
                ),
        )
        .with_child(Command::new("debug-dump").hide())
        .with_child(Command::new("licensing").help_topic())
}

#[test]
fn test_full_export_shape() {
    let tree = sample_tree();
    assert!(validate_tree(&tree).is_empty());

    let outcome = export_snapshot(
        "mycli",
        "2026-01-01T00:00:00Z",
        &tree,
        &AccessorRegistry::standard(),
    )
    .unwrap();
    assert!(outcome.pruned.is_empty());

    let root = &outcome.snapshot.root;
    assert_eq!(root.name, "mycli");
    assert_eq!(root.options.len(), 2);
    assert_eq!(root.options[1].section, "server");
    assert_eq!(root.options[1].canonical_type, "duration");

    // hidden and pure-help-topic children are fully absent
    let names: Vec<&str> = root.commands.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["serve", "remote"]);

    // `remote` is a non-runnable group kept because `add` is runnable
    let remote = &root.commands[1];
    assert_eq!(remote.commands.len(), 1);
    assert_eq!(remote.commands[0].name, "add");
    assert_eq!(remote.commands[0].parent_name, "remote");
}

#[test]
fn test_exported_json_field_names() {
    let tree = sample_tree();
    let outcome = export_snapshot(
        "mycli",
        "2026-01-01T00:00:00Z",
        &tree,
        &AccessorRegistry::standard(),
    )
    .unwrap();

    let value = serde_json::to_value(&outcome.snapshot).unwrap();
    assert_eq!(value["application_name"], "mycli");
    assert_eq!(value["root"]["use"], "mycli [command]");

    let serve = &value["root"]["commands"][0];
    assert_eq!(serve["name"], "serve");
    assert_eq!(serve["aliases"], json!(["s"]));
    assert_eq!(serve["options"][0]["name"], "port");
    assert_eq!(serve["options"][0]["type"], "int");
    assert_eq!(serve["options"][0]["default"], json!(8080));
    assert_eq!(serve["options"][1]["section"], "server");
    assert_eq!(serve["options"][1]["type"], "[]string");
    assert_eq!(serve["options"][1]["default"], json!(["localhost"]));

    // duration defaults export as integer nanoseconds
    assert_eq!(
        value["root"]["options"][1]["default"],
        json!(30_000_000_000u64)
    );
}

#[test]
fn test_snapshot_detached_from_live_tree() {
    let registry = AccessorRegistry::standard();
    let tree = sample_tree();
    let first = export_snapshot("mycli", "t", &tree, &registry).unwrap();

    // Rebuilding a different tree afterwards must not affect the snapshot.
    let _other = Command::new("other").with_flag(Flag::bool("x", true, ""));
    let second = export_snapshot("mycli", "t", &tree, &registry).unwrap();
    assert_eq!(first.snapshot, second.snapshot);
}

#[test]
fn test_broken_branch_reported_not_embedded() {
    #[derive(Debug)]
    struct Color;
    impl cmdtree_core::FlagValue for Color {
        fn type_tag(&self) -> &str {
            "color"
        }
        fn render(&self) -> String {
            "#112233".to_string()
        }
    }

    let tree = Command::new("root")
        .with_child(
            Command::new("themes")
                .with_flag(Flag::custom("accent", "Accent color", Color))
                .with_child(Command::new("list")),
        )
        .with_child(Command::new("serve").with_flag(Flag::int("port", 80, "")));

    let report = walk(&tree, &AccessorRegistry::standard()).unwrap();
    let names: Vec<&str> = report.root.commands.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["serve"]);

    assert_eq!(report.pruned.len(), 1);
    let failure = &report.pruned[0];
    assert_eq!(failure.path, "root themes");
    assert_eq!(failure.error.failures.len(), 1);
    assert_eq!(failure.error.failures[0].option, "accent");
    assert!(failure.error.detail().contains("color"));
}

#[test]
fn test_registered_custom_kind_exports() {
    #[derive(Debug)]
    struct Color;
    impl cmdtree_core::FlagValue for Color {
        fn type_tag(&self) -> &str {
            "color"
        }
        fn render(&self) -> String {
            "#112233".to_string()
        }
    }

    let mut registry = AccessorRegistry::standard();
    registry.register("color", |h: &cmdtree_core::ValueHolder<'_>, n: &str| {
        h.raw_text(n).map(serde_json::Value::from)
    });

    let tree = Command::new("root").with_flag(Flag::custom("accent", "Accent color", Color));
    let report = walk(&tree, &registry).unwrap();
    assert_eq!(report.root.options[0].default, json!("#112233"));
    assert_eq!(report.root.options[0].canonical_type, "color");
}
