//! Manifest loading: a declarative command tree in YAML or JSON.
//!
//! A manifest is the host-framework side of the boundary for standalone use:
//! it declares the application name and the full command tree, with flags
//! carrying a raw type tag and a typed default. Loading builds the
//! [`Command`] tree through the standard constructors and validates its
//! structure before handing it to the export engine.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use cmdtree_core::{Command, Flag, parse_duration, validate_tree};

/// Errors raised while loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to parse manifest: {0}")]
    Json(#[from] serde_json::Error),
    #[error("flag '{flag}' declares unknown type '{type_tag}'")]
    UnknownFlagType { flag: String, type_tag: String },
    #[error("flag '{flag}' has a default incompatible with type '{type_tag}'")]
    BadDefault { flag: String, type_tag: String },
    #[error("manifest tree is not well-formed: {0}")]
    Structure(String),
}

/// Top-level manifest document.
#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub application: String,
    pub root: CommandSpec,
}

/// One command declaration. Commands are runnable unless stated otherwise.
#[derive(Debug, Deserialize)]
pub struct CommandSpec {
    pub name: String,
    #[serde(default, rename = "use")]
    pub use_line: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub short: String,
    #[serde(default)]
    pub long: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default = "default_true")]
    pub runnable: bool,
    #[serde(default)]
    pub flags: Vec<FlagSpec>,
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
}

/// One flag declaration.
#[derive(Debug, Deserialize)]
pub struct FlagSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub default: serde_json::Value,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub values: Vec<String>,
}

fn default_true() -> bool {
    true
}

/// Loads and validates a manifest file. The format is chosen by extension:
/// `.json` parses as JSON, anything else as YAML.
pub fn load_manifest(path: &Path) -> Result<(String, Command), ManifestError> {
    let raw = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let manifest: Manifest = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&raw)?
    } else {
        serde_yaml::from_str(&raw)?
    };

    let root = build_command(&manifest.root)?;
    let errors = validate_tree(&root);
    if !errors.is_empty() {
        let joined = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ManifestError::Structure(joined));
    }

    Ok((manifest.application, root))
}

fn build_command(spec: &CommandSpec) -> Result<Command, ManifestError> {
    let mut command = Command::new(&spec.name)
        .with_short(&spec.short)
        .with_long(&spec.long)
        .with_example(&spec.example);
    if let Some(use_line) = &spec.use_line {
        command = command.with_use(use_line);
    }
    for alias in &spec.aliases {
        command = command.with_alias(alias);
    }
    if spec.hidden {
        command = command.hide();
    }
    if !spec.runnable {
        command = command.help_topic();
    }
    for flag in &spec.flags {
        command = command.with_flag(build_flag(flag)?);
    }
    for child in &spec.commands {
        command = command.with_child(build_command(child)?);
    }
    Ok(command)
}

fn build_flag(spec: &FlagSpec) -> Result<Flag, ManifestError> {
    let bad_default = || ManifestError::BadDefault {
        flag: spec.name.clone(),
        type_tag: spec.type_tag.clone(),
    };
    let name = spec.name.as_str();
    let usage = spec.usage.as_str();
    let default = &spec.default;

    let mut flag = match spec.type_tag.as_str() {
        "bool" => Flag::bool(name, opt(default.as_bool(), default, false, bad_default)?, usage),
        "int" => Flag::int(name, opt(default.as_i64(), default, 0, bad_default)?, usage),
        "int32" => {
            let wide = opt(default.as_i64(), default, 0, bad_default)?;
            let narrow = i32::try_from(wide).map_err(|_| bad_default())?;
            Flag::int32(name, narrow, usage)
        }
        "int64" => Flag::int64(name, opt(default.as_i64(), default, 0, bad_default)?, usage),
        "float64" => Flag::float64(name, opt(default.as_f64(), default, 0.0, bad_default)?, usage),
        "string" => Flag::string(
            name,
            opt(default.as_str(), default, "", bad_default)?,
            usage,
        ),
        "duration" => {
            let parsed = match default {
                serde_json::Value::Null => Duration::ZERO,
                serde_json::Value::String(text) => parse_duration(text).ok_or_else(bad_default)?,
                _ => return Err(bad_default()),
            };
            Flag::duration(name, parsed, usage)
        }
        "boolSlice" => {
            let items = sequence(default, serde_json::Value::as_bool, bad_default)?;
            Flag::bool_slice(name, &items, usage)
        }
        "intSlice" => {
            let items = sequence(default, serde_json::Value::as_i64, bad_default)?;
            Flag::int_slice(name, &items, usage)
        }
        "stringSlice" => {
            let items = string_sequence(default, bad_default)?;
            let refs: Vec<&str> = items.iter().map(String::as_str).collect();
            Flag::string_slice(name, &refs, usage)
        }
        "stringArray" => {
            let items = string_sequence(default, bad_default)?;
            let refs: Vec<&str> = items.iter().map(String::as_str).collect();
            Flag::string_array(name, &refs, usage)
        }
        _ => {
            return Err(ManifestError::UnknownFlagType {
                flag: spec.name.clone(),
                type_tag: spec.type_tag.clone(),
            });
        }
    };

    if spec.hidden {
        flag = flag.hide();
    }
    if !spec.values.is_empty() {
        let refs: Vec<&str> = spec.values.iter().map(String::as_str).collect();
        flag = flag.with_allowed_values(&refs);
    }
    Ok(flag)
}

/// A missing default falls back; a present default of the wrong shape fails.
fn opt<T>(
    parsed: Option<T>,
    raw: &serde_json::Value,
    fallback: T,
    bad: impl Fn() -> ManifestError,
) -> Result<T, ManifestError> {
    match parsed {
        Some(value) => Ok(value),
        None if raw.is_null() => Ok(fallback),
        None => Err(bad()),
    }
}

fn sequence<T>(
    raw: &serde_json::Value,
    item: impl Fn(&serde_json::Value) -> Option<T>,
    bad: impl Fn() -> ManifestError,
) -> Result<Vec<T>, ManifestError> {
    match raw {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|v| item(v).ok_or_else(&bad))
            .collect::<Result<_, _>>(),
        _ => Err(bad()),
    }
}

fn string_sequence(
    raw: &serde_json::Value,
    bad: impl Fn() -> ManifestError,
) -> Result<Vec<String>, ManifestError> {
    sequence(raw, |v| v.as_str().map(str::to_string), bad)
}
