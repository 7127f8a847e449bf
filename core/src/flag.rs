//! Flag model for the host command tree.
//!
//! A [`Flag`] is a named, typed option declared on a [`Command`](crate::Command).
//! Its declared default lives behind the [`FlagValue`] trait, which exposes a
//! raw type tag (an open-ended string such as `"bool"` or `"stringSlice"`)
//! and a textual rendering of the value. Typed reads go through a
//! [`ValueHolder`], which is seeded with exactly one flag so a reader can
//! never observe a neighboring option.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::{Flag, ValueHolder};
//!
//! let flag = Flag::bool("verbose", false, "Enable verbose output");
//! let holder = ValueHolder::single(&flag);
//! assert_eq!(holder.get_bool("verbose"), Ok(false));
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Errors produced by typed value reads on a [`ValueHolder`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// The requested flag is not the one this holder was seeded with.
    #[error("flag '{0}' is not present in this holder")]
    UnknownFlag(String),
    /// The flag's raw type tag does not match the requested accessor.
    #[error("flag '{flag}' has type '{actual}', not '{requested}'")]
    TypeMismatch {
        flag: String,
        requested: String,
        actual: String,
    },
    /// The flag's textual value could not be parsed as the declared type.
    #[error("flag '{flag}' holds malformed {kind} value '{text}'")]
    Malformed {
        flag: String,
        kind: String,
        text: String,
    },
}

/// A declared default value with its raw type tag.
///
/// Host frameworks declare option values through this trait. The standard
/// constructors on [`Flag`] cover the common vocabulary; implement it
/// directly to introduce a new option kind (and register a matching accessor
/// with the export engine).
pub trait FlagValue: fmt::Debug + Send + Sync {
    /// Raw type tag as declared by the host framework (e.g. `"duration"`).
    fn type_tag(&self) -> &str;
    /// Textual rendering of the value. Sequences render as `[a,b,c]`,
    /// double-quoting elements that are empty or contain `,`, `"`, or `\`.
    fn render(&self) -> String;
}

/// Standard text-backed value used by the typed [`Flag`] constructors.
#[derive(Debug, Clone)]
struct TextValue {
    tag: String,
    text: String,
}

impl FlagValue for TextValue {
    fn type_tag(&self) -> &str {
        &self.tag
    }

    fn render(&self) -> String {
        self.text.clone()
    }
}

/// A named, typed option declared on a command.
///
/// The name is kept verbatim, dots included; grouping metadata is derived
/// from it downstream, never stored here.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cmdtree_core::Flag;
///
/// let flag = Flag::duration("server.timeout", Duration::from_secs(30), "Request timeout")
///     .hide();
/// assert_eq!(flag.name(), "server.timeout");
/// assert_eq!(flag.type_tag(), "duration");
/// assert!(flag.hidden());
/// ```
#[derive(Debug, Clone)]
pub struct Flag {
    name: String,
    usage: String,
    hidden: bool,
    allowed: Vec<String>,
    value: Arc<dyn FlagValue>,
}

impl Flag {
    fn text(name: &str, usage: &str, tag: &str, text: String) -> Self {
        Self::custom(
            name,
            usage,
            TextValue {
                tag: tag.to_string(),
                text,
            },
        )
    }

    /// Creates a flag with a caller-supplied [`FlagValue`] implementation.
    pub fn custom(name: &str, usage: &str, value: impl FlagValue + 'static) -> Self {
        Self {
            name: name.to_string(),
            usage: usage.to_string(),
            hidden: false,
            allowed: Vec::new(),
            value: Arc::new(value),
        }
    }

    /// Creates a boolean flag.
    pub fn bool(name: &str, default: bool, usage: &str) -> Self {
        Self::text(name, usage, "bool", default.to_string())
    }

    /// Creates an integer flag.
    pub fn int(name: &str, default: i64, usage: &str) -> Self {
        Self::text(name, usage, "int", default.to_string())
    }

    /// Creates a 32-bit integer flag.
    pub fn int32(name: &str, default: i32, usage: &str) -> Self {
        Self::text(name, usage, "int32", default.to_string())
    }

    /// Creates a 64-bit integer flag.
    pub fn int64(name: &str, default: i64, usage: &str) -> Self {
        Self::text(name, usage, "int64", default.to_string())
    }

    /// Creates a floating-point flag.
    pub fn float64(name: &str, default: f64, usage: &str) -> Self {
        Self::text(name, usage, "float64", default.to_string())
    }

    /// Creates a string flag.
    pub fn string(name: &str, default: &str, usage: &str) -> Self {
        Self::text(name, usage, "string", default.to_string())
    }

    /// Creates a duration flag.
    pub fn duration(name: &str, default: Duration, usage: &str) -> Self {
        Self::text(name, usage, "duration", format_duration(default))
    }

    /// Creates a repeated boolean flag.
    pub fn bool_slice(name: &str, default: &[bool], usage: &str) -> Self {
        let items: Vec<String> = default.iter().map(bool::to_string).collect();
        Self::text(name, usage, "boolSlice", render_sequence(&items))
    }

    /// Creates a repeated integer flag.
    pub fn int_slice(name: &str, default: &[i64], usage: &str) -> Self {
        let items: Vec<String> = default.iter().map(i64::to_string).collect();
        Self::text(name, usage, "intSlice", render_sequence(&items))
    }

    /// Creates a repeated string flag.
    pub fn string_slice(name: &str, default: &[&str], usage: &str) -> Self {
        let items: Vec<String> = default.iter().map(|s| s.to_string()).collect();
        Self::text(name, usage, "stringSlice", render_sequence(&items))
    }

    /// Creates a repeated string flag that preserves values verbatim.
    ///
    /// Distinct raw tag from [`string_slice`](Flag::string_slice); the host
    /// framework treats the two as different option kinds.
    pub fn string_array(name: &str, default: &[&str], usage: &str) -> Self {
        let items: Vec<String> = default.iter().map(|s| s.to_string()).collect();
        Self::text(name, usage, "stringArray", render_sequence(&items))
    }

    /// Marks this flag hidden from user-facing listings.
    pub fn hide(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Restricts the flag to an enumerated set of values.
    pub fn with_allowed_values(mut self, values: &[&str]) -> Self {
        self.allowed = values.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Flag name, verbatim as declared (dots included).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Usage/help string.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Whether the flag is hidden.
    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// Enumerated allowed values, empty when unrestricted.
    pub fn allowed_values(&self) -> &[String] {
        &self.allowed
    }

    /// Raw type tag of the declared value.
    pub fn type_tag(&self) -> &str {
        self.value.type_tag()
    }

    /// Textual rendering of the declared value.
    pub fn value_text(&self) -> String {
        self.value.render()
    }
}

/// Read-only holder seeded with exactly one flag.
///
/// Typed getters check the requested name and raw tag before parsing the
/// flag's textual value, so a reader for one option can never interfere with
/// another. This is the surface the export engine's accessor registry reads
/// through.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Flag, FlagError, ValueHolder};
///
/// let flag = Flag::int("retries", 3, "Retry budget");
/// let holder = ValueHolder::single(&flag);
/// assert_eq!(holder.get_int("retries"), Ok(3));
/// assert!(matches!(holder.get_bool("retries"), Err(FlagError::TypeMismatch { .. })));
/// assert!(matches!(holder.get_int("other"), Err(FlagError::UnknownFlag(_))));
/// ```
#[derive(Debug)]
pub struct ValueHolder<'a> {
    flag: &'a Flag,
}

impl<'a> ValueHolder<'a> {
    /// Seeds a holder with the single target flag.
    pub fn single(flag: &'a Flag) -> Self {
        Self { flag }
    }

    fn text_of(&self, name: &str, requested: &str) -> Result<String, FlagError> {
        if self.flag.name() != name {
            return Err(FlagError::UnknownFlag(name.to_string()));
        }
        let actual = self.flag.type_tag();
        if actual != requested {
            return Err(FlagError::TypeMismatch {
                flag: name.to_string(),
                requested: requested.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(self.flag.value_text())
    }

    /// Raw textual value with only the name checked, no type check.
    /// Accessors for custom option kinds build on this.
    pub fn raw_text(&self, name: &str) -> Result<String, FlagError> {
        if self.flag.name() != name {
            return Err(FlagError::UnknownFlag(name.to_string()));
        }
        Ok(self.flag.value_text())
    }

    fn malformed(&self, name: &str, kind: &str, text: &str) -> FlagError {
        FlagError::Malformed {
            flag: name.to_string(),
            kind: kind.to_string(),
            text: text.to_string(),
        }
    }

    /// Reads a `bool` flag.
    pub fn get_bool(&self, name: &str) -> Result<bool, FlagError> {
        let text = self.text_of(name, "bool")?;
        text.parse()
            .map_err(|_| self.malformed(name, "bool", &text))
    }

    /// Reads an `int` flag.
    pub fn get_int(&self, name: &str) -> Result<i64, FlagError> {
        let text = self.text_of(name, "int")?;
        text.parse().map_err(|_| self.malformed(name, "int", &text))
    }

    /// Reads an `int32` flag.
    pub fn get_int32(&self, name: &str) -> Result<i32, FlagError> {
        let text = self.text_of(name, "int32")?;
        text.parse()
            .map_err(|_| self.malformed(name, "int32", &text))
    }

    /// Reads an `int64` flag.
    pub fn get_int64(&self, name: &str) -> Result<i64, FlagError> {
        let text = self.text_of(name, "int64")?;
        text.parse()
            .map_err(|_| self.malformed(name, "int64", &text))
    }

    /// Reads a `float64` flag.
    pub fn get_float64(&self, name: &str) -> Result<f64, FlagError> {
        let text = self.text_of(name, "float64")?;
        text.parse()
            .map_err(|_| self.malformed(name, "float64", &text))
    }

    /// Reads a `string` flag.
    pub fn get_string(&self, name: &str) -> Result<String, FlagError> {
        self.text_of(name, "string")
    }

    /// Reads a `duration` flag.
    pub fn get_duration(&self, name: &str) -> Result<Duration, FlagError> {
        let text = self.text_of(name, "duration")?;
        parse_duration(&text).ok_or_else(|| self.malformed(name, "duration", &text))
    }

    /// Reads a `boolSlice` flag.
    pub fn get_bool_slice(&self, name: &str) -> Result<Vec<bool>, FlagError> {
        let text = self.text_of(name, "boolSlice")?;
        let items = parse_sequence(&text).ok_or_else(|| self.malformed(name, "boolSlice", &text))?;
        items
            .iter()
            .map(|item| item.parse())
            .collect::<Result<_, _>>()
            .map_err(|_| self.malformed(name, "boolSlice", &text))
    }

    /// Reads an `intSlice` flag.
    pub fn get_int_slice(&self, name: &str) -> Result<Vec<i64>, FlagError> {
        let text = self.text_of(name, "intSlice")?;
        let items = parse_sequence(&text).ok_or_else(|| self.malformed(name, "intSlice", &text))?;
        items
            .iter()
            .map(|item| item.parse())
            .collect::<Result<_, _>>()
            .map_err(|_| self.malformed(name, "intSlice", &text))
    }

    /// Reads a `stringSlice` flag.
    pub fn get_string_slice(&self, name: &str) -> Result<Vec<String>, FlagError> {
        let text = self.text_of(name, "stringSlice")?;
        parse_sequence(&text).ok_or_else(|| self.malformed(name, "stringSlice", &text))
    }

    /// Reads a `stringArray` flag.
    pub fn get_string_array(&self, name: &str) -> Result<Vec<String>, FlagError> {
        let text = self.text_of(name, "stringArray")?;
        parse_sequence(&text).ok_or_else(|| self.malformed(name, "stringArray", &text))
    }
}

/// Renders a sequence value as `[a,b,c]`.
///
/// Elements that are empty or contain `,`, `"`, or `\` are double-quoted
/// with backslash escapes, so every element survives a parse round trip.
fn render_sequence(items: &[String]) -> String {
    let rendered: Vec<String> = items.iter().map(|item| render_element(item)).collect();
    format!("[{}]", rendered.join(","))
}

fn render_element(item: &str) -> String {
    if !item.is_empty() && !item.contains([',', '"', '\\']) {
        return item.to_string();
    }
    let mut out = String::from("\"");
    for c in item.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Parses a `[a,b,c]` rendering back into items. `[]` yields an empty list;
/// quoted elements are unescaped.
fn parse_sequence(text: &str) -> Option<Vec<String>> {
    let inner = text.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() {
        return Some(Vec::new());
    }

    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();
    loop {
        let mut item = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' => item.push(chars.next()?),
                    '"' => {
                        closed = true;
                        break;
                    }
                    other => item.push(other),
                }
            }
            if !closed {
                return None;
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c == ',' {
                    break;
                }
                item.push(c);
                chars.next();
            }
        }
        items.push(item);
        match chars.next() {
            Some(',') => continue,
            None => break,
            Some(_) => return None,
        }
    }
    Some(items)
}

/// Renders a duration using the largest unit that divides it exactly.
///
/// The zero duration renders as `0s`.
pub fn format_duration(duration: Duration) -> String {
    const UNITS: [(&str, u128); 6] = [
        ("h", 3_600_000_000_000),
        ("m", 60_000_000_000),
        ("s", 1_000_000_000),
        ("ms", 1_000_000),
        ("us", 1_000),
        ("ns", 1),
    ];

    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    for (unit, scale) in UNITS {
        if nanos % scale == 0 {
            return format!("{}{unit}", nanos / scale);
        }
    }
    unreachable!("nanosecond scale divides every duration")
}

/// Parses a `<integer><unit>` duration, with units `ns`, `us`, `ms`, `s`,
/// `m`, `h`. Returns `None` for anything else.
pub fn parse_duration(text: &str) -> Option<Duration> {
    let split = text.find(|c: char| !c.is_ascii_digit())?;
    let (number, unit) = text.split_at(split);
    let count: u64 = number.parse().ok()?;
    let nanos: u64 = match unit {
        "ns" => 1,
        "us" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60_000_000_000,
        "h" => 3_600_000_000_000,
        _ => return None,
    };
    Some(Duration::from_nanos(count.checked_mul(nanos)?))
}
