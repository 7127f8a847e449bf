//! Accessor registry: raw type tag → typed default-value reader.
//!
//! Dispatch is keyed by the *raw* tag, not the canonical one, because
//! repeated-value kinds need their own accessor (returning a sequence)
//! distinct from the scalar accessor. The registry is the single place a new
//! option kind is wired in; walker and describer never change.

use std::collections::HashMap;

use serde_json::Value;

use cmdtree_core::{Flag, FlagError, ValueHolder};

use crate::error::DescribeError;

/// A typed reader for one raw option kind.
///
/// Implemented for any matching closure, so registration reads like a table.
pub trait Accessor: Send + Sync {
    /// Reads the option's value out of a holder seeded with that option.
    fn read(&self, holder: &ValueHolder<'_>, name: &str) -> Result<Value, FlagError>;
}

impl<F> Accessor for F
where
    F: for<'a> Fn(&ValueHolder<'a>, &str) -> Result<Value, FlagError> + Send + Sync,
{
    fn read(&self, holder: &ValueHolder<'_>, name: &str) -> Result<Value, FlagError> {
        self(holder, name)
    }
}

/// Registry of value accessors, keyed by raw type tag.
///
/// # Examples
///
/// ```
/// use cmdtree_core::Flag;
/// use cmdtree_export::AccessorRegistry;
///
/// let registry = AccessorRegistry::standard();
/// let flag = Flag::bool("verbose", true, "Verbose output");
/// assert_eq!(registry.extract_default(&flag).unwrap(), serde_json::json!(true));
/// ```
pub struct AccessorRegistry {
    table: HashMap<String, Box<dyn Accessor>>,
}

impl AccessorRegistry {
    /// Creates a registry with no accessors at all.
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Creates a registry wired with the standard vocabulary: `bool`,
    /// `boolSlice`, `int`, `intSlice`, `int32`, `int64`, `float64`,
    /// `duration`, `string`, `stringSlice`, and `stringArray`.
    ///
    /// Durations export as integer nanoseconds.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register("bool", |h: &ValueHolder<'_>, n: &str| {
            h.get_bool(n).map(Value::from)
        });
        registry.register("boolSlice", |h: &ValueHolder<'_>, n: &str| {
            h.get_bool_slice(n).map(Value::from)
        });
        registry.register("int", |h: &ValueHolder<'_>, n: &str| {
            h.get_int(n).map(Value::from)
        });
        registry.register("intSlice", |h: &ValueHolder<'_>, n: &str| {
            h.get_int_slice(n).map(Value::from)
        });
        registry.register("int32", |h: &ValueHolder<'_>, n: &str| {
            h.get_int32(n).map(Value::from)
        });
        registry.register("int64", |h: &ValueHolder<'_>, n: &str| {
            h.get_int64(n).map(Value::from)
        });
        registry.register("float64", |h: &ValueHolder<'_>, n: &str| {
            h.get_float64(n).map(Value::from)
        });
        registry.register("duration", |h: &ValueHolder<'_>, n: &str| {
            h.get_duration(n).map(|d| Value::from(d.as_nanos() as u64))
        });
        registry.register("string", |h: &ValueHolder<'_>, n: &str| {
            h.get_string(n).map(Value::from)
        });
        registry.register("stringSlice", |h: &ValueHolder<'_>, n: &str| {
            h.get_string_slice(n).map(Value::from)
        });
        registry.register("stringArray", |h: &ValueHolder<'_>, n: &str| {
            h.get_string_array(n).map(Value::from)
        });
        registry
    }

    /// Registers an accessor for a raw type tag, replacing any existing one.
    pub fn register(&mut self, tag: &str, accessor: impl Accessor + 'static) {
        self.table.insert(tag.to_string(), Box::new(accessor));
    }

    /// Whether a raw type tag has an accessor.
    pub fn supports(&self, tag: &str) -> bool {
        self.table.contains_key(tag)
    }

    /// Reads the declared default of one flag.
    ///
    /// The accessor only ever sees a holder seeded with the target flag, so a
    /// stateful reader cannot interfere with neighboring options. A registry
    /// miss is [`DescribeError::UnsupportedType`]; an accessor failure is
    /// wrapped as [`DescribeError::Extraction`]. Neither is retried; this is
    /// a pure read with no transient failure modes.
    pub fn extract_default(&self, flag: &Flag) -> Result<Value, DescribeError> {
        let tag = flag.type_tag();
        let accessor = self
            .table
            .get(tag)
            .ok_or_else(|| DescribeError::UnsupportedType(tag.to_string()))?;
        let holder = ValueHolder::single(flag);
        accessor
            .read(&holder, flag.name())
            .map_err(|source| DescribeError::Extraction {
                option: flag.name().to_string(),
                source,
            })
    }
}

impl Default for AccessorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use cmdtree_core::FlagValue;

    use super::*;

    #[test]
    fn test_standard_vocabulary_is_wired() {
        let registry = AccessorRegistry::standard();
        for tag in [
            "bool",
            "boolSlice",
            "int",
            "intSlice",
            "int32",
            "int64",
            "float64",
            "duration",
            "string",
            "stringSlice",
            "stringArray",
        ] {
            assert!(registry.supports(tag), "missing accessor for '{tag}'");
        }
    }

    #[test]
    fn test_extracts_scalar_defaults() {
        let registry = AccessorRegistry::standard();
        assert_eq!(
            registry
                .extract_default(&Flag::bool("b", false, ""))
                .unwrap(),
            json!(false)
        );
        assert_eq!(
            registry
                .extract_default(&Flag::string("s", "someValue", ""))
                .unwrap(),
            json!("someValue")
        );
        assert_eq!(
            registry.extract_default(&Flag::int("n", 42, "")).unwrap(),
            json!(42)
        );
    }

    #[test]
    fn test_duration_exports_as_nanoseconds() {
        let registry = AccessorRegistry::standard();
        let flag = Flag::duration("t", Duration::from_secs(2), "");
        assert_eq!(
            registry.extract_default(&flag).unwrap(),
            json!(2_000_000_000u64)
        );
    }

    #[test]
    fn test_sequence_defaults() {
        let registry = AccessorRegistry::standard();
        let flag = Flag::bool_slice("checks", &[true, true, false], "");
        assert_eq!(
            registry.extract_default(&flag).unwrap(),
            json!([true, true, false])
        );
        let empty = Flag::string_slice("hosts", &[], "");
        assert_eq!(registry.extract_default(&empty).unwrap(), json!([]));
    }

    #[test]
    fn test_unregistered_tag_is_unsupported() {
        #[derive(Debug)]
        struct Color;
        impl FlagValue for Color {
            fn type_tag(&self) -> &str {
                "color"
            }
            fn render(&self) -> String {
                "#ff0000".to_string()
            }
        }

        let registry = AccessorRegistry::standard();
        let flag = Flag::custom("accent", "", Color);
        let err = registry.extract_default(&flag).unwrap_err();
        assert!(matches!(err, DescribeError::UnsupportedType(tag) if tag == "color"));
    }

    #[test]
    fn test_registering_new_kind_requires_no_other_change() {
        #[derive(Debug)]
        struct Color;
        impl FlagValue for Color {
            fn type_tag(&self) -> &str {
                "color"
            }
            fn render(&self) -> String {
                "#ff0000".to_string()
            }
        }

        let mut registry = AccessorRegistry::standard();
        registry.register("color", |h: &ValueHolder<'_>, n: &str| {
            h.raw_text(n).map(Value::from)
        });
        let flag = Flag::custom("accent", "", Color);
        assert_eq!(registry.extract_default(&flag).unwrap(), json!("#ff0000"));
    }

    #[test]
    fn test_accessor_failure_wraps_cause() {
        #[derive(Debug)]
        struct Broken;
        impl FlagValue for Broken {
            fn type_tag(&self) -> &str {
                "int"
            }
            fn render(&self) -> String {
                "not-a-number".to_string()
            }
        }

        let registry = AccessorRegistry::standard();
        let flag = Flag::custom("count", "", Broken);
        let err = registry.extract_default(&flag).unwrap_err();
        assert!(matches!(
            err,
            DescribeError::Extraction { option, source: FlagError::Malformed { .. } } if option == "count"
        ));
    }
}
