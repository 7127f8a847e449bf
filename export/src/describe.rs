//! Option description: one flag → one canonical descriptor.

use cmdtree_core::{Flag, OptionDescriptor};

use crate::error::DescribeError;
use crate::normalize::normalize;
use crate::registry::AccessorRegistry;

/// Converts one flag into a canonical [`OptionDescriptor`].
///
/// The section is the substring before the first `.` of the name (empty when
/// the name has none); multi-level names like `a.b.c` take only the first
/// segment. Default extraction is all-or-nothing: on failure the error
/// propagates and no partial descriptor is built. Pure function, no side
/// effects beyond the returned value.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cmdtree_core::Flag;
/// use cmdtree_export::{AccessorRegistry, describe};
///
/// let registry = AccessorRegistry::standard();
/// let flag = Flag::duration("server.timeout", Duration::from_secs(30), "Request timeout");
/// let descriptor = describe(&flag, &registry).unwrap();
/// assert_eq!(descriptor.section, "server");
/// assert_eq!(descriptor.canonical_type, "duration");
/// ```
pub fn describe(flag: &Flag, registry: &AccessorRegistry) -> Result<OptionDescriptor, DescribeError> {
    let section = flag
        .name()
        .split_once('.')
        .map(|(head, _)| head)
        .unwrap_or("")
        .to_string();
    let default = registry.extract_default(flag)?;

    Ok(OptionDescriptor {
        name: flag.name().to_string(),
        default,
        description: flag.usage().to_string(),
        hidden: flag.hidden(),
        section,
        canonical_type: normalize(flag.type_tag()),
        values: flag.allowed_values().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_dotted_name_yields_section() {
        let registry = AccessorRegistry::standard();
        let descriptor = describe(&Flag::int("server.port", 8080, ""), &registry).unwrap();
        assert_eq!(descriptor.section, "server");
        assert_eq!(descriptor.name, "server.port");
    }

    #[test]
    fn test_plain_name_yields_empty_section() {
        let registry = AccessorRegistry::standard();
        let descriptor = describe(&Flag::int("timeout", 5, ""), &registry).unwrap();
        assert_eq!(descriptor.section, "");
    }

    #[test]
    fn test_multi_level_name_takes_first_segment_only() {
        let registry = AccessorRegistry::standard();
        let descriptor = describe(&Flag::bool("a.b.c", false, ""), &registry).unwrap();
        assert_eq!(descriptor.section, "a");
        assert_eq!(descriptor.name, "a.b.c");
    }

    #[test]
    fn test_descriptor_carries_flag_metadata() {
        let registry = AccessorRegistry::standard();
        let flag = Flag::string("format", "json", "Output format")
            .hide()
            .with_allowed_values(&["json", "yaml"]);
        let descriptor = describe(&flag, &registry).unwrap();
        assert_eq!(descriptor.default, json!("json"));
        assert_eq!(descriptor.description, "Output format");
        assert!(descriptor.hidden);
        assert_eq!(descriptor.values, vec!["json", "yaml"]);
        assert_eq!(descriptor.canonical_type, "string");
    }

    #[test]
    fn test_extraction_failure_builds_nothing() {
        let registry = AccessorRegistry::empty();
        let err = describe(&Flag::bool("verbose", false, ""), &registry).unwrap_err();
        assert!(matches!(
            err,
            crate::error::DescribeError::UnsupportedType(tag) if tag == "bool"
        ));
    }
}
