//! Raw type tag normalization.

/// Suffix marking a repeated-value option kind in the raw vocabulary.
const REPEATED_SUFFIX: &str = "Slice";

/// Maps a raw option-type tag to the canonical vocabulary.
///
/// Repeated-value tags normalize recursively: the `Slice` suffix is stripped
/// and the result wrapped as `[]<base>`. Every other tag passes through
/// unchanged: option types are open-ended, and unrecognized kinds still
/// export under their raw name.
///
/// # Examples
///
/// ```
/// use cmdtree_export::normalize;
///
/// assert_eq!(normalize("boolSlice"), "[]bool");
/// assert_eq!(normalize("duration"), "duration");
/// assert_eq!(normalize("blahSlice"), "[]blah");
/// ```
pub fn normalize(raw_type: &str) -> String {
    match raw_type.strip_suffix(REPEATED_SUFFIX) {
        Some(base) => format!("[]{}", normalize(base)),
        None => raw_type.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_vocabulary() {
        let cases = [
            ("bool", "bool"),
            ("boolSlice", "[]bool"),
            ("duration", "duration"),
            ("int", "int"),
            ("intSlice", "[]int"),
            ("int32", "int32"),
            ("int64", "int64"),
            ("string", "string"),
            ("stringSlice", "[]string"),
            ("stringArray", "stringArray"),
            ("blahSlice", "[]blah"),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize(input), expected, "input '{input}'");
        }
    }

    #[test]
    fn test_normalize_nested_suffix() {
        assert_eq!(normalize("intSliceSlice"), "[][]int");
    }
}
