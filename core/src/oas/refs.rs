#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Helpers for turning local `$ref` pointers (`#/components/{section}/{name}`)
//! into component names. External documents are never fetched.

use percent_encoding::percent_decode_str;

/// Extracts a component name from a `$ref` if it points to `#/components/{section}/{name}`.
///
/// Returns `None` for external references or references into another section.
pub fn component_name(ref_str: &str, section: &str) -> Option<String> {
    let pointer = ref_str.strip_prefix("#/")?;
    let segments: Vec<&str> = pointer.split('/').collect();

    if segments.len() != 3 || segments[0] != "components" || segments[1] != section {
        return None;
    }

    let name = decode_pointer_segment(segments[2]);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent escapes).
pub fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_name_schema() {
        assert_eq!(
            component_name("#/components/schemas/User", "schemas").as_deref(),
            Some("User")
        );
    }

    #[test]
    fn test_component_name_wrong_section() {
        assert!(component_name("#/components/responses/User", "schemas").is_none());
        assert!(component_name("other.yaml#/components/schemas/User", "schemas").is_none());
        assert!(component_name("#/components/schemas/", "schemas").is_none());
    }

    #[test]
    fn test_decode_pointer_segment() {
        assert_eq!(decode_pointer_segment("a~1b~0c"), "a/b~c");
        assert_eq!(decode_pointer_segment("Pet%20Shop"), "Pet Shop");
    }
}
