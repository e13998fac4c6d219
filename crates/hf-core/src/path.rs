//! # Diagnostic Paths
//!
//! Paths locate a field relative to the document root. Object keys and
//! array indices are joined with `.`; the root itself is the empty string.
//!
//! ```
//! use hf_core::path::{index_segment, prefix_path};
//!
//! assert_eq!(prefix_path("skills", ""), "skills");
//! assert_eq!(prefix_path("skills", &prefix_path(&index_segment(0), "name")), "skills.0.name");
//! ```

/// Prefix a child-relative path with the field or index it was found under.
///
/// An empty child path means the diagnostic concerns the field itself, so
/// the result is exactly `segment`.
pub fn prefix_path(segment: &str, child: &str) -> String {
    if child.is_empty() {
        segment.to_string()
    } else {
        format!("{segment}.{child}")
    }
}

/// The path segment for an array element.
pub fn index_segment(index: usize) -> String {
    index.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_child_yields_segment() {
        assert_eq!(prefix_path("name", ""), "name");
    }

    #[test]
    fn nested_child_is_dot_joined() {
        assert_eq!(prefix_path("abilityScores", "strength"), "abilityScores.strength");
        assert_eq!(prefix_path("equipment", "1.name"), "equipment.1.name");
    }

    #[test]
    fn index_segment_is_decimal() {
        assert_eq!(index_segment(0), "0");
        assert_eq!(index_segment(42), "42");
    }
}
