//! Mapping work item titles to filesystem-safe names.

/// Characters that are invalid in Windows and/or Linux filenames.
const RESERVED_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Derive a filesystem-safe filename stem from a work item title.
///
/// Every reserved character is deleted and the result is trimmed of leading
/// and trailing whitespace. Deterministic, but not injective: two titles
/// differing only by reserved characters map to the same name, and the
/// resulting artifacts overwrite each other. Deduplication is out of scope.
pub fn to_safe_filename(title: &str) -> String {
    let cleaned: String = title.chars().filter(|c| !RESERVED_CHARS.contains(c)).collect();
    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_reserved_characters() {
        assert_eq!(to_safe_filename(r#"Login: "fast" <v2>?"#), "Login fast v2");
        let cleaned = to_safe_filename(r#"a\b/c*d?e:f"g<h>i|j"#);
        for reserved in ['\\', '/', '*', '?', ':', '"', '<', '>', '|'] {
            assert!(!cleaned.contains(reserved));
        }
        assert_eq!(cleaned, "abcdefghij");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(to_safe_filename("  Login flow  "), "Login flow");
        // Trimming happens after removal, so exposed whitespace goes too
        assert_eq!(to_safe_filename("/ Login flow /"), "Login flow");
    }

    #[test]
    fn plain_titles_are_unchanged() {
        assert_eq!(to_safe_filename("User registration"), "User registration");
    }

    #[test]
    fn is_deterministic() {
        let title = "Checkout: edge/corner cases?";
        assert_eq!(to_safe_filename(title), to_safe_filename(title));
    }

    #[test]
    fn reserved_only_title_collapses_to_empty() {
        assert_eq!(to_safe_filename(r#"\/*?:"<>|"#), "");
    }
}
