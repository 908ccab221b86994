//! URL slugification and path segment utilities.

use deunicode::deunicode;

/// Characters forbidden in output path segments
const FORBIDDEN_CHARS: &[char] = &[
    '<', '>', ':', '|', '?', '*', '#', '\\', '/', '(', ')', '[', ']', '\t', '\r', '\n',
];

// ============================================================================
// Slugification
// ============================================================================

/// Convert display text to an ASCII, lowercase, dash-separated slug.
///
/// Returns an empty string when nothing alphanumeric survives transliteration.
///
/// ```ignore
/// assert_eq!(slugify("Pest Prevention"), "pest-prevention");
/// assert_eq!(slugify("Café & Hôtel"), "cafe-hotel");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in deunicode(text).chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Remove forbidden characters and replace whitespace with underscores
pub fn sanitize_text(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Sanitize a record id for use as a single output directory name.
///
/// `None` when nothing usable remains or the result would be `.`/`..`.
pub fn path_segment(id: &str) -> Option<String> {
    let segment = sanitize_text(id);
    match segment.as_str() {
        "" | "." | ".." => None,
        _ => Some(segment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Pest Prevention"), "pest-prevention");
        assert_eq!(slugify("  Travel   Tips! "), "travel-tips");
    }

    #[test]
    fn test_slugify_transliterates() {
        assert_eq!(slugify("Café & Hôtel"), "cafe-hotel");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_sanitize_text_removes_all_forbidden_chars() {
        let input = "a<b>c:d|e?f*g#h\\i(j)k[l]m/n";
        assert_eq!(sanitize_text(input), "abcdefghijklmn");
    }

    #[test]
    fn test_sanitize_text_replaces_whitespace() {
        assert_eq!(sanitize_text("  Hello World  "), "Hello_World");
    }

    #[test]
    fn test_sanitize_text_preserves_unicode() {
        assert_eq!(sanitize_text("你好世界"), "你好世界");
    }

    #[test]
    fn test_path_segment() {
        assert_eq!(path_segment("grand-plaza-ny").as_deref(), Some("grand-plaza-ny"));
        assert_eq!(path_segment("../etc").as_deref(), Some("..etc"));
        assert_eq!(path_segment(".."), None);
        assert_eq!(path_segment("///"), None);
        assert_eq!(path_segment(""), None);
    }
}
