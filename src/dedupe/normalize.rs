/// Grouping key for a title: lower-cased, ASCII letters and digits only.
///
/// Anything outside `[a-z0-9]` after lower-casing is dropped, so titles in
/// non-Latin scripts normalize to the empty string.
pub fn normalize_title(title: Option<&str>) -> String {
    let Some(title) = title else {
        return String::new();
    };
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Two keys belong together when either contains the other.
pub(crate) fn keys_overlap(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}
