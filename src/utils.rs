//! Common utility functions shared across the codebase.

use std::path::Path;

/// Collapses every ASCII whitespace run to a single space and trims both ends.
///
/// Non-breaking spaces are content, not layout, and are kept as they are.
///
/// This is the canonical form of a translatable string. It is applied before
/// hashing and before catalog lookup, never after.
///
/// # Examples
///
/// ```
/// use markup_gettext::utils::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("  Hello\n\t world "), "Hello world");
/// assert_eq!(normalize_whitespace("\n \n"), "");
/// ```
pub fn normalize_whitespace(text: &str) -> String {
    text.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strips leading whitespace from every line.
///
/// xgettext cannot parse indented heredocs, so sources are dedented before
/// extraction. Line breaks are kept so reported line numbers stay correct.
pub fn dedent_lines(source: &str) -> String {
    source
        .split_inclusive('\n')
        .map(|line| line.trim_start_matches([' ', '\t']))
        .collect()
}

/// Display form of `path` relative to `base`, prefixed with `./`.
///
/// Falls back to the full path when `path` is not under `base`.
pub fn relative_display(base: &Path, path: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(rel) => format!("./{}", rel.to_string_lossy()),
        Err(_) => path.to_string_lossy().to_string(),
    }
}
