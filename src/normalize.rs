//! Filename normalization for fuzzy record matching.
//!
//! Two filenames are considered the same record when their normalized keys
//! are equal: extension stripped, underscores and spaces turned into hyphens,
//! periods dropped, and everything lowercased. `"Smith_John-01.jpg"` and
//! `"smith-john-01"` both become `"smith-john-01"`.

/// Splits `filename` at its last `.` into `(stem, extension)`.
///
/// The extension keeps its leading dot. Leading dots (as in `.hidden`) never
/// start an extension.
pub fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if filename[..idx].chars().any(|ch| ch != '.') => filename.split_at(idx),
        _ => (filename, ""),
    }
}

pub fn file_stem(filename: &str) -> &str {
    split_extension(filename).0
}

pub fn normalize_key(value: &str) -> String {
    let stem = file_stem(value);
    let mut key = String::with_capacity(stem.len());
    for ch in stem.chars() {
        match ch {
            '_' | ' ' => key.push('-'),
            '.' => {}
            other => key.extend(other.to_lowercase()),
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_extension_uses_last_dot() {
        assert_eq!(split_extension("Photo_01.jpg"), ("Photo_01", ".jpg"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension("README"), ("README", ""));
        assert_eq!(split_extension(".hidden"), (".hidden", ""));
        assert_eq!(split_extension("..hidden.txt"), ("..hidden", ".txt"));
    }

    #[test]
    fn separators_and_case_are_folded() {
        assert_eq!(normalize_key("Smith_John-01.jpg"), "smith-john-01");
        assert_eq!(normalize_key("smith-john-01"), "smith-john-01");
        assert_eq!(normalize_key("Photo_01.jpg"), "photo-01");
    }

    #[test]
    fn periods_are_removed_after_extension_strip() {
        assert_eq!(normalize_key("A. Smith.tif"), "a-smith");
    }

    #[test]
    fn values_without_extension_lose_text_after_last_period() {
        assert_eq!(normalize_key("A. Smith"), "a");
    }
}
