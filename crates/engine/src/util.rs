//! Internal helpers for input validation and name normalization.
//!
//! These utilities are **not** part of the public API. They centralize the
//! trimming and normalization rules so uniqueness checks behave the same
//! everywhere.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

/// Trims a user-supplied name and rejects empty values.
pub(crate) fn required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Normalizes a display name into its uniqueness key: NFKD, combining marks
/// stripped, lowercased, inner whitespace collapsed.
pub(crate) fn normalize_name_key(value: &str) -> String {
    let stripped: String = value
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trims an optional text field, mapping empty strings to `None`.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_strips_accents_and_case() {
        assert_eq!(normalize_name_key("Caffè  Bar"), "caffe bar");
        assert_eq!(normalize_name_key("GROCERIES"), "groceries");
    }

    #[test]
    fn required_name_rejects_blank() {
        assert!(required_name("  ", "account").is_err());
        assert_eq!(required_name(" Rent ", "category").unwrap(), "Rent");
    }
}
