//! URL slugs for catalog entities.

use std::fmt::Display;

/// Derives the URL slug for an entity from its display name and external key.
///
/// The name is lowercased, every run of characters outside `[a-z0-9]` becomes
/// a single `-`, and leading/trailing hyphens are dropped. The external key is
/// always appended after a final `-`, so two entities with different keys
/// never share a slug even when their names normalize identically.
///
/// ```
/// assert_eq!(dharma_core::slugify("Gil Fronsdal", 96), "gil-fronsdal-96");
/// ```
#[must_use]
pub fn slugify(name: &str, key: impl Display) -> String {
    let mut base = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !base.is_empty() {
                base.push('-');
            }
            pending_hyphen = false;
            base.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    if base.is_empty() {
        return key.to_string();
    }
    format!("{base}-{key}")
}
