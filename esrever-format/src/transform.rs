//! Name reversal and identifier sanitizing

use crate::constants::{DIGIT_PREFIX, FALLBACK_IDENTIFIER};

/// Reverse a name character by character.
///
/// Reversal works on Unicode scalar values, so the result is always valid
/// UTF-8 even for names outside ASCII.
pub fn reverse(name: &str) -> String {
    name.chars().rev().collect()
}

/// Turn an arbitrary name into a legal shell function identifier.
///
/// Every character outside `[A-Za-z0-9_]` becomes `_`, a leading digit gets
/// [`DIGIT_PREFIX`] in front, and an empty input yields
/// [`FALLBACK_IDENTIFIER`]. The output always satisfies [`is_identifier`] and
/// sanitizing it again returns it unchanged.
pub fn sanitize(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();

    if out.is_empty() {
        return FALLBACK_IDENTIFIER.to_string();
    }
    if out.starts_with(|ch: char| ch.is_ascii_digit()) {
        out.insert(0, DIGIT_PREFIX);
    }
    out
}

/// Check `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        }
        _ => false,
    }
}
