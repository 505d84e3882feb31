//! Stable identifiers for findings.
//!
//! An identifier is a SHA-256 digest over the canonical form of the
//! finding's structural tuple `(sheet, row_key, field, rule)`. Description
//! text and links are not part of the tuple; they may change between runs
//! while the underlying problem stays the same.

use sha2::{Digest, Sha256};

/// Separates canonical parts inside the hashed message.
const SEPARATOR: u8 = 0x1f;

/// Derives the identifier for a finding from its structural tuple.
///
/// Parts are canonicalized before hashing (see [`canonical_part`]), so
/// incidental whitespace or casing differences in the source data do not
/// produce a new identifier.
#[must_use]
pub fn identify(sheet: &str, row_key: &str, field: &str, rule: &str) -> String {
    let mut hasher = Sha256::new();
    for (i, part) in [sheet, row_key, field, rule].into_iter().enumerate() {
        if i > 0 {
            hasher.update([SEPARATOR]);
        }
        hasher.update(canonical_part(part).as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Canonical form of one identity part.
///
/// Control characters become spaces, whitespace runs collapse to a single
/// space, the ends are trimmed and the result is lower-cased. After this
/// the separator byte cannot occur inside a part.
#[must_use]
pub fn canonical_part(part: &str) -> String {
    let cleaned: String =
        part.chars().map(|c| if c.is_control() { ' ' } else { c }).collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}
