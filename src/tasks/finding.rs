//! A single problem detected during one run.

use super::identity::identify;

/// Admin recorded when a row names no responsible party.
pub const UNSPECIFIED_ADMIN: &str = "unspecified";

/// A problem found in one sheet row, produced fresh on every run.
///
/// `identifier` is derived from `(sheet, row_key, field, rule)` only, so it
/// survives edits to the row that change the description or move the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Stable identity shared with the task this finding maps to.
    pub identifier: String,
    /// Source sheet name.
    pub sheet: String,
    /// Stable reference to the source row (see `SheetGrid::row_keys`).
    pub row_key: String,
    /// Column the problem was found in.
    pub field: String,
    /// Name of the rule that fired.
    pub rule: String,
    /// Human-readable explanation; may change between runs.
    pub description: String,
    /// Locator of the offending cell; may change between runs.
    pub link: String,
    /// Responsible party, or [`UNSPECIFIED_ADMIN`].
    pub admin: String,
}

impl Finding {
    /// Builds a finding and derives its identifier.
    ///
    /// A blank `admin` is recorded as [`UNSPECIFIED_ADMIN`].
    #[must_use]
    pub fn new(
        sheet: &str,
        row_key: &str,
        field: &str,
        rule: &str,
        description: impl Into<String>,
        link: impl Into<String>,
        admin: &str,
    ) -> Self {
        let admin = admin.trim();
        Self {
            identifier: identify(sheet, row_key, field, rule),
            sheet: sheet.to_string(),
            row_key: row_key.to_string(),
            field: field.to_string(),
            rule: rule.to_string(),
            description: description.into(),
            link: link.into(),
            admin: if admin.is_empty() { UNSPECIFIED_ADMIN.to_string() } else { admin.to_string() },
        }
    }
}
