//! Persistent task records and their lifecycle helpers.

use chrono::NaiveDate;

use super::finding::Finding;

/// One outstanding problem in the task store.
///
/// `identifier`, `manual` and `created_at` are owned by the store and carried
/// forward verbatim; the remaining fields mirror the latest matching finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Primary key; equals the finding identifier for generated tasks.
    pub identifier: String,
    /// Pinned by an operator; never removed automatically.
    pub manual: bool,
    /// Date the task first appeared.
    pub created_at: NaiveDate,
    /// Source sheet name.
    pub sheet: String,
    /// Column the problem was found in.
    pub field: String,
    /// Responsible party.
    pub admin: String,
    /// Human-readable explanation.
    pub description: String,
    /// Locator of the offending cell.
    pub link: String,
}

impl Task {
    /// Creates the task for a finding seen for the first time.
    #[must_use]
    pub fn from_finding(finding: &Finding, today: NaiveDate) -> Self {
        Self {
            identifier: finding.identifier.clone(),
            manual: false,
            created_at: today,
            sheet: finding.sheet.clone(),
            field: finding.field.clone(),
            admin: finding.admin.clone(),
            description: finding.description.clone(),
            link: finding.link.clone(),
        }
    }

    /// Returns a copy with the descriptive fields taken from `finding`.
    ///
    /// Identity, the manual flag and the creation date are kept.
    #[must_use]
    pub fn refreshed(&self, finding: &Finding) -> Self {
        Self {
            sheet: finding.sheet.clone(),
            field: finding.field.clone(),
            admin: finding.admin.clone(),
            description: finding.description.clone(),
            link: finding.link.clone(),
            ..self.clone()
        }
    }
}
