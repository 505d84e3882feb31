//! Business-rule validation of source sheets.
//!
//! Each source sheet has a [`SheetKind`] that fixes its header row, the
//! column used for row keys and the rules applied to its rows. The common
//! runner checks the header for required columns first; a sheet with a
//! missing column yields a single `missing_column` finding and no row checks.

mod leads;
mod sales;
mod trainings;

use chrono::NaiveDate;
use tracing::debug;

use crate::sheet::{DataRow, SheetGrid, SheetSnapshot};
use crate::tasks::{Finding, UNSPECIFIED_ADMIN};

/// Rule names attached to findings. They are part of each finding's identity.
pub mod rule {
    /// A required column is absent from the header.
    pub const MISSING_COLUMN: &str = "missing_column";
    /// A cell asks for clarification.
    pub const CLARIFY: &str = "clarify";
    /// A required cell is empty.
    pub const REQUIRED: &str = "required";
    /// Final price does not follow from full price and discount.
    pub const PRICE_MATH: &str = "price_math";
    /// Payments do not add up to the final price.
    pub const PAYMENT_SUM: &str = "payment_sum";
    /// Goods were entered in the CRM.
    pub const CRM_GOODS: &str = "crm_goods";
    /// A paid service was not entered in the CRM.
    pub const CRM_MISSING: &str = "crm_missing";
    /// No receipt was printed for a paid service.
    pub const RECEIPT_MISSING: &str = "receipt_missing";
    /// A gift lacks a comment.
    pub const COMMENT_GIFT: &str = "comment_gift";
    /// A subscription refund lacks a comment.
    pub const COMMENT_REFUND: &str = "comment_refund";
    /// A recalculation lacks a comment.
    pub const COMMENT_RECALCULATION: &str = "comment_recalculation";
    /// A certificate sale lacks a comment.
    pub const COMMENT_CERTIFICATE: &str = "comment_certificate";
    /// A full discount lacks a comment.
    pub const COMMENT_FULL_DISCOUNT: &str = "comment_full_discount";
    /// A date cell cannot be parsed.
    pub const INVALID_DATE: &str = "invalid_date";
    /// A yes/no cell holds something else.
    pub const INVALID_FLAG: &str = "invalid_flag";
    /// A confirmation status on a past date.
    pub const STATUS_PAST: &str = "status_past";
    /// A status outside the allowed list.
    pub const STATUS_UNKNOWN: &str = "status_unknown";
    /// A client session without a coach.
    pub const EMPLOYEE_MISSING: &str = "employee_missing";
    /// A broken formula reference in a comment.
    pub const FORMULA_ERROR: &str = "formula_error";
    /// An absence without a reason.
    pub const ABSENCE_REASON: &str = "absence_reason";
    /// A finished subscription without the renewal answer.
    pub const RENEWAL_COMMENT: &str = "renewal_comment";
    /// A client field is empty although the client was created.
    pub const CLIENT_REQUIRED: &str = "client_required";
    /// A phone number is not in `7XXXXXXXXXX` form.
    pub const PHONE_FORMAT: &str = "phone_format";
    /// Client data is filled in but nobody is recorded as its creator.
    pub const CLIENT_ADMIN_MISSING: &str = "client_admin_missing";
}

/// Row key used for findings about the header itself.
pub const HEADER_ROW_KEY: &str = "header";

/// The kinds of source sheet the validator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    /// Sales journal.
    Sales,
    /// Training schedule and attendance.
    Trainings,
    /// Incoming leads.
    Leads,
}

impl SheetKind {
    /// 1-based sheet row holding the column names.
    #[must_use]
    pub fn header_row(self) -> usize {
        match self {
            Self::Sales | Self::Leads => 2,
            Self::Trainings => 1,
        }
    }

    /// Column whose date anchors row keys.
    #[must_use]
    pub fn date_column(self) -> &'static str {
        match self {
            Self::Sales | Self::Trainings => "Date",
            Self::Leads => "Lead date",
        }
    }

    /// Required columns used when configuration does not override them.
    #[must_use]
    pub fn default_columns(self) -> Vec<String> {
        let columns: &[&str] = match self {
            Self::Sales => sales::REQUIRED_COLUMNS,
            Self::Trainings => trainings::REQUIRED_COLUMNS,
            Self::Leads => leads::REQUIRED_COLUMNS,
        };
        columns.iter().map(ToString::to_string).collect()
    }
}

/// A configured source sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSheet {
    /// Which rules apply.
    pub kind: SheetKind,
    /// Sheet name in the workbook.
    pub name: String,
    /// Columns that must be present in the header.
    pub required_columns: Vec<String>,
}

impl SourceSheet {
    /// Source sheet with the default required columns for `kind`.
    #[must_use]
    pub fn new(kind: SheetKind, name: &str) -> Self {
        Self { kind, name: name.to_string(), required_columns: kind.default_columns() }
    }
}

/// Validates one sheet snapshot and returns every finding, in row order.
///
/// A snapshot without a header row yields no findings.
#[must_use]
pub fn validate_sheet(
    source: &SourceSheet,
    snapshot: &SheetSnapshot,
    spreadsheet_id: &str,
    today: NaiveDate,
) -> Vec<Finding> {
    let grid =
        SheetGrid::from_snapshot(&source.name, snapshot, source.kind.header_row(), spreadsheet_id);
    if grid.headers().is_empty() {
        debug!(sheet = %source.name, "sheet has no header row");
        return Vec::new();
    }

    if let Some(missing) = source.required_columns.iter().find(|c| !grid.has_column(c)) {
        return vec![Finding::new(
            &source.name,
            HEADER_ROW_KEY,
            missing,
            rule::MISSING_COLUMN,
            format!("Column '{missing}' not found"),
            grid.header_link(missing),
            UNSPECIFIED_ADMIN,
        )];
    }

    let keys = grid.row_keys(source.kind.date_column(), today);
    let rows: Vec<(DataRow<'_>, &str)> = grid
        .rows()
        .zip(keys.iter().map(String::as_str))
        .filter(|(row, _)| !row.is_blank())
        .collect();

    let findings = match source.kind {
        SheetKind::Sales => sales::check(&rows, &source.required_columns, today),
        SheetKind::Trainings => trainings::check(&rows, &source.required_columns, today),
        SheetKind::Leads => leads::check(&rows, &source.required_columns),
    };
    debug!(sheet = %source.name, rows = rows.len(), findings = findings.len(), "sheet validated");
    findings
}

/// One row under check, with its key and responsible admin.
struct RowContext<'g> {
    row: DataRow<'g>,
    key: &'g str,
    admin: String,
}

impl<'g> RowContext<'g> {
    fn new(row: DataRow<'g>, key: &'g str, admin: impl Into<String>) -> Self {
        Self { row, key, admin: admin.into() }
    }

    fn finding(&self, field: &str, rule: &str, description: impl Into<String>) -> Finding {
        self.finding_for(field, rule, description, &self.admin)
    }

    fn finding_for(
        &self,
        field: &str,
        rule: &str,
        description: impl Into<String>,
        admin: &str,
    ) -> Finding {
        Finding::new(
            self.row.sheet(),
            self.key,
            field,
            rule,
            description,
            self.row.link(field),
            admin,
        )
    }
}
