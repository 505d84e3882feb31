//! Task store: the report sheet holding the reconciled task list.
//!
//! The store is one sheet of the workbook, rewritten in full on every save.
//! Layout, one task per row under a fixed header:
//!
//! ```text
//! ID | Manual | Created | Sheet | Field | Admin | Description | Link
//! ```
//!
//! Operators may add rows by hand. A manual row without an ID is given a
//! permanent `manual-<id>` identifier the first time it is loaded.

use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::context::ServiceContext;
use crate::ports::IdGenerator;
use crate::sheet::{CellValue, SheetSnapshot, Workbook, WorkbookError};
use crate::tasks::Task;

/// Column names of the report sheet, in order.
pub const HEADER: [&str; 8] =
    ["ID", "Manual", "Created", "Sheet", "Field", "Admin", "Description", "Link"];

/// Rows shorter than this carry no task.
const MIN_CELLS: usize = 5;
const DATE_FORMAT: &str = "%d.%m.%Y";
const LINK_LABEL: &str = "Open";
const HYPERLINK_PREFIX: &str = "=HYPERLINK(";

/// Failures loading or saving the task store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The report sheet could not be read or written.
    #[error(transparent)]
    Workbook(#[from] WorkbookError),

    /// A `Created` cell holds something that is not a date.
    #[error("report row {row}: created date {value:?} is not a date")]
    InvalidDate {
        /// 1-based sheet row.
        row: usize,
        /// Offending cell text.
        value: String,
    },
}

/// The report sheet of one workbook.
pub struct TaskStore<'a> {
    ctx: &'a ServiceContext,
    workbook: Workbook<'a>,
    sheet: String,
}

impl<'a> TaskStore<'a> {
    /// Creates a store over `sheet` in the workbook at `root`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, root: &Path, sheet: &str) -> Self {
        Self { ctx, workbook: Workbook::new(ctx, root), sheet: sheet.to_string() }
    }

    /// Loads every task. A missing report sheet is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the sheet is unreadable or a created date is invalid.
    pub fn load(&self) -> Result<Vec<Task>, StoreError> {
        let snapshot = self.workbook.read_sheet_or_empty(&self.sheet)?;
        let tasks = parse_rows(&snapshot.values, self.ctx.clock.today(), self.ctx.id_gen.as_ref())?;
        debug!(sheet = %self.sheet, tasks = tasks.len(), "task store loaded");
        Ok(tasks)
    }

    /// Replaces the report sheet with `tasks`, keeping its sheet id.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing sheet is unreadable or the sheet
    /// cannot be written. Nothing is written in either case.
    pub fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let sheet_id = self.workbook.read_sheet_or_empty(&self.sheet)?.sheet_id;
        let snapshot = SheetSnapshot { sheet_id, values: render_rows(tasks) };
        self.workbook.write_sheet(&self.sheet, &snapshot)?;
        debug!(sheet = %self.sheet, tasks = tasks.len(), "task store saved");
        Ok(())
    }
}

/// Rebuilds tasks from report rows.
///
/// A leading header row (first cell `ID`) is skipped, rows with fewer than
/// five cells are ignored and non-manual rows without an ID are dropped.
/// A blank created date means `today`.
///
/// # Errors
///
/// Returns [`StoreError::InvalidDate`] when a created date cannot be parsed.
pub fn parse_rows(
    values: &[Vec<CellValue>],
    today: NaiveDate,
    ids: &dyn IdGenerator,
) -> Result<Vec<Task>, StoreError> {
    let mut tasks = Vec::with_capacity(values.len());
    for (i, row) in values.iter().enumerate() {
        let cell = |n: usize| row.get(n).map(CellValue::text).unwrap_or_default();
        if i == 0 && cell(0) == HEADER[0] {
            continue;
        }
        if row.len() < MIN_CELLS {
            continue;
        }

        let manual = row.get(1).is_some_and(CellValue::is_checked);
        let mut identifier = cell(0);
        if identifier.is_empty() {
            if !manual {
                debug!(row = i + 1, "skipping report row without an ID");
                continue;
            }
            identifier = format!("manual-{}", ids.generate_id());
        }

        let created = row.get(2).cloned().unwrap_or_default();
        let created_at = if created.is_blank() {
            today
        } else {
            created
                .as_date(today)
                .ok_or_else(|| StoreError::InvalidDate { row: i + 1, value: created.text() })?
        };

        let link = cell(7);
        tasks.push(Task {
            identifier,
            manual,
            created_at,
            sheet: cell(3),
            field: cell(4),
            admin: cell(5),
            description: cell(6),
            link: hyperlink_target(&link).map_or(link.clone(), ToString::to_string),
        });
    }
    Ok(tasks)
}

/// Renders the header plus one row per task.
#[must_use]
pub fn render_rows(tasks: &[Task]) -> Vec<Vec<CellValue>> {
    let header = HEADER.iter().map(|h| CellValue::from(*h)).collect();
    std::iter::once(header)
        .chain(tasks.iter().map(|task| {
            vec![
                task.identifier.as_str().into(),
                task.manual.into(),
                task.created_at.format(DATE_FORMAT).to_string().into(),
                task.sheet.as_str().into(),
                task.field.as_str().into(),
                task.admin.as_str().into(),
                task.description.as_str().into(),
                link_cell(&task.link),
            ]
        }))
        .collect()
}

/// Web links become a clickable formula; other locators stay plain text.
fn link_cell(link: &str) -> CellValue {
    if link.starts_with("http://") || link.starts_with("https://") {
        let url = link.replace('"', "%22");
        CellValue::Text(format!("{HYPERLINK_PREFIX}\"{url}\"; \"{LINK_LABEL}\")"))
    } else {
        CellValue::from(link)
    }
}

/// Target of a `=HYPERLINK("url"; "label")` formula.
fn hyperlink_target(cell: &str) -> Option<&str> {
    let prefix = cell.get(..HYPERLINK_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(HYPERLINK_PREFIX) {
        return None;
    }
    let rest = cell[HYPERLINK_PREFIX.len()..].trim_start().strip_prefix('"')?;
    rest.find('"').map(|end| &rest[..end])
}
