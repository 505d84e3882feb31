//! Workbook persistence: one JSON snapshot per sheet.
//!
//! A workbook is a directory; every sheet lives in `<root>/<sheet>.json`:
//!
//! ```text
//! {"sheet_id": 623132210, "values": [["Date", "Client", ...], [45672, "Ann", ...]]}
//! ```
//!
//! `values` starts at sheet row 1 and uses the unformatted-value shape of
//! spreadsheet APIs. All I/O goes through the `FileSystem` port.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::value::CellValue;
use crate::context::ServiceContext;

/// Raw contents of one sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetSnapshot {
    /// Numeric sheet id used in cell links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<i64>,
    /// Rows of cells starting at sheet row 1.
    #[serde(default)]
    pub values: Vec<Vec<CellValue>>,
}

/// Failures reading or writing workbook sheets.
#[derive(Debug, Error)]
pub enum WorkbookError {
    /// The sheet file does not exist.
    #[error("sheet {sheet:?} not found at {}", path.display())]
    MissingSheet {
        /// Sheet name.
        sheet: String,
        /// Expected file location.
        path: PathBuf,
    },

    /// The sheet file could not be read or written.
    #[error("failed to {action} sheet {sheet:?}: {message}")]
    Io {
        /// `read` or `write`.
        action: &'static str,
        /// Sheet name.
        sheet: String,
        /// Underlying error text.
        message: String,
    },

    /// The sheet file is not a valid snapshot.
    #[error("sheet {sheet:?} is not a valid snapshot: {source}")]
    Parse {
        /// Sheet name.
        sheet: String,
        /// JSON error.
        source: serde_json::Error,
    },
}

/// Access to the sheets of one workbook directory.
pub struct Workbook<'a> {
    ctx: &'a ServiceContext,
    root: PathBuf,
}

impl<'a> Workbook<'a> {
    /// Creates a workbook rooted at `root`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, root: &Path) -> Self {
        Self { ctx, root: root.to_path_buf() }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads a sheet that must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the sheet file is missing, unreadable or malformed.
    pub fn read_sheet(&self, sheet: &str) -> Result<SheetSnapshot, WorkbookError> {
        let path = self.sheet_path(sheet);
        if !self.ctx.fs.exists(&path) {
            return Err(WorkbookError::MissingSheet { sheet: sheet.to_string(), path });
        }
        self.load(sheet, &path)
    }

    /// Reads a sheet, treating a missing file as an empty sheet.
    ///
    /// # Errors
    ///
    /// Returns an error if the sheet file exists but is unreadable or malformed.
    pub fn read_sheet_or_empty(&self, sheet: &str) -> Result<SheetSnapshot, WorkbookError> {
        let path = self.sheet_path(sheet);
        if !self.ctx.fs.exists(&path) {
            return Ok(SheetSnapshot::default());
        }
        self.load(sheet, &path)
    }

    /// Replaces the contents of a sheet.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_sheet(&self, sheet: &str, snapshot: &SheetSnapshot) -> Result<(), WorkbookError> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|source| WorkbookError::Parse { sheet: sheet.to_string(), source })?;
        self.ctx.fs.write(&self.sheet_path(sheet), &json).map_err(|e| WorkbookError::Io {
            action: "write",
            sheet: sheet.to_string(),
            message: e.to_string(),
        })
    }

    /// File backing `sheet`. Path separators in the name are replaced.
    #[must_use]
    pub fn sheet_path(&self, sheet: &str) -> PathBuf {
        let file: String =
            sheet.chars().map(|c| if matches!(c, '/' | '\\') { '_' } else { c }).collect();
        self.root.join(format!("{file}.json"))
    }

    fn load(&self, sheet: &str, path: &Path) -> Result<SheetSnapshot, WorkbookError> {
        let contents = self.ctx.fs.read_to_string(path).map_err(|e| WorkbookError::Io {
            action: "read",
            sheet: sheet.to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&contents)
            .map_err(|source| WorkbookError::Parse { sheet: sheet.to_string(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{memory_context, MemFs};

    #[test]
    fn reads_snapshot_with_mixed_cells() {
        let fs = MemFs::new().with_file(
            "/book/Sales.json",
            r#"{"sheet_id": 7, "values": [["Date", "Paid"], [45672, true]]}"#,
        );
        let ctx = memory_context(fs, "2025-02-01");
        let book = Workbook::new(&ctx, Path::new("/book"));

        let snap = book.read_sheet("Sales").unwrap();
        assert_eq!(snap.sheet_id, Some(7));
        assert_eq!(snap.values[1], vec![CellValue::Number(45_672.0), CellValue::Bool(true)]);
    }

    #[test]
    fn missing_source_sheet_is_an_error() {
        let ctx = memory_context(MemFs::new(), "2025-02-01");
        let book = Workbook::new(&ctx, Path::new("/book"));
        let err = book.read_sheet("Sales").unwrap_err();
        assert!(matches!(err, WorkbookError::MissingSheet { .. }));
        assert!(err.to_string().contains("Sales"));
    }

    #[test]
    fn missing_sheet_reads_as_empty_when_allowed() {
        let ctx = memory_context(MemFs::new(), "2025-02-01");
        let book = Workbook::new(&ctx, Path::new("/book"));
        assert_eq!(book.read_sheet_or_empty("Tasks").unwrap(), SheetSnapshot::default());
    }

    #[test]
    fn malformed_snapshot_is_a_parse_error() {
        let fs = MemFs::new().with_file("/book/Sales.json", "not json");
        let ctx = memory_context(fs, "2025-02-01");
        let book = Workbook::new(&ctx, Path::new("/book"));
        assert!(matches!(book.read_sheet("Sales"), Err(WorkbookError::Parse { .. })));
    }

    #[test]
    fn write_then_read_through_port() {
        let fs = MemFs::new();
        let ctx = memory_context(fs.clone(), "2025-02-01");
        let book = Workbook::new(&ctx, Path::new("/book"));

        let snap = SheetSnapshot { sheet_id: None, values: vec![vec!["ID".into()]] };
        book.write_sheet("Tasks", &snap).unwrap();

        assert!(fs.get("/book/Tasks.json").unwrap().contains("\"ID\""));
        assert_eq!(book.read_sheet("Tasks").unwrap(), snap);
    }

    #[test]
    fn sheet_path_sanitizes_separators() {
        let ctx = memory_context(MemFs::new(), "2025-02-01");
        let book = Workbook::new(&ctx, Path::new("/book"));
        assert_eq!(book.sheet_path("a/b"), PathBuf::from("/book/a_b.json"));
    }
}
