//! Header-indexed view over a sheet snapshot.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::value::CellValue;
use super::workbook::SheetSnapshot;

static EMPTY: CellValue = CellValue::Empty;

/// Builds links back to cells of one sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellLinker {
    sheet: String,
    spreadsheet_id: String,
    sheet_id: Option<i64>,
}

impl CellLinker {
    /// Creates a linker for `sheet`. An empty `spreadsheet_id` yields
    /// sheet-local references instead of URLs.
    #[must_use]
    pub fn new(sheet: &str, spreadsheet_id: &str, sheet_id: Option<i64>) -> Self {
        Self { sheet: sheet.to_string(), spreadsheet_id: spreadsheet_id.trim().to_string(), sheet_id }
    }

    /// Link to the cell at 1-based `sheet_row`, column `column` (0-based),
    /// or column `A` when the column is unknown.
    #[must_use]
    pub fn link(&self, sheet_row: usize, column: Option<usize>) -> String {
        let cell = format!("{}{sheet_row}", column_letter(column.unwrap_or(0)));
        if self.spreadsheet_id.is_empty() {
            return format!("'{}'!{cell}", self.sheet);
        }
        format!(
            "https://docs.google.com/spreadsheets/d/{}/edit#gid={}&range={cell}",
            self.spreadsheet_id,
            self.sheet_id.unwrap_or(0)
        )
    }
}

/// Converts a 0-based column index to its letter name (`0 → A`, `26 → AA`).
#[must_use]
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// A sheet whose header sits on a known row, with data rows below it.
#[derive(Debug, Clone)]
pub struct SheetGrid {
    name: String,
    header_row: usize,
    headers: Vec<String>,
    columns: HashMap<String, usize>,
    rows: Vec<Vec<CellValue>>,
    linker: CellLinker,
}

impl SheetGrid {
    /// Builds a grid from a snapshot whose values start at sheet row 1.
    ///
    /// `header_row` is the 1-based sheet row holding column names; rows
    /// above it are ignored. A snapshot shorter than that has no headers.
    #[must_use]
    pub fn from_snapshot(
        name: &str,
        snapshot: &SheetSnapshot,
        header_row: usize,
        spreadsheet_id: &str,
    ) -> Self {
        let skip = header_row.saturating_sub(1);
        let mut remaining = snapshot.values.iter().skip(skip);
        let headers: Vec<String> =
            remaining.next().map(|row| row.iter().map(CellValue::text).collect()).unwrap_or_default();

        let mut columns = HashMap::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            if !header.is_empty() {
                columns.entry(header.clone()).or_insert(i);
            }
        }

        Self {
            name: name.to_string(),
            header_row: header_row.max(1),
            headers,
            columns,
            rows: remaining.cloned().collect(),
            linker: CellLinker::new(name, spreadsheet_id, snapshot.sheet_id),
        }
    }

    /// Sheet name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names in header order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// `true` when the header names `column`.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// 0-based index of `column`, if present.
    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.get(column).copied()
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `true` when there are no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over data rows.
    pub fn rows(&self) -> impl Iterator<Item = DataRow<'_>> {
        self.rows.iter().enumerate().map(move |(index, cells)| DataRow { grid: self, index, cells })
    }

    /// Link to the header cell of `column`.
    #[must_use]
    pub fn header_link(&self, column: &str) -> String {
        self.linker.link(self.header_row, self.column_index(column))
    }

    /// Stable keys for every data row, in row order.
    ///
    /// A row dated `d` gets `d#n`, where `n` counts rows with the same date
    /// from the top. Inserting or deleting rows on other dates leaves the
    /// key untouched. Rows without a usable date fall back to their sheet
    /// row number.
    #[must_use]
    pub fn row_keys(&self, date_column: &str, today: NaiveDate) -> Vec<String> {
        let mut seen: HashMap<NaiveDate, usize> = HashMap::new();
        self.rows()
            .map(|row| match row.get(date_column).as_date(today) {
                Some(date) => {
                    let n = seen.entry(date).or_insert(0);
                    *n += 1;
                    format!("{}#{n}", date.format("%Y-%m-%d"))
                }
                None => format!("row-{}", row.sheet_row()),
            })
            .collect()
    }
}

/// One data row of a [`SheetGrid`].
#[derive(Debug, Clone, Copy)]
pub struct DataRow<'g> {
    grid: &'g SheetGrid,
    index: usize,
    cells: &'g [CellValue],
}

impl<'g> DataRow<'g> {
    /// Name of the sheet the row belongs to.
    #[must_use]
    pub fn sheet(&self) -> &'g str {
        &self.grid.name
    }

    /// 0-based position among data rows.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based row number in the sheet.
    #[must_use]
    pub fn sheet_row(&self) -> usize {
        self.grid.header_row + 1 + self.index
    }

    /// Cell under `column`; empty when the column is unknown or the row is short.
    #[must_use]
    pub fn get(&self, column: &str) -> &'g CellValue {
        self.grid.column_index(column).and_then(|i| self.cells.get(i)).unwrap_or(&EMPTY)
    }

    /// Trimmed text of the cell under `column`.
    #[must_use]
    pub fn text(&self, column: &str) -> String {
        self.get(column).text()
    }

    /// `true` when the cell under `column` is blank.
    #[must_use]
    pub fn is_blank_at(&self, column: &str) -> bool {
        self.get(column).is_blank()
    }

    /// `true` when every cell of the row is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_blank)
    }

    /// Link to the cell under `column` in this row.
    #[must_use]
    pub fn link(&self, column: &str) -> String {
        self.grid.linker.link(self.sheet_row(), self.grid.column_index(column))
    }
}
