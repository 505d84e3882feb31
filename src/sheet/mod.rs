//! Tabular model: cell values, header-indexed grids and the workbook store.

mod grid;
mod value;
mod workbook;

pub use grid::{column_letter, CellLinker, DataRow, SheetGrid};
pub use value::{
    format_money, format_percent, is_valid_phone, parse_amount, parse_date_text, CellValue,
};
pub use workbook::{SheetSnapshot, Workbook, WorkbookError};
