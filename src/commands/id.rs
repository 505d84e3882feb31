//! `sheetcheck id` command.

use crate::tasks::identify;

/// Print the identifier of a `(sheet, row key, field, rule)` tuple.
///
/// Operators use it to pin a manual task against a finding they expect.
pub fn run(sheet: &str, row_key: &str, field: &str, rule: &str) {
    println!("{}", identify(sheet, row_key, field, rule));
}
