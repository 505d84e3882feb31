//! `sheetcheck tasks` command.

use crate::config::AppConfig;
use crate::context::ServiceContext;
use crate::store::TaskStore;
use crate::tasks::{short_id, Task};

/// Execute the `tasks` command.
///
/// Prints the stored task list as an aligned table.
///
/// # Errors
///
/// Returns an error string if the task store cannot be loaded.
pub fn run(ctx: &ServiceContext, config: &AppConfig) -> Result<(), String> {
    let store = TaskStore::new(ctx, &config.workbook_dir, &config.report_sheet);
    let tasks = store.load().map_err(|e| format!("Failed to load task store: {e}"))?;
    if tasks.is_empty() {
        println!("No tasks in store.");
        return Ok(());
    }
    println!("{}", format_table(&tasks));
    println!("\n{} task(s) total.", tasks.len());
    Ok(())
}

/// Renders tasks as fixed-width columns. Descriptions are left unpadded.
#[must_use]
pub fn format_table(tasks: &[Task]) -> String {
    let rows: Vec<[String; 7]> = tasks
        .iter()
        .map(|t| {
            [
                short_id(&t.identifier).to_string(),
                if t.manual { "yes" } else { "" }.to_string(),
                t.created_at.format("%d.%m.%Y").to_string(),
                t.sheet.clone(),
                t.field.clone(),
                t.admin.clone(),
                t.description.clone(),
            ]
        })
        .collect();

    let header = ["ID", "MANUAL", "CREATED", "SHEET", "FIELD", "ADMIN", "DESCRIPTION"];
    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            rows.iter()
                .map(|r| r[col].chars().count())
                .chain(std::iter::once(header[col].len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |cells: &[&str]| {
        let last = cells.len() - 1;
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| if i == last { (*cell).to_string() } else { pad(cell, widths[i]) })
            .collect::<Vec<_>>()
            .join("  ")
    };

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut lines = vec![
        render(&header[..]),
        render(&rule.iter().map(String::as_str).collect::<Vec<_>>()),
    ];
    for row in &rows {
        lines.push(render(&row.iter().map(String::as_str).collect::<Vec<_>>()));
    }
    lines.join("\n")
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    format!("{cell}{}", " ".repeat(fill))
}
