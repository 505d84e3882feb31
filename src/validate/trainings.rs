//! Training schedule rules.
//!
//! Findings are attributed to the admin on duty for the row's date, taken
//! from the administrator shift rows of the same sheet.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::{rule, RowContext};
use crate::sheet::DataRow;
use crate::tasks::{Finding, UNSPECIFIED_ADMIN};

pub(super) const REQUIRED_COLUMNS: &[&str] =
    &["Date", "Start", "End", "Employee", "Type", "Substitution"];

const ADMINISTRATOR: &str = "Administrator";
const NO_COACH: &str = "No coach";
const ABSENCE_TEMPLATE: &str = "State the reason for absence";

const VALID_STATUSES: &[&str] = &[
    ADMINISTRATOR,
    "Attended",
    "Cancelled by centre",
    "Cancelled by client",
    "Medical note",
    "Absence without charge",
    "Absence",
    "Loyal absence",
    "Rescheduled",
    "Shift",
    "Visited",
];
const CONFIRMATION_STATUSES: &[&str] = &["Confirmed", "Not confirmed"];
const ABSENCE_STATUSES: &[&str] =
    &["Cancelled by centre", "Absence without charge", "Absence", "Loyal absence"];
const FLAG_VALUES: &[&str] = &["yes", "no"];

pub(super) fn check(
    rows: &[(DataRow<'_>, &str)],
    required: &[String],
    today: NaiveDate,
) -> Vec<Finding> {
    let on_duty = admins_on_duty(rows, today);
    let admin_for = |row: &DataRow<'_>| {
        row.get("Date")
            .as_date(today)
            .and_then(|d| on_duty.get(&d).cloned())
            .unwrap_or_else(|| UNSPECIFIED_ADMIN.to_string())
    };

    let mut findings = Vec::new();
    for &(row, key) in rows {
        let date = row.get("Date").as_date(today);
        if date.is_some_and(|d| d > today) {
            continue;
        }
        let ctx = RowContext::new(row, key, admin_for(&row));
        check_row(&ctx, date, required, today, &mut findings);
    }

    for (row, key) in last_session_per_client(rows) {
        let ctx = RowContext::new(row, key, admin_for(&row));
        check_renewal(&ctx, &mut findings);
    }
    findings
}

fn check_row(
    ctx: &RowContext<'_>,
    date: Option<NaiveDate>,
    required: &[String],
    today: NaiveDate,
    out: &mut Vec<Finding>,
) {
    let row = ctx.row;
    let client = row.text("Client");
    let status = row.text("Status");
    let kind = row.text("Type");
    let has_time = !row.is_blank_at("Start") || !row.is_blank_at("End");

    let shift_row = client == ADMINISTRATOR && status == ADMINISTRATOR && kind == ADMINISTRATOR;
    if shift_row && !has_time && row.is_blank_at("Employee") {
        return;
    }

    for column in required.iter().map(String::as_str) {
        if row.is_blank_at(column) {
            let description = match column {
                "Start" => "Start time is missing".to_string(),
                "End" => "End time is missing".to_string(),
                "Date" => "Date is missing".to_string(),
                "Employee" if kind == ADMINISTRATOR => {
                    if !has_time {
                        continue;
                    }
                    "No administrator assigned".to_string()
                }
                "Employee" => "No coach assigned".to_string(),
                other => format!("Field '{other}' must be filled"),
            };
            out.push(ctx.finding(column, rule::REQUIRED, description));
            continue;
        }

        let value = row.text(column);
        if column == "Date" && date.is_none() {
            out.push(ctx.finding(
                column,
                rule::INVALID_DATE,
                format!("'{value}' is not a valid date"),
            ));
        }
        if column == "Substitution" && !FLAG_VALUES.contains(&value.to_lowercase().as_str()) {
            out.push(ctx.finding(
                column,
                rule::INVALID_FLAG,
                format!("'{value}' must be Yes or No"),
            ));
        }
    }

    if !status.is_empty() {
        if CONFIRMATION_STATUSES.contains(&status.as_str()) {
            if date.is_some_and(|d| d < today) {
                out.push(ctx.finding(
                    "Status",
                    rule::STATUS_PAST,
                    format!("Status '{status}' is not allowed for past dates"),
                ));
            }
        } else if !VALID_STATUSES.contains(&status.as_str()) {
            out.push(ctx.finding(
                "Status",
                rule::STATUS_UNKNOWN,
                format!("Unknown status '{status}'"),
            ));
        }
    }

    let employee = row.text("Employee");
    if !client.is_empty()
        && client != ADMINISTRATOR
        && status != ADMINISTRATOR
        && (employee.is_empty() || employee == NO_COACH)
    {
        out.push(ctx.finding(
            "Employee",
            rule::EMPLOYEE_MISSING,
            format!("A client session needs a coach, not '{NO_COACH}'"),
        ));
    }

    let comment = row.text("Comment");
    if comment.contains("#REF!") {
        out.push(ctx.finding("Comment", rule::FORMULA_ERROR, "Broken formula in comment (#REF!)"));
    }

    if ABSENCE_STATUSES.contains(&status.as_str())
        && (comment.is_empty() || comment == ABSENCE_TEMPLATE)
    {
        out.push(ctx.finding(
            "Comment",
            rule::ABSENCE_REASON,
            format!("Status '{status}' requires the reason for absence"),
        ));
    }
}

fn check_renewal(ctx: &RowContext<'_>, out: &mut Vec<Finding>) {
    let row = ctx.row;
    let visits = row.get("Visits total").as_count();
    let remaining = row.get("Remaining").as_count();
    if let (Some(visits), Some(0)) = (visits, remaining) {
        if visits > 1 && row.is_blank_at("Comment") {
            out.push(ctx.finding(
                "Comment",
                rule::RENEWAL_COMMENT,
                "Record the client's answer to the renewal offer",
            ));
        }
    }
}

/// Admin on duty per date: shift rows with an employee, preferring the
/// `Online` category, then `On site`, then the first listed.
fn admins_on_duty(rows: &[(DataRow<'_>, &str)], today: NaiveDate) -> HashMap<NaiveDate, String> {
    let mut candidates: HashMap<NaiveDate, Vec<(String, String)>> = HashMap::new();
    for (row, _) in rows {
        if row.text("Type") != ADMINISTRATOR || row.text("Client") != ADMINISTRATOR {
            continue;
        }
        let employee = row.text("Employee");
        let Some(date) = row.get("Date").as_date(today) else { continue };
        if !employee.is_empty() {
            candidates.entry(date).or_default().push((employee, row.text("Category")));
        }
    }

    candidates
        .into_iter()
        .filter_map(|(date, shifts)| {
            let pick = |label: &str| shifts.iter().find(|(_, category)| category.contains(label));
            pick("Online")
                .or_else(|| pick("On site"))
                .or_else(|| shifts.first())
                .map(|(employee, _)| (date, employee.clone()))
        })
        .collect()
}

/// The bottom-most row of every client, in sheet order.
fn last_session_per_client<'g>(rows: &[(DataRow<'g>, &'g str)]) -> Vec<(DataRow<'g>, &'g str)> {
    let mut last: HashMap<String, usize> = HashMap::new();
    for (i, (row, _)) in rows.iter().enumerate() {
        let client = row.text("Client");
        if !client.is_empty() && client != ADMINISTRATOR {
            last.insert(client, i);
        }
    }
    let mut positions: Vec<usize> = last.into_values().collect();
    positions.sort_unstable();
    positions.into_iter().map(|i| rows[i]).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::super::test_support::{keyed, snapshot, with_rule};
    use super::super::{validate_sheet, SheetKind, SourceSheet};
    use super::*;
    use crate::testing::date;

    const HEADER: &[&str] = &[
        "Date",
        "Start",
        "End",
        "Employee",
        "Type",
        "Substitution",
        "Client",
        "Status",
        "Category",
        "Comment",
        "Visits total",
        "Remaining",
    ];

    fn run_on(rows: Vec<Value>, today: &str) -> Vec<Finding> {
        let mut values = vec![json!(HEADER)];
        values.extend(rows);
        let source = SourceSheet::new(SheetKind::Trainings, "Trainings");
        validate_sheet(&source, &snapshot(Value::Array(values)), "", date(today))
    }

    fn run(rows: Vec<Value>) -> Vec<Finding> {
        run_on(rows, "2025-01-20")
    }

    fn shift(day: &str, employee: &str, category: &str) -> Value {
        json!([day, "09:00", "21:00", employee, "Administrator", "No", "Administrator", "Administrator", category])
    }

    fn session(day: &str, client: &str, status: &str) -> Value {
        json!([day, "10:00", "11:00", "Ivan", "Pool", "No", client, status, "", "", 3, 2])
    }

    #[test]
    fn clean_schedule_has_no_findings() {
        let rows = vec![shift("15.01.2025", "Olga", "On site"), session("15.01.2025", "Ann", "Attended")];
        assert!(run(rows).is_empty());
    }

    #[test]
    fn admin_on_duty_prefers_online_shift() {
        let rows = vec![
            shift("15.01.2025", "Olga", "On site"),
            shift("15.01.2025", "Pavel", "Online"),
            session("15.01.2025", "Ann", "Unexpected"),
            session("16.01.2025", "Bob", "Unexpected"),
        ];
        let findings = run(rows);
        let unknown = with_rule(&findings, rule::STATUS_UNKNOWN);
        assert_eq!(unknown.len(), 2);
        assert_eq!(unknown[0].admin, "Pavel");
        assert_eq!(unknown[1].admin, UNSPECIFIED_ADMIN);
    }

    #[test]
    fn empty_shift_rows_are_skipped_but_timed_ones_need_an_admin() {
        let idle = json!(["15.01.2025", "", "", "", "Administrator", "No", "Administrator", "Administrator"]);
        assert!(run(vec![idle]).is_empty());

        let timed = json!(["15.01.2025", "09:00", "", "", "Administrator", "No", "Administrator", "Administrator"]);
        let findings = run(vec![timed]);
        assert_eq!(
            keyed(&findings),
            vec![
                ("2025-01-15#1".to_string(), "End".to_string(), "required".to_string()),
                ("2025-01-15#1".to_string(), "Employee".to_string(), "required".to_string()),
            ]
        );
        assert_eq!(findings[1].description, "No administrator assigned");
    }

    #[test]
    fn future_rows_are_skipped() {
        assert!(run(vec![session("25.01.2025", "", "Nonsense")]).is_empty());
    }

    #[test]
    fn invalid_date_and_flag() {
        let row = json!(["someday", "10:00", "11:00", "Ivan", "Pool", "maybe"]);
        let findings = run(vec![row]);
        let rules: Vec<_> = findings.iter().map(|f| f.rule.as_str()).collect();
        assert_eq!(rules, vec!["invalid_date", "invalid_flag"]);
        assert_eq!(findings[0].row_key, "row-2");
        assert_eq!(findings[1].description, "'maybe' must be Yes or No");
    }

    #[test]
    fn confirmation_statuses_only_for_today_or_later() {
        let findings =
            run(vec![session("15.01.2025", "Ann", "Confirmed"), session("20.01.2025", "Bob", "Confirmed")]);
        let past = with_rule(&findings, rule::STATUS_PAST);
        assert_eq!(past.len(), 1);
        assert_eq!(past[0].row_key, "2025-01-15#1");
    }

    #[test]
    fn client_session_needs_real_coach() {
        let mut row = session("15.01.2025", "Ann", "Attended");
        row[3] = json!("No coach");
        let findings = run(vec![row]);
        assert_eq!(with_rule(&findings, rule::EMPLOYEE_MISSING).len(), 1);
    }

    #[test]
    fn formula_errors_and_absence_reasons() {
        let mut broken = session("15.01.2025", "Ann", "Attended");
        broken[9] = json!("see #REF!");
        let mut absent = session("16.01.2025", "Bob", "Absence");
        absent[9] = json!(ABSENCE_TEMPLATE);
        let mut explained = session("17.01.2025", "Cid", "Absence");
        explained[9] = json!("Sick");

        let findings = run(vec![broken, absent, explained]);
        assert_eq!(with_rule(&findings, rule::FORMULA_ERROR).len(), 1);
        let absence = with_rule(&findings, rule::ABSENCE_REASON);
        assert_eq!(absence.len(), 1);
        assert_eq!(absence[0].row_key, "2025-01-16#1");
    }

    #[test]
    fn renewal_comment_only_on_last_session() {
        let mut first = session("13.01.2025", "Ann", "Attended");
        first[11] = json!(0);
        let mut last = session("15.01.2025", "Ann", "Attended");
        last[10] = json!(8);
        last[11] = json!(0);
        let mut answered = session("15.01.2025", "Bob", "Attended");
        answered[11] = json!(0);
        answered[9] = json!("Will renew");

        let findings = run(vec![first, last, answered]);
        let renewal = with_rule(&findings, rule::RENEWAL_COMMENT);
        assert_eq!(renewal.len(), 1);
        assert_eq!(renewal[0].row_key, "2025-01-15#1");
    }
}
