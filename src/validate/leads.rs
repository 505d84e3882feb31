//! Lead registration rules.

use super::{rule, RowContext};
use crate::sheet::{is_valid_phone, DataRow};
use crate::tasks::{Finding, UNSPECIFIED_ADMIN};

pub(super) const REQUIRED_COLUMNS: &[&str] = &["Lead date", "Request", "Admin (lead)"];

const CLIENT_ADMIN: &str = "Admin (client)";
const PHONE: &str = "Mobile";
const CLIENT_FIELDS: &[&str] =
    &["Adult surname", "Adult name", "Child name", "Child birth date", "Child gender", "Type"];
/// Filling these means a client was created.
const CORE_CLIENT_FIELDS: &[&str] = &["Adult surname", "Adult name", "Child name", "Child birth date"];

pub(super) fn check(rows: &[(DataRow<'_>, &str)], required: &[String]) -> Vec<Finding> {
    let mut findings = Vec::new();
    for &(row, key) in rows {
        let ctx = RowContext::new(row, key, row.text("Admin (lead)"));
        check_row(&ctx, required, &mut findings);
    }
    findings
}

fn check_row(ctx: &RowContext<'_>, required: &[String], out: &mut Vec<Finding>) {
    let row = ctx.row;

    for column in required {
        if row.is_blank_at(column) {
            out.push(ctx.finding(
                column,
                rule::REQUIRED,
                format!("Field '{column}' is required to register a lead"),
            ));
        }
    }

    let client_admin = row.text(CLIENT_ADMIN);
    if !client_admin.is_empty() {
        for field in CLIENT_FIELDS {
            if row.is_blank_at(field) {
                out.push(ctx.finding_for(
                    field,
                    rule::CLIENT_REQUIRED,
                    format!("Field '{field}' is required when a client is created"),
                    &client_admin,
                ));
            }
        }
        check_phone(ctx, &client_admin, out);
    } else if CORE_CLIENT_FIELDS.iter().all(|f| !row.is_blank_at(f)) {
        out.push(ctx.finding_for(
            CLIENT_ADMIN,
            rule::CLIENT_ADMIN_MISSING,
            format!("'{CLIENT_ADMIN}' is required when client details are filled in"),
            UNSPECIFIED_ADMIN,
        ));
        check_phone(ctx, UNSPECIFIED_ADMIN, out);
    }
}

fn check_phone(ctx: &RowContext<'_>, admin: &str, out: &mut Vec<Finding>) {
    if !is_valid_phone(&ctx.row.text(PHONE)) {
        out.push(ctx.finding_for(
            PHONE,
            rule::PHONE_FORMAT,
            "Phone must be 11 digits starting with 7 (7XXXXXXXXXX)",
            admin,
        ));
    }
}
