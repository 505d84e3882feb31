//! Sales journal rules.

use chrono::NaiveDate;

use super::{rule, RowContext};
use crate::sheet::{format_money, format_percent, DataRow};
use crate::tasks::Finding;

pub(super) const REQUIRED_COLUMNS: &[&str] = &[
    "Date",
    "Client",
    "Product",
    "Type",
    "Category",
    "Quantity",
    "Full price",
    "Discount",
    "Final price",
    "Cash",
    "Transfer",
    "Terminal",
    "Debt",
    "Admin",
    "Coach",
    "Comment",
    "Admin bonus",
    "Coach bonus",
    "Receipt printed",
    "Entered in CRM",
];

const PAYMENT_COLUMNS: &[&str] = &["Cash", "Transfer", "Terminal", "Debt"];
const UNCHECKED_COLUMNS: &[&str] = &["Discount", "Comment", "Admin bonus", "Coach bonus"];
const COACHED_TYPES: &[&str] = &["Pool", "Baths"];
const GOODS: &str = "Goods";
const TOLERANCE: f64 = 1.0;

/// Product keyword, rule and description for products that need a comment.
const COMMENTED_PRODUCTS: &[(&str, &str, &str)] = &[
    ("gift", rule::COMMENT_GIFT, "State the occasion for the gifted session"),
    ("subscription refund", rule::COMMENT_REFUND, "State the reason for the subscription refund"),
    ("recalculation", rule::COMMENT_RECALCULATION, "State the reason for the recalculation"),
    ("certificate", rule::COMMENT_CERTIFICATE, "Add the certificate details"),
];

pub(super) fn check(
    rows: &[(DataRow<'_>, &str)],
    required: &[String],
    today: NaiveDate,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    for &(row, key) in rows {
        match row.get("Date").as_date(today) {
            Some(date) if date <= today => {}
            _ => continue,
        }
        let ctx = RowContext::new(row, key, row.text("Admin"));
        check_row(&ctx, required, &mut findings);
    }
    findings
}

fn check_row(ctx: &RowContext<'_>, required: &[String], out: &mut Vec<Finding>) {
    let row = ctx.row;

    for column in required {
        let value = row.text(column);
        if value.to_lowercase().contains("clarify") {
            out.push(ctx.finding(column, rule::CLARIFY, format!("Needs clarification: {value}")));
        }
    }

    let client = row.text("Client");
    let product = row.text("Product");
    let receipt = row.get("Receipt printed").is_checked();
    let in_crm = row.get("Entered in CRM").is_checked();
    if client.is_empty() && product.is_empty() && !receipt && !in_crm {
        return;
    }

    let kind = row.text("Type");
    let is_goods = kind == GOODS;

    for column in required.iter().map(String::as_str) {
        if UNCHECKED_COLUMNS.contains(&column) || PAYMENT_COLUMNS.contains(&column) {
            continue;
        }
        if column == "Coach" && (is_goods || !COACHED_TYPES.contains(&kind.as_str())) {
            continue;
        }
        if row.is_blank_at(column) {
            out.push(ctx.finding(
                column,
                rule::REQUIRED,
                format!("Field '{column}' must be filled"),
            ));
        }
    }

    let full = row.get("Full price").as_amount();
    let discount = row.get("Discount").as_discount();
    let final_price = row.get("Final price").as_amount();

    let expected = full * (1.0 - discount);
    if (expected - final_price).abs() > TOLERANCE {
        out.push(ctx.finding(
            "Final price",
            rule::PRICE_MATH,
            format!(
                "Price mismatch: {} * (1 - {}) = {}, but {} is recorded",
                format_money(full),
                format_percent(discount),
                format_money(expected),
                format_money(final_price)
            ),
        ));
    }

    let paid: f64 = PAYMENT_COLUMNS.iter().map(|c| row.get(c).as_amount()).sum();
    if (paid - final_price).abs() > TOLERANCE {
        out.push(ctx.finding(
            "Final price",
            rule::PAYMENT_SUM,
            format!(
                "Payments ({}) do not match the price ({})",
                format_money(paid),
                format_money(final_price)
            ),
        ));
    }

    if is_goods {
        if in_crm {
            out.push(ctx.finding(
                "Entered in CRM",
                rule::CRM_GOODS,
                "Goods must not be entered in the CRM",
            ));
        }
    } else if final_price > 0.0 {
        if !in_crm {
            out.push(ctx.finding("Entered in CRM", rule::CRM_MISSING, "Sale not entered in the CRM"));
        }
        let debt_payment =
            kind.to_lowercase().contains("debt") || product.to_lowercase().contains("debt");
        if !debt_payment && !receipt {
            out.push(ctx.finding("Receipt printed", rule::RECEIPT_MISSING, "Receipt not printed"));
        }
    }

    let comment_missing = row.is_blank_at("Comment");
    let product_lower = product.to_lowercase();
    match COMMENTED_PRODUCTS.iter().find(|(keyword, _, _)| product_lower.contains(keyword)) {
        Some(&(_, rule_name, description)) => {
            if comment_missing {
                out.push(ctx.finding("Comment", rule_name, description));
            }
        }
        None if discount >= 0.99 && comment_missing => {
            out.push(ctx.finding(
                "Comment",
                rule::COMMENT_FULL_DISCOUNT,
                "A 100% discount requires a comment",
            ));
        }
        None => {}
    }
}
