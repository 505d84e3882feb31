//! Cell values and the lenient parsing rules applied to them.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single cell, in the shape spreadsheet APIs return unformatted values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// No value.
    #[default]
    Empty,
    /// Checkbox or boolean.
    Bool(bool),
    /// Any number, including serial dates.
    Number(f64),
    /// Free text or formula.
    Text(String),
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl CellValue {
    /// Trimmed text view. Integral numbers render without a fraction.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Bool(true) => "TRUE".to_string(),
            Self::Bool(false) => "FALSE".to_string(),
            Self::Number(n) if n.fract().abs() < f64::EPSILON && n.abs() < 1e15 => {
                format!("{n:.0}")
            }
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }

    /// `true` for empty cells and whitespace-only text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Bool(_) | Self::Number(_) => false,
        }
    }

    /// Checkbox state: a `true` boolean, or `TRUE`/`YES` text in any case.
    #[must_use]
    pub fn is_checked(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => matches!(s.trim().to_uppercase().as_str(), "TRUE" | "YES"),
            Self::Empty | Self::Number(_) => false,
        }
    }

    /// Interprets the cell as a date.
    ///
    /// Numbers are spreadsheet serial dates; text goes through
    /// [`parse_date_text`].
    #[must_use]
    pub fn as_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Number(n) => serial_date(*n),
            Self::Text(s) => parse_date_text(s, today),
            Self::Empty | Self::Bool(_) => None,
        }
    }

    /// Interprets the cell as a money amount; anything unparseable is zero.
    #[must_use]
    pub fn as_amount(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Text(s) => parse_amount(s),
            Self::Empty => 0.0,
        }
    }

    /// Interprets the cell as a discount rate. Text with `%` is divided by 100.
    #[must_use]
    pub fn as_discount(&self) -> f64 {
        match self {
            Self::Text(s) if s.contains('%') => parse_amount(s) / 100.0,
            other => other.as_amount(),
        }
    }

    /// Interprets the cell as a whole count, `None` when it is not one.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_count(&self) -> Option<i64> {
        match self {
            Self::Empty => Some(0),
            Self::Number(n) => Some(n.trunc() as i64),
            Self::Text(s) if s.trim().is_empty() => Some(0),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }
}

/// Converts a spreadsheet serial number (day 0 = 1899-12-30) to a date.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn serial_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}

/// Parses a date typed into a cell.
///
/// Only the last space-separated token is considered (cells often carry a
/// weekday prefix). Accepted: `dd.mm.yyyy`, `yyyy-mm-dd`, `dd/mm/yyyy` and
/// `dd.mm`, the latter in the year of `today`.
#[must_use]
pub fn parse_date_text(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let token = raw.trim().rsplit(' ').next()?.trim();
    if token.is_empty() {
        return None;
    }
    for format in ["%d.%m.%Y", "%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(token, format) {
            return Some(date);
        }
    }
    let (day, month) = token.split_once('.')?;
    NaiveDate::from_ymd_opt(today.year(), month.parse().ok()?, day.parse().ok()?)
}

/// Parses `1 234,50`-style amounts. Unparseable input is zero.
#[must_use]
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '%'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.parse().unwrap_or(0.0)
}

/// Formats money as `8 888,00`.
#[must_use]
pub fn format_money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped},{frac_part}")
}

/// Formats a rate as a percentage with a decimal comma, e.g. `12,50%`.
#[must_use]
pub fn format_percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0).replace('.', ",")
}

/// `true` for `7XXXXXXXXXX` phone numbers once non-digits are stripped.
#[must_use]
pub fn is_valid_phone(raw: &str) -> bool {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.len() == 11 && digits.starts_with('7')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::date;

    #[test]
    fn deserializes_api_shaped_values() {
        let row: Vec<CellValue> = serde_json::from_str(r#"[null, true, 12.5, "x"]"#).unwrap();
        assert_eq!(
            row,
            vec![CellValue::Empty, CellValue::Bool(true), CellValue::Number(12.5), "x".into()]
        );
    }

    #[test]
    fn text_view_trims_and_drops_integral_fraction() {
        assert_eq!(CellValue::from("  Ann ").text(), "Ann");
        assert_eq!(CellValue::Number(79_161_234_567.0).text(), "79161234567");
        assert_eq!(CellValue::Number(2.5).text(), "2.5");
        assert_eq!(CellValue::Empty.text(), "");
    }

    #[test]
    fn checkbox_truthiness() {
        assert!(CellValue::Bool(true).is_checked());
        assert!(CellValue::from("true").is_checked());
        assert!(CellValue::from("Yes").is_checked());
        assert!(!CellValue::from("no").is_checked());
        assert!(!CellValue::Number(1.0).is_checked());
    }

    #[test]
    fn parses_dates_in_all_supported_shapes() {
        let today = date("2025-06-10");
        assert_eq!(parse_date_text("15.01.2025", today), Some(date("2025-01-15")));
        assert_eq!(parse_date_text("2025-01-15", today), Some(date("2025-01-15")));
        assert_eq!(parse_date_text("15/01/2025", today), Some(date("2025-01-15")));
        assert_eq!(parse_date_text("Wed 15.01.2025", today), Some(date("2025-01-15")));
        assert_eq!(parse_date_text("15.01", today), Some(date("2025-01-15")));
        assert_eq!(parse_date_text("someday", today), None);
        assert_eq!(parse_date_text("", today), None);
    }

    #[test]
    fn serial_dates() {
        let today = date("2025-06-10");
        assert_eq!(CellValue::Number(45_672.0).as_date(today), Some(date("2025-01-15")));
        assert_eq!(CellValue::Number(45_672.75).as_date(today), Some(date("2025-01-15")));
        assert_eq!(CellValue::Number(-1.0).as_date(today), None);
    }

    #[test]
    fn amounts_and_discounts() {
        assert!((parse_amount("1 234,50") - 1234.5).abs() < f64::EPSILON);
        assert!((parse_amount("n/a")).abs() < f64::EPSILON);
        assert!((CellValue::from("15%").as_discount() - 0.15).abs() < 1e-9);
        assert!((CellValue::Number(0.15).as_discount() - 0.15).abs() < 1e-9);
        assert!((CellValue::Empty.as_amount()).abs() < f64::EPSILON);
    }

    #[test]
    fn counts() {
        assert_eq!(CellValue::Number(3.0).as_count(), Some(3));
        assert_eq!(CellValue::from(" 4 ").as_count(), Some(4));
        assert_eq!(CellValue::Empty.as_count(), Some(0));
        assert_eq!(CellValue::from("many").as_count(), None);
    }

    #[test]
    fn money_and_percent_formatting() {
        assert_eq!(format_money(8888.0), "8 888,00");
        assert_eq!(format_money(1_234_567.891), "1 234 567,89");
        assert_eq!(format_money(-950.5), "-950,50");
        assert_eq!(format_money(0.0), "0,00");
        assert_eq!(format_percent(0.125), "12,50%");
    }

    #[test]
    fn phone_format() {
        assert!(is_valid_phone("79161234567"));
        assert!(is_valid_phone("+7 (916) 123-45-67"));
        assert!(!is_valid_phone("89161234567"));
        assert!(!is_valid_phone("7916123456"));
        assert!(!is_valid_phone(""));
    }
}
