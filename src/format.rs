//! Display normalization: amounts, currencies, and dates.
//!
//! Formatting never fails: unknown currencies fall back to the raw code and
//! unparseable dates render as an empty string.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::model::Money;

/// Numeric amount of a possibly-absent monetary value; missing reads as 0.
pub fn get_amount(money: Option<&Money>) -> f64 {
    money.map(Money::amount).unwrap_or(0.0)
}

/// Currency code of a possibly-absent monetary value; missing reads as `"USD"`.
pub fn get_currency(money: Option<&Money>) -> &str {
    money.map(Money::currency).unwrap_or("USD")
}

fn currency_symbol(code: &str) -> &str {
    match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "TRY" => "₺",
        other => other,
    }
}

/// Format the absolute value with the currency symbol, a thousands
/// separator, and exactly two decimals. The sign, when wanted, is the
/// caller's to prefix.
pub fn format_currency_simple(amount: f64, currency: &str) -> String {
    if amount.is_nan() {
        return "$0.00".to_string();
    }
    format!(
        "{}{}",
        currency_symbol(currency),
        group_thousands(amount.abs(), 2)
    )
}

/// Like [`format_currency_simple`], but with the sign embedded.
pub fn format_currency(amount: f64, currency: &str) -> String {
    if amount.is_nan() {
        return format_currency(0.0, currency);
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!(
        "{}{}{}",
        sign,
        currency_symbol(currency),
        group_thousands(amount.abs(), 2)
    )
}

/// Grouped number with up to two decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "0".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let mut formatted = group_thousands(value.abs(), 2);
    if formatted.contains('.') {
        while formatted.ends_with('0') {
            formatted.pop();
        }
        if formatted.ends_with('.') {
            formatted.pop();
        }
    }
    format!("{sign}{formatted}")
}

/// `DD Mon YYYY` rendering of a date-ish JSON value (RFC 3339 string, bare
/// date, or millisecond timestamp). Invalid input formats to `""`.
pub fn format_date(value: &Value) -> String {
    match parse_date(value) {
        Some(date) => date.format("%d %b %Y").to_string(),
        None => String::new(),
    }
}

/// `DD Mon YYYY at HH:MM` rendering; same inputs and fallback as
/// [`format_date`].
pub fn format_date_time(value: &Value) -> String {
    match parse_date(value) {
        Some(date) => format!("{} at {}", date.format("%d %b %Y"), date.format("%H:%M")),
        None => String::new(),
    }
}

fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            if let Ok(date) = DateTime::parse_from_rfc3339(text) {
                return Some(date.with_timezone(&Utc));
            }
            if let Ok(date) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
                return Some(Utc.from_utc_datetime(&date));
            }
            if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                return date
                    .and_hms_opt(0, 0, 0)
                    .map(|datetime| Utc.from_utc_datetime(&datetime));
            }
            None
        }
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Utc.timestamp_millis_opt(millis).single()
        }
        _ => None,
    }
}

fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part.to_string(), Some(frac_part.to_string())),
        None => (formatted, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    let digits = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{grouped}.{frac}"),
        None => grouped,
    }
}
