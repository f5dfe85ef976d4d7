//! GEDCOM date values.
//!
//! GEDCOM dates come as free text like `14 JUN 1974`, `JUN 1974`, `1974` or
//! `ABT 1950`. Parsing is best-effort: the raw text is always kept for
//! display, and a calendar date is attached only when one can be derived.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Qualifier tokens that may precede the calendar part of a date value.
const QUALIFIERS: [&str; 12] = [
    "ABT",
    "ABOUT",
    "AFT",
    "AFTER",
    "BEF",
    "BEFORE",
    "BET",
    "BETWEEN",
    "CAL",
    "CALCULATED",
    "EST",
    "ESTIMATED",
];

/// A date as encountered in a GEDCOM record.
///
/// `display` is always present, even when the text could not be parsed into
/// a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GedcomDate {
    /// Original text, including any qualifier
    pub raw: String,
    /// Calendar date, if one could be derived
    pub parsed: Option<NaiveDate>,
    /// Human-readable form (defaults to the raw text)
    pub display: String,
}

impl GedcomDate {
    /// Parse a GEDCOM date value. Never fails.
    pub fn parse(value: &str) -> Self {
        let raw = value.trim();
        let mut rest = raw;
        if let Some((first, tail)) = rest.split_once(char::is_whitespace) {
            if QUALIFIERS.iter().any(|q| first.eq_ignore_ascii_case(q)) {
                rest = tail.trim_start();
            }
        }
        Self {
            raw: raw.to_string(),
            parsed: parse_calendar(rest),
            display: raw.to_string(),
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.parsed.map(|d| d.year())
    }
}

/// Derive a calendar date from `DD MON YYYY`, `MON YYYY` or `YYYY`.
/// Missing day and month default to 1.
fn parse_calendar(text: &str) -> Option<NaiveDate> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    match tokens.as_slice() {
        [day, month, year] => NaiveDate::from_ymd_opt(
            year.parse().ok()?,
            month_number(month)?,
            day.parse().ok()?,
        ),
        [month, year] => NaiveDate::from_ymd_opt(year.parse().ok()?, month_number(month)?, 1),
        [year] => NaiveDate::from_ymd_opt(year.parse().ok()?, 1, 1),
        _ => None,
    }
}

fn month_number(token: &str) -> Option<u32> {
    let month = match token.to_ascii_uppercase().as_str() {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" => 3,
        "APR" => 4,
        "MAY" => 5,
        "JUN" => 6,
        "JUL" => 7,
        "AUG" => 8,
        "SEP" => 9,
        "OCT" => 10,
        "NOV" => 11,
        "DEC" => 12,
        _ => return None,
    };
    Some(month)
}
